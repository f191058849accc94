use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::{read_artifact, ArtifactError};
use crate::recommend::Course;

#[derive(Debug, Deserialize)]
struct CourseRecord {
    #[serde(alias = "sigle")]
    code: String,
    name: String,
    #[serde(default)]
    area: Option<String>,
}

/// Column-oriented table export: one map per column, keyed by row label.
#[derive(Debug, Deserialize)]
struct CourseColumns {
    #[serde(alias = "sigle")]
    code: BTreeMap<String, String>,
    name: BTreeMap<String, String>,
    #[serde(default)]
    area: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Records(Vec<CourseRecord>),
    Columns(CourseColumns),
}

pub fn load_courses(path: &Path) -> Result<Vec<Course>, ArtifactError> {
    let content = read_artifact(path)?;
    parse_courses(&path.display().to_string(), &content)
}

/// Parse a course catalog, either as a list of records or column-oriented.
/// The resulting order is the row order of the similarity matrix.
pub fn parse_courses(name: &str, content: &str) -> Result<Vec<Course>, ArtifactError> {
    let file: CatalogFile =
        serde_json::from_str(content).map_err(|e| ArtifactError::ParseError(name.to_string(), e))?;

    match file {
        CatalogFile::Records(records) => Ok(records
            .into_iter()
            .map(|r| Course {
                code: r.code,
                name: r.name,
                area: r.area.unwrap_or_default(),
            })
            .collect()),
        CatalogFile::Columns(columns) => from_columns(name, columns),
    }
}

fn from_columns(name: &str, mut columns: CourseColumns) -> Result<Vec<Course>, ArtifactError> {
    let mut rows = Vec::with_capacity(columns.code.len());
    for label in columns.code.keys() {
        let position = label.parse::<usize>().map_err(|_| {
            ArtifactError::Invalid(name.to_string(), format!("row label '{}' is not a number", label))
        })?;
        rows.push((position, label.clone()));
    }
    rows.sort();

    if let Some((expected, (found, _))) = rows.iter().enumerate().find(|(i, (p, _))| i != p) {
        return Err(ArtifactError::Invalid(
            name.to_string(),
            format!("expected row label {}, found {}", expected, found),
        ));
    }

    let mut courses = Vec::with_capacity(rows.len());
    for (_, label) in rows {
        let course_name = columns.name.remove(&label).ok_or_else(|| {
            ArtifactError::Invalid(name.to_string(), format!("row {} has no name", label))
        })?;
        courses.push(Course {
            code: columns.code.remove(&label).unwrap_or_default(),
            name: course_name,
            area: columns.area.remove(&label).flatten().unwrap_or_default(),
        });
    }

    Ok(courses)
}
