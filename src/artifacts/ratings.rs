use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{read_artifact, ArtifactError};

/// User and item identifiers aligned with the rating matrices, plus display
/// names for items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingsMetadata {
    pub users: Vec<String>,
    pub items: Vec<String>,
    pub item_names: HashMap<String, String>,
}

/// Identifiers may be exported as strings or as plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(serde_json::Number),
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        match id {
            Identifier::Text(s) => s,
            Identifier::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingsFile {
    #[serde(alias = "usuarios")]
    users: Vec<Identifier>,
    #[serde(alias = "cursos")]
    items: Vec<Identifier>,
    #[serde(alias = "nombres_cursos", default)]
    item_names: HashMap<String, String>,
}

pub fn load_ratings(path: &Path) -> Result<RatingsMetadata, ArtifactError> {
    let content = read_artifact(path)?;
    parse_ratings(&path.display().to_string(), &content)
}

pub fn parse_ratings(name: &str, content: &str) -> Result<RatingsMetadata, ArtifactError> {
    let file: RatingsFile =
        serde_json::from_str(content).map_err(|e| ArtifactError::ParseError(name.to_string(), e))?;

    Ok(RatingsMetadata {
        users: file.users.into_iter().map(String::from).collect(),
        items: file.items.into_iter().map(String::from).collect(),
        item_names: file.item_names,
    })
}
