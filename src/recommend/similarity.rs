use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rank::rank_descending;
use super::{BuildError, RecommendError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCourse {
    pub rank: usize,
    pub code: String,
    pub name: String,
    pub area: String,
    /// Similarity as a truncated percentage.
    pub similarity: u32,
}

/// Course codes are compared and reported in upper case.
pub fn normalize_code(code: &str) -> String {
    code.to_uppercase()
}

/// Content-similarity lookup over a course catalog, backed by a precomputed
/// square similarity matrix aligned with the catalog order.
pub struct SimilarityLookup {
    courses: Vec<Course>,
    similarity: Array2<f64>,
    count: usize,
}

impl SimilarityLookup {
    pub fn new(courses: Vec<Course>, similarity: Array2<f64>, count: usize) -> Result<Self, BuildError> {
        if !similarity.is_square() {
            return Err(BuildError::Shape(format!(
                "similarity matrix is {:?}, expected a square matrix",
                similarity.dim()
            )));
        }
        if similarity.nrows() != courses.len() {
            return Err(BuildError::Shape(format!(
                "similarity matrix has {} rows for {} courses",
                similarity.nrows(),
                courses.len()
            )));
        }

        let courses = courses
            .into_iter()
            .map(|c| Course {
                code: normalize_code(&c.code),
                ..c
            })
            .collect();

        Ok(Self {
            courses,
            similarity,
            count,
        })
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn find_similar(&self, code: &str) -> Result<Vec<SimilarCourse>, RecommendError> {
        let code = normalize_code(code);
        let index = self
            .courses
            .iter()
            .position(|c| c.code == code)
            .ok_or_else(|| RecommendError::CourseNotFound(code.clone()))?;

        let row = self.similarity.row(index);
        if let Some(col) = row.iter().position(|s| !s.is_finite()) {
            return Err(RecommendError::Internal(format!(
                "similarity row for course '{}' has a non-finite value at column {}",
                code, col
            )));
        }
        let scores = row.to_vec();

        // Self-similarity is maximal, so this drops the top-ranked entry.
        let similar: Vec<SimilarCourse> = rank_descending(&scores)
            .into_iter()
            .filter(|&idx| idx != index)
            .take(self.count)
            .enumerate()
            .map(|(pos, idx)| {
                let course = &self.courses[idx];
                SimilarCourse {
                    rank: pos + 1,
                    code: course.code.clone(),
                    name: course.name.clone(),
                    area: course.area.clone(),
                    similarity: to_percent(scores[idx]),
                }
            })
            .collect();

        debug!(code = %code, index = index, returned = similar.len(), "similar courses");

        Ok(similar)
    }
}

fn to_percent(similarity: f64) -> u32 {
    (similarity * 100.0).trunc().clamp(0.0, 100.0) as u32
}
