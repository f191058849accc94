pub mod courses;
pub mod matrix;
pub mod ratings;

pub use courses::{load_courses, parse_courses};
pub use matrix::{load_matrix, parse_matrix};
pub use ratings::{load_ratings, parse_ratings, RatingsMetadata};

use ndarray::Array2;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::recommend::Course;

/// Precomputed inputs for both scoring components, as read from disk.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub ratings: RatingsMetadata,
    pub normalized: Array2<f64>,
    pub raw: Array2<f64>,
    pub courses: Vec<Course>,
    pub similarity: Array2<f64>,
}

impl Artifacts {
    pub fn load(config: &Config) -> Result<Self, ArtifactError> {
        let files = &config.artifacts;

        let ratings = load_ratings(&config.artifact_path(&files.ratings))?;
        info!(
            users = ratings.users.len(),
            items = ratings.items.len(),
            names = ratings.item_names.len(),
            "Loaded ratings metadata"
        );

        let normalized = load_matrix(&config.artifact_path(&files.normalized_matrix))?;
        info!(shape = ?normalized.dim(), "Loaded normalized rating matrix");

        let raw = load_matrix(&config.artifact_path(&files.raw_matrix))?;
        info!(shape = ?raw.dim(), "Loaded raw rating matrix");

        let courses = load_courses(&config.artifact_path(&files.courses))?;
        info!(courses = courses.len(), "Loaded course catalog");

        let similarity = load_matrix(&config.artifact_path(&files.similarity_matrix))?;
        info!(shape = ?similarity.dim(), "Loaded similarity matrix");

        Ok(Self {
            ratings,
            normalized,
            raw,
            courses,
            similarity,
        })
    }
}

pub(crate) fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    std::fs::read_to_string(path).map_err(|e| ArtifactError::ReadError(path.display().to_string(), e))
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse artifact {0}: {1}")]
    ParseError(String, serde_json::Error),
    #[error("Invalid artifact {0}: {1}")]
    Invalid(String, String),
}
