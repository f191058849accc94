pub mod collaborative;
pub mod rank;
pub mod similarity;

pub use collaborative::{CollaborativePredictor, Recommendation, UNKNOWN_ITEM_NAME};
pub use rank::rank_descending;
pub use similarity::{normalize_code, Course, SimilarCourse, SimilarityLookup};

use tracing::info;

use crate::artifacts::Artifacts;
use crate::config::RecommenderConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendError {
    #[error("User '{0}' not found")]
    UserNotFound(String),
    #[error("Course '{0}' not found")]
    CourseNotFound(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Duplicate user identifier: {0}")]
    DuplicateUser(String),
    #[error("Artifact shape mismatch: {0}")]
    Shape(String),
}

/// Both scoring components, built once at startup and shared read-only by
/// every request.
pub struct Recommender {
    predictor: CollaborativePredictor,
    lookup: SimilarityLookup,
}

impl Recommender {
    pub fn new(predictor: CollaborativePredictor, lookup: SimilarityLookup) -> Self {
        Self { predictor, lookup }
    }

    pub fn from_artifacts(artifacts: Artifacts, config: &RecommenderConfig) -> Result<Self, BuildError> {
        let Artifacts {
            ratings,
            normalized,
            raw,
            courses,
            similarity,
        } = artifacts;

        let predictor = CollaborativePredictor::new(
            ratings.users,
            ratings.items,
            ratings.item_names,
            normalized,
            raw,
            config.neighbors,
            config.top_n,
        )?;
        let lookup = SimilarityLookup::new(courses, similarity, config.similar_count)?;

        info!(
            users = predictor.user_count(),
            items = predictor.item_count(),
            courses = lookup.course_count(),
            "Recommender ready"
        );

        Ok(Self::new(predictor, lookup))
    }

    pub fn predict(&self, user: &str) -> Result<Vec<Recommendation>, RecommendError> {
        self.predictor.predict(user)
    }

    pub fn find_similar(&self, code: &str) -> Result<Vec<SimilarCourse>, RecommendError> {
        self.lookup.find_similar(code)
    }

    pub fn predictor(&self) -> &CollaborativePredictor {
        &self.predictor
    }

    pub fn lookup(&self) -> &SimilarityLookup {
        &self.lookup
    }
}
