use serde::{Deserialize, Serialize};

use crate::recommend::{Recommendation, SimilarCourse};

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(alias = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarRequest {
    #[serde(alias = "sigla")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub user: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarResponse {
    pub code: String,
    pub similar: Vec<SimilarCourse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub users: usize,
    pub items: usize,
    pub courses: usize,
}
