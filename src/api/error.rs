use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorResponse;
use crate::config::ApiConfig;
use crate::recommend::RecommendError;

/// Error returned by a handler; always rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn from_recommend(err: RecommendError, api: &ApiConfig) -> Self {
        let status = match err {
            RecommendError::UserNotFound(_) | RecommendError::CourseNotFound(_) => {
                if api.not_found_status {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::OK
                }
            }
            RecommendError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let lenient = ApiConfig { not_found_status: false };
        let strict = ApiConfig { not_found_status: true };
        let err = RecommendError::UserNotFound("ana".to_string());

        let e = ApiError::from_recommend(err.clone(), &lenient);
        assert_eq!(e.status, StatusCode::OK);
        assert_eq!(e.message, "User 'ana' not found");

        let e = ApiError::from_recommend(err, &strict);
        assert_eq!(e.status, StatusCode::NOT_FOUND);

        let e = ApiError::from_recommend(RecommendError::Internal("boom".to_string()), &strict);
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "boom");
    }
}
