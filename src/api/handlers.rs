use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use super::error::ApiError;
use super::types::*;
use crate::recommend::{normalize_code, RecommendError};
use crate::server::AppState;

pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(request) = payload?;

    let recommendations = state
        .recommender
        .predict(&request.name)
        .map_err(|e| not_found_or_error(e, &state))?;

    info!(user = %request.name, count = recommendations.len(), "recommendations");

    Ok(Json(RecommendResponse {
        user: request.name,
        recommendations,
    }))
}

pub async fn similar(
    State(state): State<AppState>,
    payload: Result<Json<SimilarRequest>, JsonRejection>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let Json(request) = payload?;
    let code = normalize_code(&request.code);

    let similar = state
        .recommender
        .find_similar(&code)
        .map_err(|e| not_found_or_error(e, &state))?;

    info!(code = %code, count = similar.len(), "similar courses");

    Ok(Json(SimilarResponse { code, similar }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let predictor = state.recommender.predictor();
    Json(HealthResponse {
        status: "ok".to_string(),
        users: predictor.user_count(),
        items: predictor.item_count(),
        courses: state.recommender.lookup().course_count(),
    })
}

fn not_found_or_error(err: RecommendError, state: &AppState) -> ApiError {
    match &err {
        RecommendError::Internal(msg) => warn!("lookup failed: {}", msg),
        _ => info!("{}", err),
    }
    ApiError::from_recommend(err, &state.config.api)
}
