//! 번역 결과 API 핸들러.

use axum::extract::{Path, State};
use axum::Json;
use lingshot_core::models::task::TranslationResult;
use serde::Serialize;
use uuid::Uuid;

use super::SuccessResponse;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

/// GET /api/results (최신순)
pub async fn list_results(State(state): State<AppState>) -> Json<Vec<TranslationResult>> {
    Json(state.engine.list_results())
}

/// DELETE /api/results
pub async fn clear_results(State(state): State<AppState>) -> Json<SuccessResponse<ClearedResponse>> {
    let cleared = state.engine.clear_results();
    Json(SuccessResponse::with(ClearedResponse { cleared }))
}

/// DELETE /api/results/{id}
pub async fn delete_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse<serde_json::Map<String, serde_json::Value>>>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::NotFound(format!("번역 결과 미발견: {id}")))?;
    state.engine.delete_result(id)?;
    Ok(Json(SuccessResponse::ok()))
}
