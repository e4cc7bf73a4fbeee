//! 백엔드 모델 목록 API 핸들러.

use axum::extract::State;
use axum::Json;
use lingshot_core::models::model::ModelInfo;
use lingshot_network::model_catalog::ModelCatalog;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelInfo>,
}

fn catalog(state: &AppState) -> Result<&Arc<ModelCatalog>, ApiError> {
    state
        .catalog
        .as_ref()
        .ok_or_else(|| ApiError::Internal("모델 목록 엔드포인트가 설정되지 않았습니다".to_string()))
}

/// GET /api/models
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelListResponse>, ApiError> {
    let models = catalog(&state)?.list_models().await?;
    Ok(Json(ModelListResponse { models }))
}

/// GET /api/models/ocr (로컬 Tesseract 항목 포함)
pub async fn ocr_models(State(state): State<AppState>) -> Result<Json<ModelListResponse>, ApiError> {
    let models = catalog(&state)?.ocr_models().await?;
    Ok(Json(ModelListResponse { models }))
}

/// GET /api/models/translation
pub async fn translation_models(
    State(state): State<AppState>,
) -> Result<Json<ModelListResponse>, ApiError> {
    let models = catalog(&state)?.translation_models().await?;
    Ok(Json(ModelListResponse { models }))
}
