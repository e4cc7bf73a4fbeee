//! 상태 / 캡처 대상 API 핸들러.

use axum::extract::State;
use axum::Json;
use lingshot_core::models::frame::SourceInfo;
use lingshot_core::models::status::AppStatus;
use serde::{Deserialize, Serialize};

use super::SuccessResponse;
use crate::error::ApiError;
use crate::AppState;

/// 창 목록 응답
#[derive(Debug, Serialize)]
pub struct WindowListResponse {
    pub windows: Vec<SourceInfo>,
}

/// 창 선택 요청. `window_id`가 없으면 전체 화면.
#[derive(Debug, Deserialize)]
pub struct WindowSelectionRequest {
    #[serde(default, alias = "hwnd")]
    pub window_id: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectedSource {
    pub selected_source: SourceInfo,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<AppStatus> {
    Json(state.engine.status())
}

/// GET /api/windows
pub async fn list_windows(
    State(state): State<AppState>,
) -> Result<Json<WindowListResponse>, ApiError> {
    let windows = state.engine.list_windows().await?;
    Ok(Json(WindowListResponse { windows }))
}

/// POST /api/window/select
pub async fn select_window(
    State(state): State<AppState>,
    Json(request): Json<WindowSelectionRequest>,
) -> Result<Json<SuccessResponse<SelectedSource>>, ApiError> {
    let selected_source = state
        .engine
        .select_source(request.window_id, request.title)
        .await?;
    Ok(Json(SuccessResponse::with(SelectedSource { selected_source })))
}
