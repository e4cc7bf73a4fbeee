//! 모니터 / 작업 제어 API 핸들러.

use axum::extract::State;
use axum::Json;
use lingshot_core::models::status::{MonitorAction, MonitorState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SuccessResponse;
use crate::error::ApiError;
use crate::AppState;

/// 모니터 제어 요청 (`start` / `pause` / `stop`)
#[derive(Debug, Deserialize)]
pub struct MonitorControlRequest {
    pub action: MonitorAction,
}

#[derive(Debug, Serialize)]
pub struct MonitorControlResponse {
    pub status: MonitorState,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task_id: Option<Uuid>,
}

/// POST /api/monitor/control
pub async fn monitor_control(
    State(state): State<AppState>,
    Json(request): Json<MonitorControlRequest>,
) -> Result<Json<SuccessResponse<MonitorControlResponse>>, ApiError> {
    let status = state.engine.control_monitor(request.action)?;
    Ok(Json(SuccessResponse::with(MonitorControlResponse { status })))
}

/// POST /api/translate/force
pub async fn force_translation(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<TaskResponse>>, ApiError> {
    let task_id = state.engine.force_now()?;
    Ok(Json(SuccessResponse::with(TaskResponse {
        task_id: Some(task_id),
    })))
}

/// POST /api/task/stop
pub async fn stop_task(State(state): State<AppState>) -> Json<SuccessResponse<TaskResponse>> {
    let task_id = state.engine.stop_task();
    Json(SuccessResponse::with(TaskResponse { task_id }))
}

/// POST /api/cache/reset
pub async fn reset_cache(
    State(state): State<AppState>,
) -> Json<SuccessResponse<serde_json::Map<String, serde_json::Value>>> {
    state.engine.reset_cache();
    Json(SuccessResponse::ok())
}
