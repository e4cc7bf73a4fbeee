//! 번역 설정 API 핸들러.

use axum::extract::State;
use axum::Json;
use lingshot_core::config::{SettingsUpdate, TranslationSettings};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<TranslationSettings> {
    Json(state.engine.settings())
}

/// PATCH /api/settings
///
/// 지정한 필드만 바꾼다. 설정 관리자가 있으면 파일에도 저장한다.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<TranslationSettings>, ApiError> {
    if update.is_empty() {
        return Ok(Json(state.engine.settings()));
    }
    let settings = state.engine.update_settings(&update)?;

    if let Some(ref config_manager) = state.config_manager {
        let persisted = settings.clone();
        match config_manager.update_with(move |config| config.translation = persisted) {
            Ok(_) => info!("번역 설정 저장 완료"),
            // 메모리 상태는 이미 반영됨
            Err(e) => warn!("번역 설정 저장 실패: {e}"),
        }
    }

    Ok(Json(settings))
}
