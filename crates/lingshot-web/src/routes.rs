//! API 라우트 정의.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성 (`/api` 아래에 중첩)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 상태 / 캡처 대상
        .route("/health", get(handlers::status::health))
        .route("/status", get(handlers::status::get_status))
        .route("/windows", get(handlers::status::list_windows))
        .route("/window/select", post(handlers::status::select_window))
        // 모니터 / 작업 제어
        .route("/monitor/control", post(handlers::control::monitor_control))
        .route("/translate/force", post(handlers::control::force_translation))
        .route("/task/stop", post(handlers::control::stop_task))
        .route("/cache/reset", post(handlers::control::reset_cache))
        // 설정
        .route(
            "/settings",
            get(handlers::settings::get_settings).patch(handlers::settings::update_settings),
        )
        // 번역 결과
        .route(
            "/results",
            get(handlers::results::list_results).delete(handlers::results::clear_results),
        )
        .route("/results/{id}", delete(handlers::results::delete_result))
        // 모델 목록
        .route("/models", get(handlers::models::list_models))
        .route("/models/ocr", get(handlers::models::ocr_models))
        .route("/models/translation", get(handlers::models::translation_models))
        // 실시간 스트림 (SSE)
        .route("/stream", get(handlers::stream::event_stream))
}
