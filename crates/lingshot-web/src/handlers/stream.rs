//! SSE 실시간 스트림 핸들러.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use lingshot_core::models::event::PipelineEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::AppState;

/// SSE keep-alive 주기
const KEEP_ALIVE_SECS: u64 = 15;

/// SSE 스트림 엔드포인트
///
/// GET /api/stream
///
/// 파이프라인 이벤트를 Server-Sent Events로 전송한다. SSE 이벤트 이름은
/// `status_update` / `translation_result` / `task_progress` / `error`이고
/// 데이터는 `{"type": ..., "data": ...}` JSON이다.
/// 연결이 끊기면 구독 큐가 닫혀 다음 발행 때 자동으로 정리된다.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.engine.subscribe();
    debug!(subscriber = subscription.id(), "SSE 클라이언트 연결");

    // 연결 직후 현재 상태 한 번
    let initial = tokio_stream::once(PipelineEvent::StatusUpdate(state.engine.status()));
    let sse_stream = initial
        .chain(subscription.into_stream())
        .filter_map(|event| to_sse_event(&event).map(Ok));

    Sse::new(sse_stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(KEEP_ALIVE_SECS))
            .text("ping"),
    )
}

/// 파이프라인 이벤트 → SSE 이벤트
pub fn to_sse_event(event: &PipelineEvent) -> Option<Event> {
    let json = serde_json::to_string(event).ok()?;
    Some(Event::default().event(event.name()).data(json))
}
