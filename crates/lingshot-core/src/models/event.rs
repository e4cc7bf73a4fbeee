//! 파이프라인 이벤트 모델.
//!
//! 구독자(웹 SSE, 콘솔 등)에게 전달되는 모든 이벤트의 통합 enum.
//! 직렬화 형태: `{"type": "...", "data": {...}}`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, ErrorKind};
use crate::models::status::AppStatus;
use crate::models::task::{TaskState, TranslationResult};

/// 파이프라인 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// 상태 변경 (제어 명령 후)
    StatusUpdate(AppStatus),
    /// 번역 결과 (스트리밍 중간본 또는 최종본)
    TranslationResult(TranslationResult),
    /// 작업 단계/경과 시간
    TaskProgress(TaskState),
    /// 구조화된 에러
    Error(ErrorEvent),
}

impl PipelineEvent {
    /// 이벤트가 속한 작업 ID (상태 이벤트는 None)
    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            PipelineEvent::StatusUpdate(_) => None,
            PipelineEvent::TranslationResult(r) => Some(r.id),
            PipelineEvent::TaskProgress(s) => s.task_id,
            PipelineEvent::Error(e) => e.task_id,
        }
    }

    /// 이벤트 종류 이름 (로깅용)
    pub fn name(&self) -> &'static str {
        match self {
            PipelineEvent::StatusUpdate(_) => "status_update",
            PipelineEvent::TranslationResult(_) => "translation_result",
            PipelineEvent::TaskProgress(_) => "task_progress",
            PipelineEvent::Error(_) => "error",
        }
    }
}

/// 에러 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEvent {
    pub fn from_error(err: &CoreError, task_id: Option<Uuid>) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            task_id,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStage;
    use std::time::Duration;

    #[test]
    fn event_wire_shape() {
        let id = Uuid::new_v4();
        let event = PipelineEvent::TranslationResult(TranslationResult::partial(
            id,
            "부분",
            TaskStage::Translating,
            Duration::from_millis(200),
        ));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "translation_result");
        assert_eq!(json["data"]["stage"], "translating");
        assert_eq!(json["data"]["is_streaming"], true);
        assert_eq!(event.task_id(), Some(id));
    }

    #[test]
    fn error_event_from_core_error() {
        let id = Uuid::new_v4();
        let event = ErrorEvent::from_error(&CoreError::AlreadyRunning, Some(id));
        assert_eq!(event.kind, ErrorKind::AlreadyRunning);
        let json = serde_json::to_value(PipelineEvent::Error(event)).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["data"]["kind"], "already_running");
    }
}
