//! 번역 작업 상태와 결과 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 추출 결과가 비었을 때 완료 결과에 넣는 문구
pub const NO_TEXT_SENTINEL: &str = "No text detected in image";

/// 번역 작업 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStage {
    #[default]
    Idle,
    Capturing,
    Extracting,
    Translating,
    Completed,
    Error,
    Cancelled,
}

impl TaskStage {
    /// 종료 단계 여부 (completed / error / cancelled)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStage::Completed | TaskStage::Error | TaskStage::Cancelled
        )
    }

    /// 진행 순서 (단계 순서 검증용)
    pub fn ordinal(&self) -> u8 {
        match self {
            TaskStage::Idle => 0,
            TaskStage::Capturing => 1,
            TaskStage::Extracting => 2,
            TaskStage::Translating => 3,
            TaskStage::Completed | TaskStage::Error | TaskStage::Cancelled => 4,
        }
    }
}

/// 현재 작업의 관찰 가능한 상태. 시스템 전체에 하나만 존재한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaskState {
    pub task_id: Option<Uuid>,
    pub running: bool,
    pub stage: TaskStage,
    pub started_at: Option<DateTime<Utc>>,
    /// 시작 후 경과 시간 (초)
    pub elapsed: f64,
    pub cancel_requested: bool,
}

impl TaskState {
    /// 유휴 상태
    pub fn idle() -> Self {
        Self::default()
    }

    /// 방금 시작된 작업 상태 (capturing)
    pub fn started(task_id: Uuid) -> Self {
        Self {
            task_id: Some(task_id),
            running: true,
            stage: TaskStage::Capturing,
            started_at: Some(Utc::now()),
            elapsed: 0.0,
            cancel_requested: false,
        }
    }
}

/// 번역 결과. 스트리밍 중간본은 최종본과 같은 `id`를 공유한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// 캡처 시작부터의 처리 시간 (초)
    pub processing_time: f64,
    pub stage: TaskStage,
    pub is_streaming: bool,
}

impl TranslationResult {
    /// 스트리밍 중간 결과
    pub fn partial(id: Uuid, text: impl Into<String>, stage: TaskStage, elapsed: Duration) -> Self {
        Self {
            id,
            text: text.into(),
            created_at: Utc::now(),
            processing_time: elapsed.as_secs_f64(),
            stage,
            is_streaming: true,
        }
    }

    /// 최종 완료 결과
    pub fn completed(id: Uuid, text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            id,
            text: text.into(),
            created_at: Utc::now(),
            processing_time: elapsed.as_secs_f64(),
            stage: TaskStage::Completed,
            is_streaming: false,
        }
    }
}

/// 작업 1회에 적용되는 설정 스냅샷
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSettings {
    /// 단계별 백엔드 호출 타임아웃
    pub timeout: Duration,
    pub ocr_model_id: String,
    pub translation_model_id: String,
}
