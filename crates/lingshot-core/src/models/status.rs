//! 애플리케이션 상태 스냅샷 모델.

use serde::{Deserialize, Serialize};

use crate::config::TranslationSettings;
use crate::models::frame::SourceInfo;
use crate::models::task::TaskState;

/// 모니터 루프 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    /// 시작 전 또는 중지됨
    #[default]
    Idle,
    Running,
    Paused,
}

/// 모니터 제어 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorAction {
    Start,
    Pause,
    /// 일시정지 + 진행 중 작업 취소
    Stop,
}

/// 구독자에게 내보내는 전체 상태
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStatus {
    pub status: MonitorState,
    pub monitoring_paused: bool,
    pub selected_source: Option<SourceInfo>,
    pub task_state: TaskState,
    pub settings: TranslationSettings,
    /// 보관 중인 완료 결과 수
    pub translation_count: usize,
}
