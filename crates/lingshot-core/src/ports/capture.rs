//! 프레임 소스 포트.
//!
//! 구현: `lingshot-vision` crate (xcap). 플랫폼 캡처 API가 동기식이므로
//! trait도 동기식이며, 호출자는 블로킹 풀(`spawn_blocking`)에서 실행한다.

use crate::error::CoreError;
use crate::models::frame::{Frame, Source, SourceInfo};

/// 화면 캡처 소스
pub trait FrameSource: Send + Sync {
    /// 대상의 현재 스냅샷. 창이 닫혔거나 핸들이 무효하면 `CoreError::Capture`.
    fn capture(&self, source: &Source) -> Result<Frame, CoreError>;

    /// 대상이 존재하고 최소화되지 않았는지 여부
    fn is_visible(&self, source: &Source) -> bool;

    /// 선택 가능한 창 목록 (제목 순)
    fn list_sources(&self) -> Result<Vec<SourceInfo>, CoreError>;
}
