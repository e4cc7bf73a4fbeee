//! 캡처 대상과 프레임 모델.
//!
//! [`Frame`]은 RGBA8 픽셀 버퍼를 공유 소유(`Arc<[u8]>`)로 들고 있어
//! 캐시·작업 간 복제 비용이 없다. 생성 후에는 변경되지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::CoreError;

/// 캡처 대상 식별자. 동등성은 식별자 동일성이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// 주 모니터 전체
    FullScreen,
    /// 특정 창 (플랫폼 창 ID)
    Window { id: u32 },
}

impl Source {
    /// 창 ID가 있으면 창, 없으면 전체 화면
    pub fn from_window_id(id: Option<u32>) -> Self {
        match id {
            Some(id) => Source::Window { id },
            None => Source::FullScreen,
        }
    }

    pub fn window_id(&self) -> Option<u32> {
        match self {
            Source::Window { id } => Some(*id),
            Source::FullScreen => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::FullScreen => write!(f, "full-screen"),
            Source::Window { id } => write!(f, "window#{id}"),
        }
    }
}

/// 표시용 캡처 대상 정보 (창 목록, 상태 응답)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub source: Source,
    /// 창 제목 (전체 화면은 "Full Screen")
    pub title: String,
    /// 현재 캡처 가능 여부 (최소화되지 않음)
    pub is_visible: bool,
}

impl SourceInfo {
    pub fn full_screen() -> Self {
        Self {
            source: Source::FullScreen,
            title: "Full Screen".to_string(),
            is_visible: true,
        }
    }
}

/// 캡처된 화면 스냅샷 (RGBA8, 행 우선)
#[derive(Clone)]
pub struct Frame {
    source: Source,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
    captured_at: DateTime<Utc>,
}

impl Frame {
    /// RGBA8 버퍼로 프레임 생성. 버퍼 길이가 `width * height * 4`와 다르면 에러.
    pub fn from_rgba(
        source: Source,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(CoreError::Capture(format!(
                "픽셀 버퍼 크기 불일치: {}x{} → 기대 {expected}, 실제 {}",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            source,
            width,
            height,
            pixels: pixels.into(),
            captured_at: Utc::now(),
        })
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 픽셀 (행 우선)
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// 픽셀이 하나도 없는 프레임 여부
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("source", &self.source)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("captured_at", &self.captured_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rejects_wrong_buffer_len() {
        let err = Frame::from_rgba(Source::FullScreen, 2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, CoreError::Capture(_)));
    }

    #[test]
    fn frame_clone_shares_pixels() {
        let frame = Frame::from_rgba(Source::Window { id: 7 }, 2, 1, vec![1; 8]).unwrap();
        let clone = frame.clone();
        assert_eq!(frame.pixels().as_ptr(), clone.pixels().as_ptr());
        assert_eq!(clone.source(), Source::Window { id: 7 });
    }

    #[test]
    fn source_serde_shape() {
        let json = serde_json::to_value(Source::Window { id: 42 }).unwrap();
        assert_eq!(json["kind"], "window");
        assert_eq!(json["id"], 42);

        let full: Source = serde_json::from_str(r#"{"kind":"full_screen"}"#).unwrap();
        assert_eq!(full, Source::FullScreen);
    }

    #[test]
    fn source_from_window_id() {
        assert_eq!(Source::from_window_id(None), Source::FullScreen);
        assert_eq!(Source::from_window_id(Some(3)).window_id(), Some(3));
    }
}
