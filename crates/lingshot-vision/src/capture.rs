//! 스크린 캡처.
//!
//! xcap 기반 [`FrameSource`] 구현. 전체 화면은 주 모니터를,
//! 창은 `Window::all()`에서 ID로 찾아 캡처한다. 모든 호출은 동기식이다.

use lingshot_core::error::CoreError;
use lingshot_core::models::frame::{Frame, Source, SourceInfo};
use lingshot_core::ports::capture::FrameSource;
use tracing::debug;
use xcap::{Monitor, Window};

/// 스크린 캡처: xcap 기반
pub struct ScreenCapture;

impl ScreenCapture {
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> Result<Monitor, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;
        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(monitor);
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }
        fallback.ok_or_else(|| CoreError::Capture("모니터를 찾을 수 없음".to_string()))
    }

    fn find_window(id: u32) -> Result<Option<Window>, CoreError> {
        let windows = Window::all()
            .map_err(|e| CoreError::Capture(format!("창 목록 조회 실패: {e}")))?;
        Ok(windows.into_iter().find(|w| w.id().ok() == Some(id)))
    }

    fn window_is_visible(window: &Window) -> bool {
        !window.is_minimized().unwrap_or(true) && window.width().unwrap_or(0) > 0
    }
}

impl Default for ScreenCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ScreenCapture {
    fn capture(&self, source: &Source) -> Result<Frame, CoreError> {
        let image = match source {
            Source::FullScreen => Self::primary_monitor()?
                .capture_image()
                .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?,
            Source::Window { id } => {
                let window = Self::find_window(*id)?
                    .ok_or_else(|| CoreError::Capture(format!("창을 찾을 수 없음: {id}")))?;
                if !Self::window_is_visible(&window) {
                    return Err(CoreError::Capture(format!("창이 최소화됨: {id}")));
                }
                window
                    .capture_image()
                    .map_err(|e| CoreError::Capture(format!("창 캡처 실패: {e}")))?
            }
        };

        let (width, height) = (image.width(), image.height());
        debug!("캡처 완료: {source} {width}x{height}");
        Frame::from_rgba(*source, width, height, image.into_raw())
    }

    fn is_visible(&self, source: &Source) -> bool {
        match source {
            Source::FullScreen => true,
            Source::Window { id } => match Self::find_window(*id) {
                Ok(Some(window)) => Self::window_is_visible(&window),
                Ok(None) => false,
                Err(e) => {
                    debug!("창 가시성 확인 실패: {e}");
                    false
                }
            },
        }
    }

    fn list_sources(&self) -> Result<Vec<SourceInfo>, CoreError> {
        let windows = Window::all()
            .map_err(|e| CoreError::Capture(format!("창 목록 조회 실패: {e}")))?;

        let mut sources: Vec<SourceInfo> = windows
            .iter()
            .filter_map(|w| {
                let id = w.id().ok()?;
                let title = w.title().ok()?.trim().to_string();
                if title.is_empty() {
                    return None;
                }
                Some(SourceInfo {
                    source: Source::Window { id },
                    title,
                    is_visible: Self::window_is_visible(w),
                })
            })
            .filter(|info| info.is_visible)
            .collect();

        sources.sort_by_key(|info| info.title.to_lowercase());
        Ok(sources)
    }
}
