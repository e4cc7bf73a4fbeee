//! 최근 처리 프레임 캐시.
//!
//! 마지막으로 번역 파이프라인에 넘긴 프레임 하나만 보관한다.
//! 캡처 대상이 바뀌면 호출자가 [`FrameCache::reset`]으로 비운다.

use lingshot_core::models::frame::{Frame, Source};
use parking_lot::Mutex;

/// 단일 프레임 캐시 (스레드 안전)
#[derive(Debug, Default)]
pub struct FrameCache {
    last: Mutex<Option<Frame>>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 처리한 프레임 기억 (이전 값 교체)
    pub fn remember(&self, frame: Frame) {
        *self.last.lock() = Some(frame);
    }

    /// 마지막 프레임 (공유 버퍼 복제)
    pub fn last(&self) -> Option<Frame> {
        self.last.lock().clone()
    }

    /// 마지막 프레임의 캡처 대상
    pub fn source(&self) -> Option<Source> {
        self.last.lock().as_ref().map(|f| f.source())
    }

    /// 같은 대상의 캐시 프레임만 반환
    pub fn last_for(&self, source: &Source) -> Option<Frame> {
        self.last
            .lock()
            .as_ref()
            .filter(|f| f.source() == *source)
            .cloned()
    }

    pub fn reset(&self) {
        *self.last.lock() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.last.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(source: Source) -> Frame {
        Frame::from_rgba(source, 1, 1, vec![0, 0, 0, 255]).unwrap()
    }

    #[test]
    fn remember_and_reset() {
        let cache = FrameCache::new();
        assert!(cache.is_empty());

        cache.remember(frame(Source::Window { id: 1 }));
        assert_eq!(cache.source(), Some(Source::Window { id: 1 }));

        cache.reset();
        assert!(cache.last().is_none());
    }

    #[test]
    fn last_for_checks_source_identity() {
        let cache = FrameCache::new();
        cache.remember(frame(Source::Window { id: 1 }));
        assert!(cache.last_for(&Source::Window { id: 1 }).is_some());
        assert!(cache.last_for(&Source::Window { id: 2 }).is_none());
        assert!(cache.last_for(&Source::FullScreen).is_none());
    }
}
