//! 공유 파이프라인 상태.
//!
//! 선택된 캡처 대상과 사용자 번역 설정을 소유한다.
//! 모니터 루프와 작업은 사이클/작업 시작 시점에 스냅샷을 떠서 사용한다.

use lingshot_core::config::{SettingsUpdate, TranslationSettings};
use lingshot_core::error::CoreError;
use lingshot_core::models::frame::SourceInfo;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct SharedState {
    selected: RwLock<Option<SourceInfo>>,
    settings: RwLock<TranslationSettings>,
}

impl SharedState {
    pub fn new(settings: TranslationSettings) -> Self {
        Self {
            selected: RwLock::new(None),
            settings: RwLock::new(settings),
        }
    }

    pub fn selected_source(&self) -> Option<SourceInfo> {
        self.selected.read().clone()
    }

    /// 캡처 대상 선택. 대상 식별자가 바뀌었으면 true.
    pub fn select_source(&self, info: SourceInfo) -> bool {
        let mut selected = self.selected.write();
        let changed = selected.as_ref().map(|s| s.source) != Some(info.source);
        *selected = Some(info);
        changed
    }

    pub fn clear_source(&self) -> bool {
        self.selected.write().take().is_some()
    }

    pub fn settings(&self) -> TranslationSettings {
        self.settings.read().clone()
    }

    /// 부분 갱신 적용. 검증 실패 시 기존 설정 유지.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<TranslationSettings, CoreError> {
        let mut settings = self.settings.write();
        let next = update.apply(&settings)?;
        *settings = next.clone();
        Ok(next)
    }

    /// 검증된 설정으로 통째로 교체 (설정 파일 재로드)
    pub fn replace_settings(&self, settings: TranslationSettings) -> Result<(), CoreError> {
        settings.validate()?;
        *self.settings.write() = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingshot_core::models::frame::Source;

    fn window(id: u32, title: &str) -> SourceInfo {
        SourceInfo {
            source: Source::Window { id },
            title: title.to_string(),
            is_visible: true,
        }
    }

    #[test]
    fn select_reports_identity_change() {
        let state = SharedState::default();
        assert!(state.select_source(window(7, "메모장")));
        // 제목만 바뀐 경우는 같은 대상
        assert!(!state.select_source(window(7, "메모장 - 수정됨")));
        assert!(state.select_source(SourceInfo::full_screen()));
        assert_eq!(state.selected_source().unwrap().source, Source::FullScreen);
    }

    #[test]
    fn invalid_update_keeps_settings() {
        let state = SharedState::default();
        let before = state.settings();
        let update = SettingsUpdate {
            similarity_threshold: Some(1.5),
            ..Default::default()
        };
        assert!(state.update_settings(&update).is_err());
        assert_eq!(state.settings(), before);

        let update = SettingsUpdate {
            check_interval_secs: Some(5),
            ..Default::default()
        };
        let next = state.update_settings(&update).unwrap();
        assert_eq!(next.check_interval_secs, 5);
        assert_eq!(state.settings().check_interval_secs, 5);
    }
}
