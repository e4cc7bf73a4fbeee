//! 파이프라인 제어 진입점.
//!
//! 웹 API와 앱 바이너리는 [`Engine`]만 사용한다. 상태를 바꾸는 모든 명령은
//! 처리 후 `status_update` 이벤트를 발행하고, 실패하면 `error` 이벤트도 함께 발행한다.

use lingshot_core::config::{PipelineConfig, SettingsUpdate, TranslationSettings};
use lingshot_core::error::CoreError;
use lingshot_core::models::event::{ErrorEvent, PipelineEvent};
use lingshot_core::models::frame::{Source, SourceInfo};
use lingshot_core::models::status::{AppStatus, MonitorAction, MonitorState};
use lingshot_core::models::task::TranslationResult;
use lingshot_core::ports::capture::FrameSource;
use lingshot_core::ports::ocr_provider::TextExtractor;
use lingshot_core::ports::translator::Translator;
use lingshot_vision::frame_cache::FrameCache;
use lingshot_vision::similarity::SimilarityGate;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::event_sink::{EventSink, Subscription};
use crate::journal::TranslationJournal;
use crate::monitor::{CycleOutcome, MonitorLoop};
use crate::results::ResultStore;
use crate::state::SharedState;
use crate::task::{TaskController, TaskDeps};

/// [`Engine`] 조립기
pub struct EngineBuilder {
    deps: TaskDeps,
    settings: TranslationSettings,
    pipeline: PipelineConfig,
    journal: Option<TranslationJournal>,
}

impl EngineBuilder {
    pub fn new(
        frame_source: Arc<dyn FrameSource>,
        extractor: Arc<dyn TextExtractor>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            deps: TaskDeps {
                frame_source,
                extractor,
                translator,
            },
            settings: TranslationSettings::default(),
            pipeline: PipelineConfig::default(),
            journal: None,
        }
    }

    pub fn with_settings(mut self, settings: TranslationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_pipeline_config(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_journal(mut self, journal: TranslationJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn build(self) -> Arc<Engine> {
        let sink = Arc::new(EventSink::new(self.pipeline.event_buffer));
        let results = Arc::new(ResultStore::new());
        let state = Arc::new(SharedState::new(self.settings));
        let cache = Arc::new(FrameCache::new());

        let mut tasks = TaskController::new(
            self.deps.clone(),
            Arc::clone(&sink),
            Arc::clone(&results),
            self.pipeline.clone(),
        );
        if let Some(journal) = self.journal {
            tasks = tasks.with_journal(journal);
        }
        let tasks = Arc::new(tasks);

        let monitor = Arc::new(MonitorLoop::new(
            Arc::clone(&state),
            Arc::clone(&self.deps.frame_source),
            Arc::clone(&cache),
            SimilarityGate::new(self.pipeline.similarity_size),
            Arc::clone(&tasks),
        ));

        Arc::new(Engine {
            frame_source: self.deps.frame_source,
            state,
            cache,
            tasks,
            monitor,
            sink,
            results,
        })
    }
}

/// 파이프라인 제어 표면
pub struct Engine {
    frame_source: Arc<dyn FrameSource>,
    state: Arc<SharedState>,
    cache: Arc<FrameCache>,
    tasks: Arc<TaskController>,
    monitor: Arc<MonitorLoop>,
    sink: Arc<EventSink>,
    results: Arc<ResultStore>,
}

impl Engine {
    // ============================================================
    // 캡처 대상
    // ============================================================

    /// 캡처 대상 선택. `window_id`가 없으면 전체 화면.
    ///
    /// 대상이 바뀌면 프레임 캐시를 비운다.
    pub async fn select_source(
        &self,
        window_id: Option<u32>,
        title: Option<String>,
    ) -> Result<SourceInfo, CoreError> {
        let result = self.resolve_source(window_id, title).await;
        let info = self.report(result)?;

        if self.state.select_source(info.clone()) {
            self.cache.reset();
            info!(source = %info.source, title = %info.title, "캡처 대상 변경");
        }
        self.publish_status();
        Ok(info)
    }

    async fn resolve_source(
        &self,
        window_id: Option<u32>,
        title: Option<String>,
    ) -> Result<SourceInfo, CoreError> {
        let Some(id) = window_id else {
            return Ok(SourceInfo::full_screen());
        };
        let source = Source::Window { id };
        let listed = self
            .list_windows()
            .await?
            .into_iter()
            .find(|w| w.source == source);
        if let Some(mut info) = listed {
            if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
                info.title = title;
            }
            return Ok(info);
        }

        let frame_source = Arc::clone(&self.frame_source);
        let visible = tokio::task::spawn_blocking(move || frame_source.is_visible(&source))
            .await
            .unwrap_or(false);
        if !visible {
            return Err(CoreError::InvalidSource(format!("창을 찾을 수 없음: {id}")));
        }
        Ok(SourceInfo {
            source,
            title: title.unwrap_or_else(|| format!("Window {id}")),
            is_visible: true,
        })
    }

    /// 선택 가능한 대상 목록 (전체 화면 + 창)
    pub async fn list_windows(&self) -> Result<Vec<SourceInfo>, CoreError> {
        let frame_source = Arc::clone(&self.frame_source);
        let windows = tokio::task::spawn_blocking(move || frame_source.list_sources())
            .await
            .map_err(|e| CoreError::Internal(format!("창 목록 태스크 실패: {e}")))??;
        let mut sources = Vec::with_capacity(windows.len() + 1);
        sources.push(SourceInfo::full_screen());
        sources.extend(windows);
        Ok(sources)
    }

    // ============================================================
    // 모니터 / 작업 제어
    // ============================================================

    /// 모니터 시작 / 일시정지 / 중지
    ///
    /// 대상이 선택되지 않은 상태의 `Start`는 `InvalidSource`로 거절한다.
    pub fn control_monitor(&self, action: MonitorAction) -> Result<MonitorState, CoreError> {
        if action == MonitorAction::Start && self.state.selected_source().is_none() {
            return self.report(Err(CoreError::InvalidSource(
                "캡처 대상이 선택되지 않았습니다".to_string(),
            )));
        }
        let state = self.monitor.control(action);
        self.publish_status();
        Ok(state)
    }

    /// 유사도 검사 없이 즉시 번역 작업 시작
    ///
    /// 작업이 이미 실행 중이면 `AlreadyRunning`으로 거절한다.
    pub fn force_now(&self) -> Result<Uuid, CoreError> {
        let result = match self.state.selected_source() {
            None => Err(CoreError::InvalidSource("캡처 대상이 선택되지 않았습니다".to_string())),
            Some(info) => self
                .tasks
                .start(info.source, self.state.settings().task_settings())
                .map(|handle| handle.id()),
        };
        let id = self.report(result)?;
        info!(task_id = %id, "즉시 번역 요청");
        self.publish_status();
        Ok(id)
    }

    /// 진행 중 작업 취소
    pub fn stop_task(&self) -> Option<Uuid> {
        let cancelled = self.tasks.cancel_current();
        self.publish_status();
        cancelled
    }

    /// 현재 작업이 끝날 때까지 대기 (취소 후 재시작용)
    pub async fn wait_idle(&self) {
        self.tasks.wait_idle().await;
    }

    /// 모니터 사이클 1회 수동 실행
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.monitor.run_cycle().await
    }

    /// 프레임 캐시 초기화. 다음 사이클은 무조건 변경으로 판단한다.
    pub fn reset_cache(&self) {
        self.cache.reset();
        info!("프레임 캐시 초기화");
        self.publish_status();
    }

    // ============================================================
    // 설정 / 결과
    // ============================================================

    pub fn settings(&self) -> TranslationSettings {
        self.state.settings()
    }

    /// 설정 부분 갱신. 다음 사이클/작업부터 적용된다.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<TranslationSettings, CoreError> {
        let result = self.state.update_settings(update);
        let settings = self.report(result)?;
        info!(?settings, "번역 설정 변경");
        self.publish_status();
        Ok(settings)
    }

    pub fn list_results(&self) -> Vec<TranslationResult> {
        self.results.list()
    }

    pub fn get_result(&self, id: Uuid) -> Option<TranslationResult> {
        self.results.get(id)
    }

    pub fn delete_result(&self, id: Uuid) -> Result<(), CoreError> {
        let result = if self.results.delete(id) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                resource_type: "TranslationResult".to_string(),
                id: id.to_string(),
            })
        };
        self.report(result)?;
        self.publish_status();
        Ok(())
    }

    pub fn clear_results(&self) -> usize {
        let cleared = self.results.clear();
        info!(cleared, "번역 결과 전체 삭제");
        self.publish_status();
        cleared
    }

    // ============================================================
    // 상태 / 구독
    // ============================================================

    pub fn status(&self) -> AppStatus {
        let status = self.monitor.state();
        AppStatus {
            status,
            monitoring_paused: status == MonitorState::Paused,
            selected_source: self.state.selected_source(),
            task_state: self.tasks.state(),
            settings: self.state.settings(),
            translation_count: self.results.len(),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        self.sink.subscribe()
    }

    pub fn unsubscribe(&self, id: u64) -> bool {
        self.sink.unsubscribe(id)
    }

    /// 모니터 중지 + 진행 중 작업 취소
    pub fn shutdown(&self) {
        self.monitor.control(MonitorAction::Stop);
        self.tasks.cancel_current();
        info!("파이프라인 종료");
    }

    fn publish_status(&self) {
        self.sink.publish(PipelineEvent::StatusUpdate(self.status()));
    }

    /// 실패면 `error` 이벤트 뒤에 현재 상태를 발행하고 그대로 돌려준다
    fn report<T>(&self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            warn!("제어 명령 실패: {e}");
            self.sink
                .publish(PipelineEvent::Error(ErrorEvent::from_error(e, None)));
            self.publish_status();
        }
        result
    }
}
