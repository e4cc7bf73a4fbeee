//! 번역 작업 상태 머신.
//!
//! 캡처 → 텍스트 추출 → 스트리밍 번역을 하나의 async 태스크가 순서대로 실행한다.
//! 시스템 전체에 실행 중인 작업은 최대 하나이며(단일 슬롯), 작업의 모든 이벤트는
//! 슬롯 락을 쥔 상태에서 "아직 살아있는 작업인지" 확인한 뒤에만 발행된다.
//! 따라서 취소된 작업은 이후 어떤 이벤트도 내보내지 않는다.
//!
//! 각 단계 대기 중에는 `tokio::select!`로 다음을 동시에 감시한다.
//! - 취소 신호 (`watch`)
//! - 백엔드 호출 자체
//! - 단계 타임아웃
//! - 스트리밍 청크 채널
//! - 진행 이벤트 타이머

use lingshot_core::config::PipelineConfig;
use lingshot_core::error::CoreError;
use lingshot_core::models::event::{ErrorEvent, PipelineEvent};
use lingshot_core::models::frame::Source;
use lingshot_core::models::task::{
    TaskSettings, TaskStage, TaskState, TranslationResult, NO_TEXT_SENTINEL,
};
use lingshot_core::ports::capture::FrameSource;
use lingshot_core::ports::ocr_provider::TextExtractor;
use lingshot_core::ports::translator::Translator;
use lingshot_vision::encoder;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event_sink::EventSink;
use crate::journal::TranslationJournal;
use crate::results::ResultStore;

/// 작업 종료 결과
#[derive(Debug)]
pub enum TaskOutcome {
    /// 최종 결과 (텍스트가 없으면 안내 문구)
    Completed(TranslationResult),
    /// 단계 실패 또는 타임아웃
    Failed(CoreError),
    /// 외부 취소
    Cancelled,
}

impl TaskOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed(_))
    }
}

/// 실행 중인 작업 핸들. 드롭해도 작업은 계속된다.
pub struct TaskHandle {
    id: Uuid,
    join: JoinHandle<TaskOutcome>,
}

impl TaskHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 작업 종료까지 대기
    pub async fn wait(self) -> TaskOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => TaskOutcome::Failed(CoreError::Internal(format!("작업 태스크 실패: {e}"))),
        }
    }
}

/// 번역 작업이 사용하는 외부 포트 묶음
#[derive(Clone)]
pub struct TaskDeps {
    pub frame_source: Arc<dyn FrameSource>,
    pub extractor: Arc<dyn TextExtractor>,
    pub translator: Arc<dyn Translator>,
}

struct ActiveTask {
    id: Uuid,
    state: TaskState,
    started: Instant,
    cancel_tx: watch::Sender<bool>,
}

impl ActiveTask {
    fn touch(&mut self) {
        self.state.elapsed = self.started.elapsed().as_secs_f64();
    }
}

#[derive(Default)]
struct Slot {
    active: Option<ActiveTask>,
    /// 마지막으로 끝난 작업의 상태 (유휴 시 조회용)
    last: TaskState,
}

/// 단계 중단 사유
enum Abort {
    Cancelled,
    Failed(CoreError),
}

impl From<CoreError> for Abort {
    fn from(e: CoreError) -> Self {
        Abort::Failed(e)
    }
}

/// 번역 스트림 누적 버퍼
struct StreamBuffer {
    rx: mpsc::UnboundedReceiver<String>,
    open: bool,
    text: String,
    dirty: bool,
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl StreamBuffer {
    fn new(rx: mpsc::UnboundedReceiver<String>, min_interval: Duration) -> Self {
        Self {
            rx,
            open: true,
            text: String::new(),
            dirty: false,
            last_emit: None,
            min_interval,
        }
    }

    fn push(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        self.dirty = true;
    }

    /// 최소 간격이 지났고 새 내용이 있으면 내보낼 텍스트 반환
    fn take_due(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        let due = self
            .last_emit
            .map_or(true, |at| at.elapsed() >= self.min_interval);
        if !due {
            return None;
        }
        self.dirty = false;
        self.last_emit = Some(Instant::now());
        Some(self.text.clone())
    }
}

async fn next_chunk(stream: &mut Option<&mut StreamBuffer>) -> Option<String> {
    match stream {
        Some(buffer) => buffer.rx.recv().await,
        None => std::future::pending().await,
    }
}

/// 단일 작업 컨트롤러
pub struct TaskController {
    deps: TaskDeps,
    sink: Arc<EventSink>,
    results: Arc<ResultStore>,
    journal: Option<TranslationJournal>,
    timing: PipelineConfig,
    slot: Mutex<Slot>,
    idle_tx: watch::Sender<bool>,
}

impl TaskController {
    pub fn new(
        deps: TaskDeps,
        sink: Arc<EventSink>,
        results: Arc<ResultStore>,
        timing: PipelineConfig,
    ) -> Self {
        let (idle_tx, _) = watch::channel(true);
        Self {
            deps,
            sink,
            results,
            journal: None,
            timing,
            slot: Mutex::new(Slot::default()),
            idle_tx,
        }
    }

    /// 완료된 번역을 기록 파일에도 남긴다
    pub fn with_journal(mut self, journal: TranslationJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    // ============================================================
    // 제어
    // ============================================================

    /// 새 작업 시작. 다른 작업이 살아있으면 `AlreadyRunning`.
    pub fn start(
        self: &Arc<Self>,
        source: Source,
        settings: TaskSettings,
    ) -> Result<TaskHandle, CoreError> {
        let id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        {
            let mut slot = self.slot.lock();
            if slot.active.is_some() {
                return Err(CoreError::AlreadyRunning);
            }
            let state = TaskState::started(id);
            slot.active = Some(ActiveTask {
                id,
                state: state.clone(),
                started: Instant::now(),
                cancel_tx,
            });
            self.idle_tx.send_replace(false);
            self.sink.publish(PipelineEvent::TaskProgress(state));
        }
        info!(task_id = %id, %source, "번역 작업 시작");

        let controller = Arc::clone(self);
        let join = tokio::spawn(async move { controller.run(id, source, settings, cancel_rx).await });
        Ok(TaskHandle { id, join })
    }

    /// 지정한 작업 취소. 살아있는 작업이었으면 true.
    ///
    /// 슬롯은 즉시 비워지고 해당 작업은 더 이상 이벤트를 내보내지 않는다.
    pub fn cancel(&self, task_id: Uuid) -> bool {
        let mut slot = self.slot.lock();
        if slot.active.as_ref().map(|t| t.id) != Some(task_id) {
            return false;
        }
        self.cancel_locked(&mut slot).is_some()
    }

    /// 현재 작업 취소. 취소된 작업 ID 반환.
    pub fn cancel_current(&self) -> Option<Uuid> {
        let mut slot = self.slot.lock();
        self.cancel_locked(&mut slot)
    }

    fn cancel_locked(&self, slot: &mut Slot) -> Option<Uuid> {
        let mut task = slot.active.take()?;
        task.touch();
        task.state.stage = TaskStage::Cancelled;
        task.state.running = false;
        task.state.cancel_requested = true;
        let _ = task.cancel_tx.send(true);
        slot.last = task.state;
        self.idle_tx.send_replace(true);
        info!(task_id = %task.id, "번역 작업 취소");
        Some(task.id)
    }

    pub fn is_running(&self) -> bool {
        self.slot.lock().active.is_some()
    }

    /// 현재 작업 상태 (유휴면 마지막 작업의 종료 상태)
    pub fn state(&self) -> TaskState {
        let mut slot = self.slot.lock();
        match slot.active.as_mut() {
            Some(task) => {
                task.touch();
                task.state.clone()
            }
            None => slot.last.clone(),
        }
    }

    /// 슬롯이 빌 때까지 대기
    pub async fn wait_idle(&self) {
        let mut rx = self.idle_tx.subscribe();
        let _ = rx.wait_for(|idle| *idle).await;
    }

    // ============================================================
    // 실행
    // ============================================================

    async fn run(
        self: Arc<Self>,
        id: Uuid,
        source: Source,
        settings: TaskSettings,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> TaskOutcome {
        match self.execute(id, source, &settings, &mut cancel_rx).await {
            Ok((extracted, translation)) => self.complete(id, extracted, translation).await,
            Err(Abort::Cancelled) => {
                debug!(task_id = %id, "취소된 작업 종료");
                TaskOutcome::Cancelled
            }
            Err(Abort::Failed(e)) => self.fail(id, e),
        }
    }

    /// 단계 실행. 추출 텍스트가 없으면 번역문은 `None`.
    async fn execute(
        &self,
        id: Uuid,
        source: Source,
        settings: &TaskSettings,
        cancel_rx: &mut watch::Receiver<bool>,
    ) -> Result<(String, Option<String>), Abort> {
        let timeout = settings.timeout;

        // 1. 캡처 (블로킹 풀)
        let frame_source = Arc::clone(&self.deps.frame_source);
        let capture = async move {
            tokio::task::spawn_blocking(move || frame_source.capture(&source))
                .await
                .map_err(|e| CoreError::Internal(format!("캡처 태스크 실패: {e}")))?
        };
        let frame = self.drive(id, capture, timeout, cancel_rx, None).await?;

        // 2. 텍스트 추출
        self.advance(id, TaskStage::Extracting)?;
        let encode = async move {
            tokio::task::spawn_blocking(move || encoder::encode_png(&frame))
                .await
                .map_err(|e| CoreError::Internal(format!("인코딩 태스크 실패: {e}")))?
        };
        let png = self.drive(id, encode, timeout, cancel_rx, None).await?;

        let extraction =
            self.deps
                .extractor
                .extract_text(&png, "png", &settings.ocr_model_id, timeout);
        let extracted = self.drive(id, extraction, timeout, cancel_rx, None).await?;
        let extracted = extracted.trim().to_string();
        if extracted.is_empty() {
            info!(task_id = %id, "추출된 텍스트 없음");
            return Ok((extracted, None));
        }
        debug!(task_id = %id, chars = extracted.chars().count(), provider = self.deps.extractor.provider_name(), "텍스트 추출 완료");

        // 3. 스트리밍 번역
        self.advance(id, TaskStage::Translating)?;
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let mut stream = StreamBuffer::new(chunk_rx, self.timing.stream_emit_interval());
        let translation = self.deps.translator.translate(
            &extracted,
            &settings.translation_model_id,
            timeout,
            chunk_tx,
        );
        let translation = self
            .drive(id, translation, timeout, cancel_rx, Some(&mut stream))
            .await?;
        let translation = translation.trim().to_string();
        if translation.is_empty() {
            return Err(Abort::Failed(CoreError::Network(
                "번역 백엔드가 빈 결과를 반환했습니다".to_string(),
            )));
        }

        Ok((extracted, Some(translation)))
    }

    /// 단계 하나를 실행하며 취소·타임아웃·청크·진행 타이머를 함께 처리한다
    async fn drive<F, T>(
        &self,
        id: Uuid,
        work: F,
        timeout: Duration,
        cancel_rx: &mut watch::Receiver<bool>,
        mut stream: Option<&mut StreamBuffer>,
    ) -> Result<T, Abort>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        if *cancel_rx.borrow() {
            return Err(Abort::Cancelled);
        }
        tokio::pin!(work);
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let period = self.timing.progress_interval();
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let stream_open = stream.as_ref().is_some_and(|s| s.open);
            tokio::select! {
                biased;

                _ = cancel_rx.changed() => return Err(Abort::Cancelled),
                result = &mut work => return result.map_err(Abort::Failed),
                _ = &mut deadline => {
                    warn!(task_id = %id, timeout_ms = timeout.as_millis() as u64, "단계 타임아웃");
                    return Err(Abort::Failed(CoreError::timeout(timeout)));
                }
                chunk = next_chunk(&mut stream), if stream_open => {
                    if let Some(buffer) = stream.as_deref_mut() {
                        match chunk {
                            Some(chunk) => {
                                buffer.push(&chunk);
                                self.flush_partial(id, buffer)?;
                            }
                            None => buffer.open = false,
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.tick(id)?;
                    if let Some(buffer) = stream.as_deref_mut() {
                        self.flush_partial(id, buffer)?;
                    }
                }
            }
        }
    }

    // ============================================================
    // 발행 (슬롯 락 안에서만)
    // ============================================================

    /// 살아있는 작업이면 `f` 실행. 이미 취소되었으면 `Abort::Cancelled`.
    fn with_live<R>(&self, id: Uuid, f: impl FnOnce(&mut ActiveTask) -> R) -> Result<R, Abort> {
        let mut slot = self.slot.lock();
        match slot.active.as_mut() {
            Some(task) if task.id == id => {
                task.touch();
                Ok(f(task))
            }
            _ => Err(Abort::Cancelled),
        }
    }

    /// 살아있는 작업을 슬롯에서 꺼내 종료 처리
    fn finish_live<R>(&self, id: Uuid, f: impl FnOnce(&mut ActiveTask) -> R) -> Option<R> {
        let mut slot = self.slot.lock();
        if slot.active.as_ref().map(|t| t.id) != Some(id) {
            return None;
        }
        let mut task = slot.active.take()?;
        task.touch();
        task.state.running = false;
        let out = f(&mut task);
        slot.last = task.state;
        self.idle_tx.send_replace(true);
        Some(out)
    }

    fn advance(&self, id: Uuid, stage: TaskStage) -> Result<(), Abort> {
        self.with_live(id, |task| {
            task.state.stage = stage;
            self.sink.publish(PipelineEvent::TaskProgress(task.state.clone()));
        })?;
        info!(task_id = %id, stage = ?stage, "작업 단계 전환");
        Ok(())
    }

    fn tick(&self, id: Uuid) -> Result<(), Abort> {
        self.with_live(id, |task| {
            self.sink.publish(PipelineEvent::TaskProgress(task.state.clone()));
        })
    }

    fn flush_partial(&self, id: Uuid, buffer: &mut StreamBuffer) -> Result<(), Abort> {
        self.with_live(id, |task| {
            if let Some(text) = buffer.take_due() {
                let partial = TranslationResult::partial(
                    id,
                    text,
                    task.state.stage,
                    task.started.elapsed(),
                );
                self.sink.publish(PipelineEvent::TranslationResult(partial));
            }
        })
    }

    async fn complete(&self, id: Uuid, extracted: String, translation: Option<String>) -> TaskOutcome {
        let text = translation.clone().unwrap_or_else(|| NO_TEXT_SENTINEL.to_string());
        let finished = self.finish_live(id, |task| {
            task.state.stage = TaskStage::Completed;
            let result = TranslationResult::completed(id, text, task.started.elapsed());
            self.results.push(result.clone());
            self.sink.publish(PipelineEvent::TaskProgress(task.state.clone()));
            self.sink.publish(PipelineEvent::TranslationResult(result.clone()));
            result
        });
        let Some(result) = finished else {
            return TaskOutcome::Cancelled;
        };
        info!(task_id = %id, processing_time = result.processing_time, "번역 작업 완료");

        if let (Some(journal), Some(translation)) = (&self.journal, translation) {
            journal.append(&extracted, &translation).await;
        }
        TaskOutcome::Completed(result)
    }

    fn fail(&self, id: Uuid, error: CoreError) -> TaskOutcome {
        let published = self.finish_live(id, |task| {
            task.state.stage = TaskStage::Error;
            self.sink.publish(PipelineEvent::TaskProgress(task.state.clone()));
            self.sink
                .publish(PipelineEvent::Error(ErrorEvent::from_error(&error, Some(id))));
        });
        if published.is_none() {
            return TaskOutcome::Cancelled;
        }
        warn!(task_id = %id, "번역 작업 실패: {error}");
        TaskOutcome::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use lingshot_core::error::ErrorKind;

    fn settings(timeout: Duration) -> TaskSettings {
        TaskSettings {
            timeout,
            ocr_model_id: "ocr".to_string(),
            translation_model_id: "llm".to_string(),
        }
    }

    fn controller(
        frames: Arc<MockFrameSource>,
        extractor: MockExtractor,
        translator: MockTranslator,
    ) -> (Arc<TaskController>, Arc<EventSink>, Arc<ResultStore>) {
        let sink = Arc::new(EventSink::new(1024));
        let results = Arc::new(ResultStore::new());
        let deps = TaskDeps {
            frame_source: frames,
            extractor: Arc::new(extractor),
            translator: Arc::new(translator),
        };
        let controller = Arc::new(TaskController::new(
            deps,
            Arc::clone(&sink),
            Arc::clone(&results),
            fast_timing(),
        ));
        (controller, sink, results)
    }

    fn frames() -> Arc<MockFrameSource> {
        Arc::new(MockFrameSource::new(checker_frame(Source::FullScreen)))
    }

    #[tokio::test]
    async fn completes_with_stage_order_and_single_terminal() {
        let (tasks, sink, results) = controller(
            frames(),
            MockExtractor::new("こんにちは"),
            MockTranslator::new(&["Hel", "lo"]),
        );
        let mut sub = sink.subscribe();

        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        let id = handle.id();
        let outcome = handle.wait().await;
        assert!(outcome.is_completed());

        let events = collect_until_terminal(&mut sub, id).await;
        let mut last_ordinal = 0;
        for event in &events {
            if let PipelineEvent::TaskProgress(state) = event {
                assert!(state.stage.ordinal() >= last_ordinal, "단계 역행: {:?}", state.stage);
                last_ordinal = state.stage.ordinal();
            }
        }
        let terminals = events.iter().filter(|e| is_terminal(e)).count();
        assert_eq!(terminals, 1);

        // 종료 직전 이벤트는 completed 진행 상태
        match &events[events.len() - 2] {
            PipelineEvent::TaskProgress(state) => {
                assert_eq!(state.stage, TaskStage::Completed);
                assert!(!state.running);
            }
            other => panic!("예상치 못한 이벤트: {other:?}"),
        }
        match events.last().unwrap() {
            PipelineEvent::TranslationResult(r) => {
                assert_eq!(r.text, "Hello");
                assert!(!r.is_streaming);
            }
            other => panic!("예상치 못한 이벤트: {other:?}"),
        }
        assert_eq!(results.len(), 1);
        assert!(!tasks.is_running());
        assert_eq!(tasks.state().stage, TaskStage::Completed);
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_running() {
        let (tasks, _sink, _results) = controller(
            frames(),
            MockExtractor::new("text").with_delay(Duration::from_millis(300)),
            MockTranslator::new(&["ok"]),
        );
        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        let err = tasks
            .start(Source::FullScreen, settings(Duration::from_secs(5)))
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::AlreadyRunning));
        assert!(handle.wait().await.is_completed());

        // 종료 후에는 다시 시작 가능
        let again = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        assert!(again.wait().await.is_completed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_admit_exactly_one() {
        const CALLERS: usize = 16;
        let (tasks, _sink, _results) = controller(
            frames(),
            MockExtractor::new("text").with_delay(Duration::from_millis(300)),
            MockTranslator::new(&["ok"]),
        );
        let barrier = Arc::new(tokio::sync::Barrier::new(CALLERS));

        let callers: Vec<_> = (0..CALLERS)
            .map(|_| {
                let tasks = Arc::clone(&tasks);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    tasks
                        .start(Source::FullScreen, settings(Duration::from_secs(5)))
                        .map(|handle| handle.id())
                })
            })
            .collect();

        let mut admitted = Vec::new();
        let mut rejected = 0;
        for caller in callers {
            match caller.await.unwrap() {
                Ok(id) => admitted.push(id),
                Err(CoreError::AlreadyRunning) => rejected += 1,
                Err(other) => panic!("AlreadyRunning 예상: {other}"),
            }
        }
        assert_eq!(admitted.len(), 1);
        assert_eq!(rejected, CALLERS - 1);
        assert_eq!(tasks.state().task_id, Some(admitted[0]));

        tasks.wait_idle().await;
        assert!(!tasks.is_running());
    }

    #[tokio::test]
    async fn empty_extraction_completes_with_sentinel() {
        let translator = MockTranslator::new(&["never"]);
        let (tasks, sink, results) = controller(frames(), MockExtractor::new("  \n "), translator);
        let mut sub = sink.subscribe();

        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        let id = handle.id();
        match handle.wait().await {
            TaskOutcome::Completed(result) => assert_eq!(result.text, NO_TEXT_SENTINEL),
            other => panic!("완료 예상: {other:?}"),
        }
        let events = collect_until_terminal(&mut sub, id).await;
        assert!(!events.iter().any(|e| matches!(
            e,
            PipelineEvent::TaskProgress(s) if s.stage == TaskStage::Translating
        )));
        assert_eq!(results.list()[0].text, NO_TEXT_SENTINEL);
    }

    #[tokio::test]
    async fn translation_timeout_ends_in_error() {
        let translator =
            MockTranslator::new(&["slow"]).with_chunk_delay(Duration::from_millis(500));
        let (tasks, sink, results) = controller(frames(), MockExtractor::new("text"), translator);
        let mut sub = sink.subscribe();

        let handle = tasks
            .start(Source::FullScreen, settings(Duration::from_millis(100)))
            .unwrap();
        let id = handle.id();
        assert!(matches!(
            handle.wait().await,
            TaskOutcome::Failed(CoreError::Timeout { .. })
        ));

        let events = collect_until_terminal(&mut sub, id).await;
        match events.last().unwrap() {
            PipelineEvent::Error(e) => assert_eq!(e.kind, ErrorKind::Timeout),
            other => panic!("에러 예상: {other:?}"),
        }
        assert!(results.is_empty());
        assert_eq!(tasks.state().stage, TaskStage::Error);
    }

    #[tokio::test]
    async fn capture_failure_ends_in_error() {
        let frames = frames();
        frames.set_failing(true);
        let (tasks, _sink, _results) =
            controller(frames, MockExtractor::new("text"), MockTranslator::new(&["x"]));
        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(1))).unwrap();
        match handle.wait().await {
            TaskOutcome::Failed(e) => assert_eq!(e.kind(), ErrorKind::Capture),
            other => panic!("실패 예상: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_translation_is_backend_error() {
        let (tasks, _sink, _results) =
            controller(frames(), MockExtractor::new("text"), MockTranslator::new(&[" "]));
        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(1))).unwrap();
        match handle.wait().await {
            TaskOutcome::Failed(e) => assert_eq!(e.kind(), ErrorKind::Backend),
            other => panic!("실패 예상: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_stops_emission() {
        let (tasks, sink, results) = controller(
            frames(),
            MockExtractor::new("text").with_delay(Duration::from_millis(400)),
            MockTranslator::new(&["never"]),
        );
        let mut sub = sink.subscribe();

        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        let id = handle.id();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(tasks.cancel(id));
        assert!(!tasks.cancel(id));
        assert!(!tasks.is_running());
        let state = tasks.state();
        assert_eq!(state.stage, TaskStage::Cancelled);
        assert!(state.cancel_requested);

        drain(&mut sub);
        assert!(matches!(handle.wait().await, TaskOutcome::Cancelled));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(drain(&mut sub).iter().all(|e| e.task_id() != Some(id)));
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn cancel_then_wait_idle_allows_restart() {
        let (tasks, _sink, _results) = controller(
            frames(),
            MockExtractor::new("text").with_delay(Duration::from_millis(400)),
            MockTranslator::new(&["ok"]),
        );
        let first = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        assert_eq!(tasks.cancel_current(), Some(first.id()));
        tasks.wait_idle().await;
        let second = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        assert_ne!(first.id(), second.id());
        assert!(tasks.cancel_current().is_some());
    }

    #[tokio::test]
    async fn partial_results_are_rate_limited() {
        let chunks = ["a"; 20];
        let translator = MockTranslator::new(&chunks).with_chunk_delay(Duration::from_millis(5));
        let (tasks, sink, _results) = controller(frames(), MockExtractor::new("text"), translator);
        let mut sub = sink.subscribe();

        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        let id = handle.id();
        handle.wait().await;

        let events = collect_until_terminal(&mut sub, id).await;
        let partials: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::TranslationResult(r) if r.is_streaming => Some(r.clone()),
                _ => None,
            })
            .collect();
        // 100ms 남짓 동안 40ms 간격 제한 → 청크 수보다 훨씬 적다
        assert!(!partials.is_empty());
        assert!(partials.len() < chunks.len());
        for pair in partials.windows(2) {
            assert!(pair[1].text.len() >= pair[0].text.len());
        }
        assert!(partials.iter().all(|r| r.stage == TaskStage::Translating));
    }

    #[tokio::test]
    async fn journal_receives_completed_translation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translation_log.txt");
        let sink = Arc::new(EventSink::default());
        let deps = TaskDeps {
            frame_source: frames(),
            extractor: Arc::new(MockExtractor::new("原文")),
            translator: Arc::new(MockTranslator::new(&["source text"])),
        };
        let tasks = Arc::new(
            TaskController::new(deps, sink, Arc::new(ResultStore::new()), fast_timing())
                .with_journal(TranslationJournal::new(&path)),
        );
        let handle = tasks.start(Source::FullScreen, settings(Duration::from_secs(5))).unwrap();
        assert!(handle.wait().await.is_completed());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Extracted: 原文"));
        assert!(content.contains("Translation: source text"));
    }
}
