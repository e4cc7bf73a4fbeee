//! 화면 변경 감시 루프.
//!
//! 실행 중에는 `check_interval_secs`마다 선택된 대상을 캡처해 직전 프레임과 비교하고,
//! 화면이 바뀌었으면 번역 작업을 시작한다. 사이클 실패는 로그만 남기고 다음 사이클로 넘어간다.

use lingshot_core::error::CoreError;
use lingshot_core::models::frame::{Frame, Source};
use lingshot_core::models::status::{MonitorAction, MonitorState};
use lingshot_core::ports::capture::FrameSource;
use lingshot_vision::frame_cache::FrameCache;
use lingshot_vision::similarity::SimilarityGate;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::SharedState;
use crate::task::TaskController;

/// 감시 사이클 1회의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 선택된 대상 없음
    NoSource,
    /// 대상이 최소화되었거나 사라짐 (캡처 생략)
    SourceHidden,
    /// 캡처 실패 (다음 사이클에 재시도)
    CaptureFailed,
    /// 직전 프레임과 유사
    Unchanged,
    /// 변경 감지 → 작업 시작
    TaskStarted(Uuid),
    /// 변경 감지했지만 작업이 이미 실행 중
    TaskBusy,
    /// 중지 요청 이후라 작업 시작 생략
    Stopped,
}

struct RunControl {
    state: MonitorState,
    /// 현재 루프의 중지 신호. 루프가 없으면 None.
    stop_tx: Option<watch::Sender<bool>>,
}

/// 모니터 루프
pub struct MonitorLoop {
    state: Arc<SharedState>,
    frame_source: Arc<dyn FrameSource>,
    cache: Arc<FrameCache>,
    gate: SimilarityGate,
    tasks: Arc<TaskController>,
    run: Mutex<RunControl>,
}

impl MonitorLoop {
    pub fn new(
        state: Arc<SharedState>,
        frame_source: Arc<dyn FrameSource>,
        cache: Arc<FrameCache>,
        gate: SimilarityGate,
        tasks: Arc<TaskController>,
    ) -> Self {
        Self {
            state,
            frame_source,
            cache,
            gate,
            tasks,
            run: Mutex::new(RunControl {
                state: MonitorState::Idle,
                stop_tx: None,
            }),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.run.lock().state
    }

    /// 시작 / 일시정지 / 중지
    ///
    /// - `Start`: 루프 생성 (이미 실행 중이면 무시)
    /// - `Pause`: 루프만 멈추고 진행 중 작업은 유지
    /// - `Stop`: 루프를 멈추고 진행 중 작업도 취소
    pub fn control(self: &Arc<Self>, action: MonitorAction) -> MonitorState {
        let mut run = self.run.lock();
        match action {
            MonitorAction::Start => {
                if run.state != MonitorState::Running {
                    let (stop_tx, stop_rx) = watch::channel(false);
                    run.stop_tx = Some(stop_tx);
                    run.state = MonitorState::Running;
                    self.spawn_loop(stop_rx);
                }
            }
            MonitorAction::Pause => {
                Self::halt(&mut run);
                if run.state == MonitorState::Running {
                    run.state = MonitorState::Paused;
                }
            }
            MonitorAction::Stop => {
                Self::halt(&mut run);
                run.state = MonitorState::Idle;
                drop(run);
                info!("모니터 중지");
                self.tasks.cancel_current();
                return MonitorState::Idle;
            }
        }
        info!(?action, state = ?run.state, "모니터 제어");
        run.state
    }

    fn halt(run: &mut RunControl) {
        if let Some(stop_tx) = run.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }

    fn spawn_loop(self: &Arc<Self>, mut stop_rx: watch::Receiver<bool>) {
        let monitor = Arc::clone(self);
        let halt_rx = stop_rx.clone();
        tokio::spawn(async move {
            info!("모니터 루프 시작");
            loop {
                tokio::select! {
                    outcome = monitor.cycle(Some(&halt_rx)) => {
                        debug!(?outcome, "감시 사이클 완료");
                    }
                    _ = stop_rx.changed() => break,
                }

                let interval = monitor.state.settings().check_interval();
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_rx.changed() => break,
                }
            }
            info!("모니터 루프 종료");
        });
    }

    /// 감시 사이클 1회 실행
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.cycle(None).await
    }

    /// `stop`이 주어지면 작업 시작 직전에 중지 신호를 다시 확인한다.
    /// 확인과 시작은 `run` 잠금 안에서 이루어지므로 `Stop` 반환 뒤에 새 작업이 생기지 않는다.
    async fn cycle(&self, stop: Option<&watch::Receiver<bool>>) -> CycleOutcome {
        let Some(info) = self.state.selected_source() else {
            return CycleOutcome::NoSource;
        };
        let source = info.source;
        let settings = self.state.settings();

        let frame_source = Arc::clone(&self.frame_source);
        let visible = tokio::task::spawn_blocking(move || frame_source.is_visible(&source))
            .await
            .unwrap_or(false);
        if !visible {
            debug!(%source, "대상이 보이지 않음, 캡처 생략");
            return CycleOutcome::SourceHidden;
        }

        let frame = match self.capture(source).await {
            Ok(frame) => frame,
            Err(e) => {
                warn!(%source, "감시 캡처 실패: {e}");
                return CycleOutcome::CaptureFailed;
            }
        };

        if let Some(previous) = self.cache.last_for(&source) {
            let gate = self.gate;
            let threshold = settings.similarity_threshold;
            let current = frame.clone();
            let similar = tokio::task::spawn_blocking(move || {
                gate.is_similar(&previous, &current, threshold)
            })
            .await
            .unwrap_or(false);
            if similar {
                return CycleOutcome::Unchanged;
            }
        }

        // 잠금 순서: run → 작업 슬롯. Stop은 run을 놓은 뒤 취소하므로 교착 없음
        let _run = self.run.lock();
        if stop.is_some_and(|rx| *rx.borrow()) {
            debug!(%source, "중지 요청됨, 작업 시작 생략");
            return CycleOutcome::Stopped;
        }
        self.cache.remember(frame);
        match self.tasks.start(source, settings.task_settings()) {
            Ok(handle) => {
                info!(%source, task_id = %handle.id(), "화면 변경 감지, 번역 시작");
                CycleOutcome::TaskStarted(handle.id())
            }
            Err(CoreError::AlreadyRunning) => {
                debug!("화면 변경 감지, 작업 진행 중이라 건너뜀");
                CycleOutcome::TaskBusy
            }
            Err(e) => {
                warn!("작업 시작 실패: {e}");
                CycleOutcome::TaskBusy
            }
        }
    }

    async fn capture(&self, source: Source) -> Result<Frame, CoreError> {
        let frame_source = Arc::clone(&self.frame_source);
        tokio::task::spawn_blocking(move || frame_source.capture(&source))
            .await
            .map_err(|e| CoreError::Internal(format!("캡처 태스크 실패: {e}")))?
    }
}
