//! 터미널 출력.
//!
//! 파이프라인 이벤트를 구독해 완료된 번역은 표준 출력으로, 진행 상황과 에러는 로그로 보낸다.

use lingshot_core::models::event::PipelineEvent;
use lingshot_core::models::task::TaskStage;
use lingshot_pipeline::engine::Engine;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 종료 신호까지 이벤트를 출력한다
pub async fn run_console(engine: Arc<Engine>, mut shutdown_rx: watch::Receiver<bool>) {
    let mut subscription = engine.subscribe();
    let subscriber_id = subscription.id();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                match event {
                    Some(event) => present(&event),
                    None => {
                        warn!("이벤트 구독이 끊어짐");
                        break;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                info!("콘솔 출력 종료");
                break;
            }
        }
    }

    engine.unsubscribe(subscriber_id);
}

fn present(event: &PipelineEvent) {
    match event {
        PipelineEvent::TranslationResult(result) if !result.is_streaming => {
            println!();
            println!("── 번역 ({:.1}s) ──", result.processing_time);
            println!("{}", result.text);
        }
        PipelineEvent::TranslationResult(partial) => {
            debug!(task_id = %partial.id, chars = partial.text.chars().count(), "스트리밍 중");
        }
        PipelineEvent::TaskProgress(state) => {
            if state.stage != TaskStage::Idle {
                debug!(stage = ?state.stage, elapsed = state.elapsed, "작업 진행");
            }
        }
        PipelineEvent::StatusUpdate(status) => {
            debug!(status = ?status.status, results = status.translation_count, "상태 변경");
        }
        PipelineEvent::Error(error) => {
            warn!(kind = ?error.kind, "{}", error.message);
        }
    }
}
