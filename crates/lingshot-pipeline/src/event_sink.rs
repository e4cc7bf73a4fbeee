//! 파이프라인 이벤트 전달.
//!
//! 구독자마다 크기가 제한된 mpsc 큐를 하나씩 둔다. 발행은 절대 막히지 않으며
//! 큐가 가득 찼거나 닫힌 구독자는 자동으로 제거된다.

use lingshot_core::models::event::PipelineEvent;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// 구독자별 기본 큐 크기
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 256;

/// 이벤트 구독 핸들
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<PipelineEvent>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 다음 이벤트 대기. 구독이 해제되면 `None`.
    pub async fn recv(&mut self) -> Option<PipelineEvent> {
        self.rx.recv().await
    }

    /// 대기 없이 꺼내기 (테스트, 콘솔 출력용)
    pub fn try_recv(&mut self) -> Option<PipelineEvent> {
        self.rx.try_recv().ok()
    }

    /// SSE 응답용 스트림으로 변환
    pub fn into_stream(self) -> ReceiverStream<PipelineEvent> {
        ReceiverStream::new(self.rx)
    }
}

/// 이벤트 팬아웃 싱크
pub struct EventSink {
    subscribers: Mutex<HashMap<u64, mpsc::Sender<PipelineEvent>>>,
    next_id: AtomicU64,
    buffer: usize,
}

impl EventSink {
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    /// 새 구독자 등록
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.buffer);
        self.subscribers.lock().insert(id, tx);
        debug!(subscriber = id, "이벤트 구독 등록");
        Subscription { id, rx }
    }

    /// 구독 해제. 등록되어 있었으면 true.
    pub fn unsubscribe(&self, id: u64) -> bool {
        let removed = self.subscribers.lock().remove(&id).is_some();
        if removed {
            debug!(subscriber = id, "이벤트 구독 해제");
        }
        removed
    }

    /// 모든 구독자에게 발행. 전달된 구독자 수를 반환한다.
    ///
    /// 락을 쥔 채 전송하므로 구독자별 수신 순서는 발행 순서와 같다.
    pub fn publish(&self, event: PipelineEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        let mut delivered = 0;
        subscribers.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(subscriber = id, event = event.name(), "구독자 큐 포화, 구독 제거");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(subscriber = id, "닫힌 구독자 제거");
                false
            }
        });
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}
