//! 번역 포트.
//!
//! 스트리밍 번역 백엔드를 추상화한다. 중간 청크는 채널로 전달되며
//! 작업 소유 태스크가 수신한다 (백엔드 스레드에서 상태를 직접 건드리지 않음).

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::CoreError;

/// 스트리밍 번역기
#[async_trait]
pub trait Translator: Send + Sync {
    /// `text`를 번역하고 최종 번역문을 반환한다.
    ///
    /// 수신한 증분 텍스트는 도착 즉시 `chunks`로 보낸다. 수신 측이 닫혀 있으면
    /// 청크 전송은 조용히 무시하고 번역은 계속한다.
    async fn translate(
        &self,
        text: &str,
        model_id: &str,
        timeout: Duration,
        chunks: mpsc::UnboundedSender<String>,
    ) -> Result<String, CoreError>;

    /// 제공자 이름
    fn provider_name(&self) -> &str;
}
