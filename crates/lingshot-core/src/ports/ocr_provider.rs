//! 텍스트 추출 포트.
//!
//! 외부 비전 모델 API 또는 내장 Tesseract를 추상화한다.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CoreError;

/// 이미지 → 텍스트 추출기
///
/// 구현체: `RemoteOcrProvider` (비전 모델 API), `LocalOcrProvider` (Tesseract)
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// 이미지에서 텍스트 추출. 빈 문자열은 "텍스트 없음"을 뜻한다.
    ///
    /// - `image`: 인코딩된 이미지 바이트
    /// - `image_format`: 이미지 형식 ("png" 등)
    /// - `model_id`: 사용할 모델 ID
    /// - `timeout`: 호출 전체 제한 시간
    async fn extract_text(
        &self,
        image: &[u8],
        image_format: &str,
        model_id: &str,
        timeout: Duration,
    ) -> Result<String, CoreError>;

    /// 제공자 이름 (예: "local-tesseract", "remote-vision")
    fn provider_name(&self) -> &str;
}
