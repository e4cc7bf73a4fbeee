//! 모델 ID 기반 텍스트 추출기 선택.
//!
//! `tesseract`는 내장 OCR로, 나머지는 원격 비전 모델로 보낸다.

use async_trait::async_trait;
use lingshot_core::error::CoreError;
use lingshot_core::models::model::LOCAL_OCR_MODEL_ID;
use lingshot_core::ports::ocr_provider::TextExtractor;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct OcrRouter {
    remote: Arc<dyn TextExtractor>,
    local: Arc<dyn TextExtractor>,
}

impl OcrRouter {
    pub fn new(remote: Arc<dyn TextExtractor>, local: Arc<dyn TextExtractor>) -> Self {
        Self { remote, local }
    }

    fn route(&self, model_id: &str) -> &Arc<dyn TextExtractor> {
        if model_id.eq_ignore_ascii_case(LOCAL_OCR_MODEL_ID) {
            &self.local
        } else {
            &self.remote
        }
    }
}

#[async_trait]
impl TextExtractor for OcrRouter {
    async fn extract_text(
        &self,
        image: &[u8],
        image_format: &str,
        model_id: &str,
        timeout: Duration,
    ) -> Result<String, CoreError> {
        let provider = self.route(model_id);
        debug!(model_id, provider = provider.provider_name(), "텍스트 추출기 선택");
        provider
            .extract_text(image, image_format, model_id, timeout)
            .await
    }

    fn provider_name(&self) -> &str {
        "ocr-router"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl TextExtractor for Named {
        async fn extract_text(
            &self,
            _image: &[u8],
            _image_format: &str,
            _model_id: &str,
            _timeout: Duration,
        ) -> Result<String, CoreError> {
            Ok(self.0.to_string())
        }

        fn provider_name(&self) -> &str {
            self.0
        }
    }

    #[tokio::test]
    async fn routes_by_model_id() {
        let router = OcrRouter::new(Arc::new(Named("remote")), Arc::new(Named("local")));
        let timeout = Duration::from_secs(1);

        let text = router.extract_text(&[], "png", "tesseract", timeout).await.unwrap();
        assert_eq!(text, "local");
        let text = router.extract_text(&[], "png", "Tesseract", timeout).await.unwrap();
        assert_eq!(text, "local");
        let text = router
            .extract_text(&[], "png", "nanonets-ocr-s", timeout)
            .await
            .unwrap();
        assert_eq!(text, "remote");
    }
}
