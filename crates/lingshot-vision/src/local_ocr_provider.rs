//! 로컬 OCR 제공자: Tesseract 래퍼.
//!
//! `ocr` feature가 꺼져 있으면 호출 시 `CoreError::OcrError`를 반환한다.

use async_trait::async_trait;
use std::time::Duration;

use lingshot_core::error::CoreError;
use lingshot_core::ports::ocr_provider::TextExtractor;

/// 로컬 OCR 제공자 (Tesseract 기반)
pub struct LocalOcrProvider {
    #[cfg_attr(not(feature = "ocr"), allow(dead_code))]
    tessdata_path: Option<std::path::PathBuf>,
}

impl LocalOcrProvider {
    pub fn new() -> Self {
        Self {
            tessdata_path: None,
        }
    }

    /// tessdata 경로 지정
    pub fn with_tessdata(mut self, path: std::path::PathBuf) -> Self {
        self.tessdata_path = Some(path);
        self
    }

    /// 빌드에 Tesseract가 포함되었는지 여부
    pub fn is_available() -> bool {
        cfg!(feature = "ocr")
    }
}

impl Default for LocalOcrProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for LocalOcrProvider {
    async fn extract_text(
        &self,
        image: &[u8],
        _image_format: &str,
        _model_id: &str,
        timeout: Duration,
    ) -> Result<String, CoreError> {
        #[cfg(feature = "ocr")]
        {
            let ocr = crate::ocr::TesseractOcr::new(self.tessdata_path.clone());
            tokio::time::timeout(timeout, ocr.recognize(image.to_vec()))
                .await
                .map_err(|_| CoreError::timeout(timeout))?
                .map_err(|e| CoreError::OcrError(e.to_string()))
        }

        #[cfg(not(feature = "ocr"))]
        {
            let _ = (image, timeout);
            Err(CoreError::OcrError(
                "Tesseract 미포함 빌드 (`ocr` feature 필요)".to_string(),
            ))
        }
    }

    fn provider_name(&self) -> &str {
        "local-tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ocr_provider_name() {
        let provider = LocalOcrProvider::new();
        assert_eq!(provider.provider_name(), "local-tesseract");
        assert_eq!(LocalOcrProvider::is_available(), cfg!(feature = "ocr"));
    }

    #[tokio::test]
    async fn local_ocr_provider_invalid_image() {
        let provider = LocalOcrProvider::new();
        let result = provider
            .extract_text(b"fake-image", "png", "tesseract", Duration::from_secs(5))
            .await;
        // feature 유무와 관계없이 디코딩 불가 이미지는 에러
        assert!(matches!(result, Err(CoreError::OcrError(_))));
    }
}
