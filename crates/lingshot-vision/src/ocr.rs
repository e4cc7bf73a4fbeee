//! 내장 Tesseract 인식 (`ocr` feature).
//!
//! PNG 디코딩부터 인식까지 전부 블로킹 풀에서 돈다.

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// 기본 인식 언어. 화면 원문은 대부분 일본어이고 UI 문구가 섞인다.
pub const DEFAULT_LANGUAGES: &str = "jpn+eng";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("이미지 디코딩 실패: {0}")]
    Decode(String),

    #[error("빈 이미지 ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Tesseract 초기화 실패 ({languages}): {reason}")]
    Init { languages: String, reason: String },

    #[error("Tesseract 인식 실패: {0}")]
    Recognize(String),

    #[error("블로킹 작업 조인 실패: {0}")]
    Join(String),
}

/// Tesseract 호출 설정. 호출마다 새 `LepTess` 인스턴스를 만든다.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    tessdata: Option<PathBuf>,
    languages: String,
}

impl TesseractOcr {
    pub fn new(tessdata: Option<PathBuf>) -> Self {
        Self {
            tessdata,
            languages: DEFAULT_LANGUAGES.to_string(),
        }
    }

    pub fn with_languages(mut self, languages: impl Into<String>) -> Self {
        self.languages = languages.into();
        self
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// 인코딩된 이미지에서 텍스트 인식. 앞뒤 공백은 잘라낸다.
    pub async fn recognize(&self, encoded: Vec<u8>) -> Result<String, OcrError> {
        let config = self.clone();
        tokio::task::spawn_blocking(move || config.recognize_blocking(&encoded))
            .await
            .map_err(|e| OcrError::Join(e.to_string()))?
    }

    fn recognize_blocking(&self, encoded: &[u8]) -> Result<String, OcrError> {
        let rgba = image::load_from_memory(encoded)
            .map_err(|e| OcrError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::EmptyImage { width, height });
        }

        let tessdata = self.tessdata.as_ref().map(|p| p.to_string_lossy().into_owned());
        let mut tess = leptess::LepTess::new(tessdata.as_deref(), &self.languages).map_err(|e| {
            OcrError::Init {
                languages: self.languages.clone(),
                reason: e.to_string(),
            }
        })?;
        tess.set_image_from_mem(rgba.as_raw(), width as i32, height as i32, 4, (width * 4) as i32)
            .map_err(|_| OcrError::Recognize("픽셀 버퍼 설정 실패".to_string()))?;
        let text = tess
            .get_utf8_text()
            .map_err(|e| OcrError::Recognize(e.to_string()))?;

        debug!(chars = text.chars().count(), languages = %self.languages, "Tesseract 인식");
        Ok(text.trim().to_string())
    }
}
