//! 백엔드 모델 목록 항목.

use serde::{Deserialize, Serialize};

/// 로컬 OCR 모델 ID (Tesseract)
pub const LOCAL_OCR_MODEL_ID: &str = "tesseract";

/// 백엔드가 제공하는 모델 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default = "default_object")]
    pub object: String,
    /// "llm", "vlm", "embeddings" 등
    #[serde(rename = "type", default)]
    pub model_type: String,
    #[serde(default)]
    pub publisher: String,
    /// "loaded" / "not-loaded"
    #[serde(default)]
    pub state: String,
}

impl ModelInfo {
    /// 로컬 Tesseract 항목
    pub fn local_tesseract() -> Self {
        Self {
            id: LOCAL_OCR_MODEL_ID.to_string(),
            object: default_object(),
            model_type: "ocr".to_string(),
            publisher: "tesseract-ocr".to_string(),
            state: "available".to_string(),
        }
    }
}

fn default_object() -> String {
    "model".to_string()
}
