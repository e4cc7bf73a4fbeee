//! 모델 목록 조회.
//!
//! LM Studio 네이티브 API(`GET /api/v0/models`)에서 모델 목록을 받아
//! 텍스트 추출용(비전)과 번역용(언어 모델)으로 분류한다.

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use lingshot_core::error::CoreError;
use lingshot_core::models::model::ModelInfo;

use crate::provider::{build_http_client, map_request_error, status_error};

/// 목록 조회 타임아웃
const CATALOG_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

/// 모델 목록 클라이언트
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    http_client: reqwest::Client,
    models_endpoint: String,
}

impl ModelCatalog {
    pub fn new(models_endpoint: impl Into<String>) -> Result<Self, CoreError> {
        Ok(Self {
            http_client: build_http_client()?,
            models_endpoint: models_endpoint.into(),
        })
    }

    /// 서버가 알려주는 전체 모델
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, CoreError> {
        let response = self
            .http_client
            .get(&self.models_endpoint)
            .timeout(CATALOG_TIMEOUT)
            .send()
            .await
            .map_err(|e| map_request_error(e, CATALOG_TIMEOUT, "모델 목록 조회"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_request_error(e, CATALOG_TIMEOUT, "모델 목록 응답 읽기"))?;
        if !status.is_success() {
            return Err(status_error("모델 목록 API", status, &body));
        }

        let parsed: ModelListResponse = serde_json::from_str(&body)?;
        info!("모델 {}개 조회", parsed.data.len());
        Ok(parsed.data)
    }

    /// 텍스트 추출 가능 모델 (로컬 Tesseract가 맨 앞)
    pub async fn ocr_models(&self) -> Result<Vec<ModelInfo>, CoreError> {
        Ok(filter_ocr_models(self.list_models().await?))
    }

    /// 번역 가능 모델
    pub async fn translation_models(&self) -> Result<Vec<ModelInfo>, CoreError> {
        Ok(filter_translation_models(self.list_models().await?))
    }
}

/// 비전 모델이거나 ID에 "ocr"이 들어간 모델. Tesseract를 앞에 붙인다.
pub fn filter_ocr_models(models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    let mut result = vec![ModelInfo::local_tesseract()];
    result.extend(
        models
            .into_iter()
            .filter(|m| m.model_type == "vlm" || m.id.to_lowercase().contains("ocr")),
    );
    debug!("OCR 가능 모델 {}개", result.len());
    result
}

/// 언어 모델(llm) 또는 비전 언어 모델(vlm)
pub fn filter_translation_models(models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    models
        .into_iter()
        .filter(|m| m.model_type == "llm" || m.model_type == "vlm")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingshot_core::models::model::LOCAL_OCR_MODEL_ID;

    fn model(id: &str, model_type: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            object: "model".to_string(),
            model_type: model_type.to_string(),
            publisher: String::new(),
            state: "loaded".to_string(),
        }
    }

    #[test]
    fn ocr_filter_puts_tesseract_first() {
        let models = vec![
            model("gemma-3-12b-it", "llm"),
            model("qwen2.5-vl-7b", "vlm"),
            model("nanonets-OCR-s", "llm"),
            model("nomic-embed", "embeddings"),
        ];
        let ids: Vec<String> = filter_ocr_models(models).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![LOCAL_OCR_MODEL_ID, "qwen2.5-vl-7b", "nanonets-OCR-s"]);
    }

    #[test]
    fn translation_filter_keeps_language_models() {
        let models = vec![
            model("gemma-3-12b-it", "llm"),
            model("qwen2.5-vl-7b", "vlm"),
            model("nomic-embed", "embeddings"),
        ];
        let ids: Vec<String> = filter_translation_models(models)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["gemma-3-12b-it", "qwen2.5-vl-7b"]);
    }

    #[tokio::test]
    async fn list_models_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v0/models")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"object":"list","data":[
                    {"id":"gemma-3-12b-it","object":"model","type":"llm","publisher":"google","state":"loaded"},
                    {"id":"qwen2.5-vl-7b","object":"model","type":"vlm","publisher":"qwen","state":"not-loaded"}
                ]}"#,
            )
            .create_async()
            .await;

        let catalog = ModelCatalog::new(format!("{}/api/v0/models", server.url())).unwrap();
        let models = catalog.list_models().await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].state, "not-loaded");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v0/models")
            .with_status(503)
            .create_async()
            .await;

        let catalog = ModelCatalog::new(format!("{}/api/v0/models", server.url())).unwrap();
        assert!(catalog.ocr_models().await.is_err());
    }
}
