//! 외부 비전 모델 텍스트 추출 클라이언트.
//!
//! 캡처 이미지를 Base64 data URL(또는 Anthropic image block)로 보내고
//! 모델이 돌려준 원문 텍스트를 그대로 반환한다.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use std::time::Duration;
use tracing::{debug, warn};

use lingshot_core::config::{AiProviderType, ExternalApiEndpoint};
use lingshot_core::error::CoreError;
use lingshot_core::ports::ocr_provider::TextExtractor;

use crate::provider::{
    apply_auth, build_http_client, completion_text, map_request_error, status_error, MAX_TOKENS,
};

/// 추출 지시문
const OCR_PROMPT: &str = "Extract all visible text from the image. \
Include all text in the original language.\n\n\
Respond ONLY with the extracted text, no explanations or formatting.";

/// 외부 비전 모델 텍스트 추출기
#[derive(Debug)]
pub struct RemoteOcrProvider {
    http_client: reqwest::Client,
    endpoint: ExternalApiEndpoint,
}

impl RemoteOcrProvider {
    pub fn new(endpoint: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if endpoint.endpoint.trim().is_empty() {
            return Err(CoreError::Config("OCR API 엔드포인트 미설정".into()));
        }
        debug!(
            endpoint = %endpoint.endpoint,
            provider = ?endpoint.provider_type,
            "RemoteOcrProvider 초기화"
        );
        Ok(Self {
            http_client: build_http_client()?,
            endpoint: endpoint.clone(),
        })
    }

    fn media_type(image_format: &str) -> &'static str {
        match image_format {
            "jpeg" | "jpg" => "image/jpeg",
            "webp" => "image/webp",
            _ => "image/png",
        }
    }

    /// 제공자 형식에 맞는 요청 본문
    fn build_request(
        provider: AiProviderType,
        model_id: &str,
        encoded: &str,
        media_type: &str,
    ) -> serde_json::Value {
        match provider {
            AiProviderType::Anthropic => serde_json::json!({
                "model": model_id,
                "max_tokens": MAX_TOKENS,
                "temperature": 0.1,
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "image",
                            "source": {
                                "type": "base64",
                                "media_type": media_type,
                                "data": encoded
                            }
                        },
                        { "type": "text", "text": OCR_PROMPT }
                    ]
                }]
            }),
            AiProviderType::OpenAi | AiProviderType::Generic => serde_json::json!({
                "model": model_id,
                "max_tokens": MAX_TOKENS,
                "temperature": 0.1,
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": format!("data:{media_type};base64,{encoded}") }
                        },
                        { "type": "text", "text": OCR_PROMPT }
                    ]
                }]
            }),
        }
    }

    fn parse_response(body: &str) -> Result<String, CoreError> {
        let response: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| CoreError::OcrError(format!("응답 JSON 파싱 실패: {e}")))?;
        completion_text(&response)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| CoreError::OcrError("응답에서 텍스트를 찾을 수 없음".to_string()))
    }
}

#[async_trait]
impl TextExtractor for RemoteOcrProvider {
    async fn extract_text(
        &self,
        image: &[u8],
        image_format: &str,
        model_id: &str,
        timeout: Duration,
    ) -> Result<String, CoreError> {
        let encoded = B64.encode(image);
        let body = Self::build_request(
            self.endpoint.provider_type,
            model_id,
            &encoded,
            Self::media_type(image_format),
        );

        debug!(
            endpoint = %self.endpoint.endpoint,
            model = model_id,
            image_size = image.len(),
            "텍스트 추출 API 호출"
        );

        let builder = self
            .http_client
            .post(&self.endpoint.endpoint)
            .timeout(timeout)
            .json(&body);
        let response = apply_auth(builder, &self.endpoint)
            .send()
            .await
            .map_err(|e| map_request_error(e, timeout, "OCR API 호출"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_request_error(e, timeout, "OCR API 응답 읽기"))?;

        if !status.is_success() {
            warn!(status = %status, "OCR API 오류 응답");
            return Err(status_error("OCR API", status, &text));
        }

        let extracted = Self::parse_response(&text)?;
        debug!(chars = extracted.chars().count(), "텍스트 추출 완료");
        Ok(extracted)
    }

    fn provider_name(&self) -> &str {
        "remote-vision"
    }
}
