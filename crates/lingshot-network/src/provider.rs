//! 제공자별 공통 처리.
//!
//! 인증 헤더, 전송 에러 매핑, 완료 응답 본문에서 텍스트 꺼내기.

use std::time::Duration;

use lingshot_core::config::{AiProviderType, ExternalApiEndpoint};
use lingshot_core::error::CoreError;

/// Anthropic API 버전 헤더 값
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// 생성 토큰 상한 (추출/번역 공통)
pub const MAX_TOKENS: u32 = 6000;

/// 공용 HTTP 클라이언트. 타임아웃은 요청마다 지정한다.
pub fn build_http_client() -> Result<reqwest::Client, CoreError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {e}")))
}

/// 제공자 타입에 맞는 인증 헤더 추가. 키가 비어 있으면 헤더 없음.
pub fn apply_auth(
    builder: reqwest::RequestBuilder,
    endpoint: &ExternalApiEndpoint,
) -> reqwest::RequestBuilder {
    match endpoint.provider_type {
        AiProviderType::Anthropic => {
            let builder = builder.header("anthropic-version", ANTHROPIC_VERSION);
            if endpoint.api_key.is_empty() {
                builder
            } else {
                builder.header("x-api-key", &endpoint.api_key)
            }
        }
        AiProviderType::OpenAi | AiProviderType::Generic => {
            if endpoint.api_key.is_empty() {
                builder
            } else {
                builder.header("Authorization", format!("Bearer {}", endpoint.api_key))
            }
        }
    }
}

/// reqwest 에러 → CoreError (타임아웃 구분)
pub fn map_request_error(e: reqwest::Error, timeout: Duration, what: &str) -> CoreError {
    if e.is_timeout() {
        CoreError::timeout(timeout)
    } else {
        CoreError::Network(format!("{what} 실패: {e}"))
    }
}

/// 비정상 상태 코드 응답 → CoreError (본문 앞 200자 포함)
pub fn status_error(what: &str, status: reqwest::StatusCode, body: &str) -> CoreError {
    CoreError::Network(format!(
        "{what} 오류 ({status}): {}",
        body.chars().take(200).collect::<String>()
    ))
}

/// 완료(비스트리밍) 응답에서 본문 텍스트 추출.
///
/// - OpenAI 호환: `choices[0].message.content`
/// - Anthropic: `content[].text` 연결
pub fn completion_text(response: &serde_json::Value) -> Option<String> {
    if let Some(text) = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|t| t.as_str())
    {
        return Some(text.to_string());
    }

    let blocks = response.get("content")?.as_array()?;
    let text: Vec<&str> = blocks
        .iter()
        .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text.join(""))
    }
}
