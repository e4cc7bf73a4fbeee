//! 외부 LLM 스트리밍 번역 클라이언트.
//!
//! `stream: true`로 chat completion을 요청하고 SSE 응답을 `eventsource-stream`으로
//! 파싱한다. 증분 텍스트는 도착 즉시 청크 채널로 보내고, 스트림이 끝나면
//! 누적 응답에서 번역문만 추려 반환한다. 서버가 스트리밍을 무시하고
//! 일반 JSON으로 응답하면 한 번에 처리한다.

use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use lingshot_core::config::ExternalApiEndpoint;
use lingshot_core::error::CoreError;
use lingshot_core::ports::translator::Translator;

use crate::provider::{
    apply_auth, build_http_client, completion_text, map_request_error, status_error, MAX_TOKENS,
};
use crate::translation_parser::extract_translation;

/// 스트림 종료 표식 (OpenAI 호환)
const DONE_MARKER: &str = "[DONE]";

// ============================================================
// RemoteTranslator: 스트리밍 번역 클라이언트
// ============================================================

/// 외부 LLM 스트리밍 번역기
#[derive(Debug)]
pub struct RemoteTranslator {
    http_client: reqwest::Client,
    endpoint: ExternalApiEndpoint,
    target_language: String,
}

impl RemoteTranslator {
    pub fn new(endpoint: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if endpoint.endpoint.trim().is_empty() {
            return Err(CoreError::Config("번역 API 엔드포인트 미설정".into()));
        }
        debug!(
            endpoint = %endpoint.endpoint,
            provider = ?endpoint.provider_type,
            "RemoteTranslator 초기화"
        );
        Ok(Self {
            http_client: build_http_client()?,
            endpoint: endpoint.clone(),
            target_language: "English".to_string(),
        })
    }

    /// 번역 대상 언어 지정 (기본 English)
    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    fn build_prompt(&self, text: &str) -> String {
        let lang = &self.target_language;
        format!(
            "You are a professional translator. Translate the following text to {lang}:\n\n\
             {text}\n\n\
             Respond ONLY in the following format, and do not include any original (foreign) \
             text, explanations, or formatting:\n\
             TRANSLATION: [The full {lang} translation here, and nothing else]\n\n\
             If the text is already in {lang}, output:\n\
             TRANSLATION: [The original {lang} text here, and nothing else]\n\
             DO NOT REPEAT ANY PART OF THE ORIGINAL (FOREIGN) TEXT IN YOUR RESPONSE."
        )
    }

    /// OpenAI 호환과 Anthropic Messages API가 공통으로 받는 요청 본문
    fn build_request(model_id: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model_id,
            "max_tokens": MAX_TOKENS,
            "temperature": 0.1,
            "stream": true,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }

    /// SSE 이벤트 데이터 하나에서 증분 텍스트 추출.
    ///
    /// - OpenAI 호환: `choices[0].delta.content`
    /// - Anthropic: `{"type":"content_block_delta","delta":{"text":...}}`
    /// - Anthropic `{"type":"error"}`는 에러
    pub fn parse_stream_delta(data: &str) -> Result<Option<String>, CoreError> {
        let value: serde_json::Value = match serde_json::from_str(data) {
            Ok(v) => v,
            Err(e) => {
                debug!("번역 스트림 JSON 아님, 건너뜀: {e}");
                return Ok(None);
            }
        };

        if let Some(content) = value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("delta"))
            .and_then(|delta| delta.get("content"))
            .and_then(|t| t.as_str())
        {
            return Ok(Some(content.to_string()));
        }

        match value.get("type").and_then(|t| t.as_str()) {
            Some("content_block_delta") => Ok(value
                .get("delta")
                .and_then(|d| d.get("text"))
                .and_then(|t| t.as_str())
                .map(str::to_string)),
            Some("error") => Err(CoreError::Network(format!(
                "번역 스트림 에러 이벤트: {}",
                value.get("error").unwrap_or(&value)
            ))),
            _ => Ok(None),
        }
    }

    async fn read_event_stream(
        response: reqwest::Response,
        timeout: Duration,
        chunks: &mpsc::UnboundedSender<String>,
    ) -> Result<String, CoreError> {
        let mut stream = response.bytes_stream().eventsource();
        let mut accumulated = String::new();

        while let Some(event) = stream.next().await {
            let event = event.map_err(|e| match e {
                EventStreamError::Transport(err) => {
                    map_request_error(err, timeout, "번역 스트림 수신")
                }
                other => CoreError::Network(format!("번역 스트림 파싱 실패: {other}")),
            })?;

            if event.data.trim() == DONE_MARKER || event.event == "message_stop" {
                break;
            }

            if let Some(delta) = Self::parse_stream_delta(&event.data)? {
                if delta.is_empty() {
                    continue;
                }
                accumulated.push_str(&delta);
                // 수신 측이 사라져도 번역은 끝까지 받는다
                let _ = chunks.send(delta);
            }
        }

        Ok(accumulated)
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn translate(
        &self,
        text: &str,
        model_id: &str,
        timeout: Duration,
        chunks: mpsc::UnboundedSender<String>,
    ) -> Result<String, CoreError> {
        let prompt = self.build_prompt(text);
        let body = Self::build_request(model_id, &prompt);

        debug!(
            endpoint = %self.endpoint.endpoint,
            model = model_id,
            chars = text.chars().count(),
            "스트리밍 번역 요청"
        );

        let builder = self
            .http_client
            .post(&self.endpoint.endpoint)
            .timeout(timeout)
            .json(&body);
        let response = apply_auth(builder, &self.endpoint)
            .send()
            .await
            .map_err(|e| map_request_error(e, timeout, "번역 API 호출"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "번역 API 오류 응답");
            return Err(status_error("번역 API", status, &body));
        }

        let is_event_stream = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|ct| ct.contains("text/event-stream"))
            .unwrap_or(false);

        let raw = if is_event_stream {
            Self::read_event_stream(response, timeout, &chunks).await?
        } else {
            let body = response
                .text()
                .await
                .map_err(|e| map_request_error(e, timeout, "번역 API 응답 읽기"))?;
            let value: serde_json::Value = serde_json::from_str(&body)?;
            let content = completion_text(&value).ok_or_else(|| {
                CoreError::Network("번역 응답에서 텍스트를 찾을 수 없음".to_string())
            })?;
            let _ = chunks.send(content.clone());
            content
        };

        let translation = extract_translation(&raw);
        debug!(
            raw_chars = raw.chars().count(),
            chars = translation.chars().count(),
            "번역 완료"
        );
        Ok(translation)
    }

    fn provider_name(&self) -> &str {
        "remote-llm"
    }
}

// ============================================================
// 테스트
// ============================================================
