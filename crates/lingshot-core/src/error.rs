//! LINGSHOT 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환하거나 자체 에러에서 래핑한다.
//! 파이프라인 이벤트로 내보낼 때는 [`CoreError::kind`]로 분류한다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "TranslationResult", "Window")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 화면 캡처 실패 (창 닫힘, 핸들 무효 등)
    #[error("캡처 실패: {0}")]
    Capture(String),

    /// 외부 백엔드 통신 실패 (연결 실패, 비정상 응답)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 백엔드 호출 타임아웃
    #[error("타임아웃: {timeout_ms}ms 초과")]
    Timeout {
        /// 초과된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 이미 번역 작업이 진행 중
    #[error("번역 작업이 이미 실행 중입니다")]
    AlreadyRunning,

    /// 캡처 대상이 선택되지 않았거나 유효하지 않음
    #[error("유효하지 않은 캡처 대상: {0}")]
    InvalidSource(String),

    /// OCR 처리 실패
    #[error("OCR 에러: {0}")]
    OcrError(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 이벤트 스트림에 노출되는 에러 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 캡처 실패
    Capture,
    /// 추출/번역 백엔드 실패
    Backend,
    /// 백엔드 타임아웃
    Timeout,
    /// 단일 작업 제약 위반
    AlreadyRunning,
    /// 캡처 대상 없음
    InvalidSource,
    /// 설정/입력 검증 실패
    Validation,
    /// 대상 리소스 없음
    NotFound,
    /// 그 외
    Internal,
}

impl CoreError {
    /// 이벤트 분류로 매핑
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Capture(_) => ErrorKind::Capture,
            CoreError::Network(_) | CoreError::OcrError(_) => ErrorKind::Backend,
            CoreError::Timeout { .. } => ErrorKind::Timeout,
            CoreError::AlreadyRunning => ErrorKind::AlreadyRunning,
            CoreError::InvalidSource(_) => ErrorKind::InvalidSource,
            CoreError::Validation { .. } | CoreError::Config(_) => ErrorKind::Validation,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Serialization(_) | CoreError::Io(_) | CoreError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Duration 기반 타임아웃 에러 생성
    pub fn timeout(timeout: std::time::Duration) -> Self {
        CoreError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn kind_mapping() {
        assert_eq!(CoreError::Capture("x".into()).kind(), ErrorKind::Capture);
        assert_eq!(CoreError::Network("x".into()).kind(), ErrorKind::Backend);
        assert_eq!(CoreError::OcrError("x".into()).kind(), ErrorKind::Backend);
        assert_eq!(
            CoreError::timeout(Duration::from_secs(2)).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(CoreError::AlreadyRunning.kind(), ErrorKind::AlreadyRunning);
        assert_eq!(
            CoreError::validation("timeout_secs", "0").kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn timeout_message_in_millis() {
        let err = CoreError::timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "타임아웃: 1500ms 초과");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::AlreadyRunning).unwrap();
        assert_eq!(json, "\"already_running\"");
    }
}
