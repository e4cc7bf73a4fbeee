//! 애플리케이션 설정 구조체.
//!
//! 번역 주기/유사도/타임아웃, 백엔드 엔드포인트, 파이프라인 타이밍,
//! 웹 서버, 저장 경로 설정을 정의한다. [`crate::config_manager::ConfigManager`]가
//! JSON 파일로 로드/저장한다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::task::TaskSettings;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 런타임 변경 가능한 번역 설정
    #[serde(default)]
    pub translation: TranslationSettings,
    /// 추출/번역 백엔드 설정
    #[serde(default)]
    pub backend: BackendConfig,
    /// 파이프라인 내부 타이밍
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// 웹 제어 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 로컬 저장 경로
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 번역 설정
// ============================================================

/// 사용자가 런타임에 조정하는 번역 설정.
///
/// 모니터 사이클과 번역 작업은 시작 시점에 이 값의 스냅샷을 사용한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// 변경 확인 주기 (초, 1 이상)
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// 이 값 이상이면 "변경 없음"으로 판단 (0.0 ~ 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// 백엔드 호출 타임아웃 (초, 0 초과)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 텍스트 추출 모델 ID
    #[serde(default = "default_ocr_model_id")]
    pub ocr_model_id: String,
    /// 번역 모델 ID
    #[serde(default = "default_translation_model_id")]
    pub translation_model_id: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            similarity_threshold: default_similarity_threshold(),
            timeout_secs: default_timeout_secs(),
            ocr_model_id: default_ocr_model_id(),
            translation_model_id: default_translation_model_id(),
        }
    }
}

impl TranslationSettings {
    /// 모든 필드 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.check_interval_secs < 1 {
            return Err(CoreError::validation(
                "check_interval_secs",
                "1초 이상이어야 합니다",
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CoreError::validation(
                "similarity_threshold",
                "0.0 ~ 1.0 범위여야 합니다",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::validation(
                "timeout_secs",
                "0보다 커야 합니다",
            ));
        }
        if self.ocr_model_id.trim().is_empty() {
            return Err(CoreError::validation("ocr_model_id", "비어 있습니다"));
        }
        if self.translation_model_id.trim().is_empty() {
            return Err(CoreError::validation(
                "translation_model_id",
                "비어 있습니다",
            ));
        }
        Ok(())
    }

    /// 확인 주기
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// 백엔드 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 작업 1회분 스냅샷
    pub fn task_settings(&self) -> TaskSettings {
        TaskSettings {
            timeout: self.timeout(),
            ocr_model_id: self.ocr_model_id.clone(),
            translation_model_id: self.translation_model_id.clone(),
        }
    }
}

/// 부분 설정 변경 요청. `None` 필드는 유지된다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub check_interval_secs: Option<u64>,
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub ocr_model_id: Option<String>,
    #[serde(default)]
    pub translation_model_id: Option<String>,
}

impl SettingsUpdate {
    /// 변경 사항이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.check_interval_secs.is_none()
            && self.similarity_threshold.is_none()
            && self.timeout_secs.is_none()
            && self.ocr_model_id.is_none()
            && self.translation_model_id.is_none()
    }

    /// `base`에 변경 사항을 적용한 새 설정 반환.
    ///
    /// 검증에 실패하면 `base`는 그대로 유효하며 에러를 반환한다.
    pub fn apply(&self, base: &TranslationSettings) -> Result<TranslationSettings, CoreError> {
        let mut next = base.clone();
        if let Some(v) = self.check_interval_secs {
            next.check_interval_secs = v;
        }
        if let Some(v) = self.similarity_threshold {
            next.similarity_threshold = v;
        }
        if let Some(v) = self.timeout_secs {
            next.timeout_secs = v;
        }
        if let Some(v) = &self.ocr_model_id {
            next.ocr_model_id = v.trim().to_string();
        }
        if let Some(v) = &self.translation_model_id {
            next.translation_model_id = v.trim().to_string();
        }
        next.validate()?;
        Ok(next)
    }
}

// ============================================================
// 백엔드 설정
// ============================================================

/// AI API 제공자 타입: 요청/응답 형식 및 인증 헤더 결정에 사용
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderType {
    /// Anthropic Messages API: `x-api-key` 헤더 + content block 형식
    Anthropic,
    /// OpenAI 호환 API: `Authorization: Bearer` 헤더 + chat completions 형식
    OpenAi,
    /// 기타 OpenAI 호환 서버 (LM Studio 등): 키가 있을 때만 Bearer
    #[default]
    Generic,
}

/// 외부 AI API 엔드포인트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalApiEndpoint {
    /// 요청 URL
    pub endpoint: String,
    /// API 키 (로컬 서버는 비워둔다)
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub provider_type: AiProviderType,
}

impl ExternalApiEndpoint {
    /// 키 없는 Generic 엔드포인트
    pub fn generic(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: String::new(),
            provider_type: AiProviderType::Generic,
        }
    }
}

/// 추출/번역/모델 목록 백엔드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// 텍스트 추출(비전) API
    pub ocr_api: ExternalApiEndpoint,
    /// 번역(스트리밍) API
    pub translation_api: ExternalApiEndpoint,
    /// 모델 목록 조회 URL
    #[serde(default = "default_models_endpoint")]
    pub models_endpoint: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BACKEND_URL)
    }
}

impl BackendConfig {
    /// 기본 경로 규칙으로 모든 엔드포인트를 `base_url` 아래에 구성
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            ocr_api: ExternalApiEndpoint::generic(format!("{base}/v1/chat/completions")),
            translation_api: ExternalApiEndpoint::generic(format!(
                "{base}/api/v0/chat/completions"
            )),
            models_endpoint: format!("{base}/api/v0/models"),
        }
    }
}

/// 기본 백엔드 주소 (로컬 LM Studio)
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:7860";

// ============================================================
// 파이프라인 타이밍
// ============================================================

/// 파이프라인 내부 타이밍/버퍼 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 진행 이벤트(경과 시간) 주기 (ms)
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    /// 스트리밍 중간 결과 최소 간격 (ms)
    #[serde(default = "default_stream_emit_interval_ms")]
    pub stream_emit_interval_ms: u64,
    /// 구독자별 이벤트 큐 크기
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// 유사도 비교 정규화 크기 (정사각형 한 변, px)
    #[serde(default = "default_similarity_size")]
    pub similarity_size: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval_ms(),
            stream_emit_interval_ms: default_stream_emit_interval_ms(),
            event_buffer: default_event_buffer(),
            similarity_size: default_similarity_size(),
        }
    }
}

impl PipelineConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(10))
    }

    pub fn stream_emit_interval(&self) -> Duration {
        Duration::from_millis(self.stream_emit_interval_ms)
    }
}

// ============================================================
// 웹 서버 / 저장소
// ============================================================

/// 웹 제어 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 웹 서버 포트 (기본: 9090)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_web_port(),
            allow_external: false,
        }
    }
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 번역 로그 파일 경로 (None이면 데이터 디렉토리의 `translation_log.txt`)
    #[serde(default)]
    pub translation_log_path: Option<PathBuf>,
    /// 번역 로그 기록 여부
    #[serde(default = "default_true")]
    pub translation_log_enabled: bool,
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}
fn default_check_interval_secs() -> u64 {
    3
}
fn default_similarity_threshold() -> f64 {
    0.90
}
fn default_timeout_secs() -> u64 {
    45
}
fn default_ocr_model_id() -> String {
    "nanonets-ocr-s".to_string()
}
fn default_translation_model_id() -> String {
    "gemma-3-12b-it".to_string()
}
fn default_models_endpoint() -> String {
    format!("{DEFAULT_BACKEND_URL}/api/v0/models")
}
fn default_progress_interval_ms() -> u64 {
    100
}
fn default_stream_emit_interval_ms() -> u64 {
    200
}
fn default_event_buffer() -> usize {
    256
}
fn default_similarity_size() -> u32 {
    512
}
fn default_web_port() -> u16 {
    9090
}
