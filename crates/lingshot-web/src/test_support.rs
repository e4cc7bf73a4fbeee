//! 라우터 테스트용 포트 구현.

use async_trait::async_trait;
use lingshot_core::config::PipelineConfig;
use lingshot_core::error::CoreError;
use lingshot_core::models::frame::{Frame, Source, SourceInfo};
use lingshot_core::ports::capture::FrameSource;
use lingshot_core::ports::ocr_provider::TextExtractor;
use lingshot_core::ports::translator::Translator;
use lingshot_pipeline::engine::{Engine, EngineBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::AppState;

pub struct StaticFrames;

impl FrameSource for StaticFrames {
    fn capture(&self, source: &Source) -> Result<Frame, CoreError> {
        Frame::from_rgba(*source, 8, 8, vec![200; 8 * 8 * 4])
    }

    fn is_visible(&self, _source: &Source) -> bool {
        true
    }

    fn list_sources(&self) -> Result<Vec<SourceInfo>, CoreError> {
        Ok(vec![SourceInfo {
            source: Source::Window { id: 42 },
            title: "Game Window".to_string(),
            is_visible: true,
        }])
    }
}

pub struct SlowExtractor(pub Duration);

#[async_trait]
impl TextExtractor for SlowExtractor {
    async fn extract_text(
        &self,
        _image: &[u8],
        _image_format: &str,
        _model_id: &str,
        _timeout: Duration,
    ) -> Result<String, CoreError> {
        tokio::time::sleep(self.0).await;
        Ok("原文".to_string())
    }

    fn provider_name(&self) -> &str {
        "test"
    }
}

pub struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(
        &self,
        _text: &str,
        _model_id: &str,
        _timeout: Duration,
        chunks: mpsc::UnboundedSender<String>,
    ) -> Result<String, CoreError> {
        let _ = chunks.send("translated text".to_string());
        Ok("translated text".to_string())
    }

    fn provider_name(&self) -> &str {
        "test"
    }
}

/// 추출 단계가 `extract_delay`만큼 걸리는 엔진
pub fn test_engine(extract_delay: Duration) -> Arc<Engine> {
    EngineBuilder::new(
        Arc::new(StaticFrames),
        Arc::new(SlowExtractor(extract_delay)),
        Arc::new(EchoTranslator),
    )
    .with_pipeline_config(PipelineConfig {
        progress_interval_ms: 20,
        stream_emit_interval_ms: 40,
        ..Default::default()
    })
    .build()
}

pub fn test_state(engine: Arc<Engine>) -> AppState {
    AppState {
        engine,
        config_manager: None,
        catalog: None,
    }
}
