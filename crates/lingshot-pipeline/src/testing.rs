//! 테스트용 포트 구현과 헬퍼.

use async_trait::async_trait;
use lingshot_core::config::PipelineConfig;
use lingshot_core::error::CoreError;
use lingshot_core::models::event::PipelineEvent;
use lingshot_core::models::frame::{Frame, Source, SourceInfo};
use lingshot_core::ports::capture::FrameSource;
use lingshot_core::ports::ocr_provider::TextExtractor;
use lingshot_core::ports::translator::Translator;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::event_sink::Subscription;

/// 단색 프레임
pub fn solid_frame(source: Source, value: u8) -> Frame {
    let (w, h) = (32u32, 32u32);
    let pixels = [value, value, value, 255].repeat((w * h) as usize);
    Frame::from_rgba(source, w, h, pixels).unwrap()
}

/// 체커보드 프레임 (단색과 구조가 전혀 다름)
pub fn checker_frame(source: Source) -> Frame {
    let (w, h) = (32u32, 32u32);
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x / 4 + y / 4) % 2 == 0 { 0 } else { 255 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Frame::from_rgba(source, w, h, pixels).unwrap()
}

/// 테스트용 빠른 타이밍
pub fn fast_timing() -> PipelineConfig {
    PipelineConfig {
        progress_interval_ms: 20,
        stream_emit_interval_ms: 40,
        event_buffer: 1024,
        similarity_size: 32,
    }
}

// ============================================================
// FrameSource
// ============================================================

pub struct MockFrameSource {
    frame: Mutex<Frame>,
    visible: AtomicBool,
    fail: AtomicBool,
    delay: Mutex<Duration>,
    captures: AtomicUsize,
    windows: Vec<SourceInfo>,
}

impl MockFrameSource {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame: Mutex::new(frame),
            visible: AtomicBool::new(true),
            fail: AtomicBool::new(false),
            delay: Mutex::new(Duration::ZERO),
            captures: AtomicUsize::new(0),
            windows: vec![SourceInfo {
                source: Source::Window { id: 42 },
                title: "Visual Novel".to_string(),
                is_visible: true,
            }],
        }
    }

    pub fn set_frame(&self, frame: Frame) {
        *self.frame.lock() = frame;
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl FrameSource for MockFrameSource {
    fn capture(&self, source: &Source) -> Result<Frame, CoreError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Capture("창 핸들 무효".to_string()));
        }
        let frame = self.frame.lock().clone();
        Frame::from_rgba(*source, frame.width(), frame.height(), frame.pixels().to_vec())
    }

    fn is_visible(&self, _source: &Source) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn list_sources(&self) -> Result<Vec<SourceInfo>, CoreError> {
        Ok(self.windows.clone())
    }
}

// ============================================================
// TextExtractor
// ============================================================

pub struct MockExtractor {
    text: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract_text(
        &self,
        image: &[u8],
        image_format: &str,
        _model_id: &str,
        _timeout: Duration,
    ) -> Result<String, CoreError> {
        assert_eq!(image_format, "png");
        assert!(image.starts_with(&[0x89, b'P', b'N', b'G']));
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.text.clone())
    }

    fn provider_name(&self) -> &str {
        "mock-extractor"
    }
}

// ============================================================
// Translator
// ============================================================

pub struct MockTranslator {
    chunks: Vec<String>,
    chunk_delay: Duration,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            chunk_delay: Duration::ZERO,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn failing(message: &str) -> Self {
        let mut translator = Self::new(&[]);
        translator.failure = Some(message.to_string());
        translator
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        _text: &str,
        _model_id: &str,
        _timeout: Duration,
        chunks: mpsc::UnboundedSender<String>,
    ) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(CoreError::Network(message.clone()));
        }
        for chunk in &self.chunks {
            if !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
            let _ = chunks.send(chunk.clone());
        }
        Ok(self.chunks.concat())
    }

    fn provider_name(&self) -> &str {
        "mock-translator"
    }
}

// ============================================================
// 이벤트 수집
// ============================================================

/// 작업 `id`의 종료 이벤트(완료 결과 또는 에러)까지 수집
pub async fn collect_until_terminal(sub: &mut Subscription, id: Uuid) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), sub.recv())
            .await
            .expect("종료 이벤트 대기 시간 초과")
            .expect("구독 종료");
        if event.task_id() != Some(id) {
            continue;
        }
        let terminal = is_terminal(&event);
        events.push(event);
        if terminal {
            return events;
        }
    }
}

pub fn is_terminal(event: &PipelineEvent) -> bool {
    match event {
        PipelineEvent::TranslationResult(r) => !r.is_streaming,
        PipelineEvent::Error(_) => true,
        _ => false,
    }
}

/// 현재까지 쌓인 이벤트 모두 꺼내기
pub fn drain(sub: &mut Subscription) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Some(event) = sub.try_recv() {
        events.push(event);
    }
    events
}
