//! LINGSHOT 바이너리 진입점.
//!
//! 설정 로드, 어댑터 조립(DI), 엔진/웹 서버/콘솔 출력 기동, 종료 시그널 처리.

mod console;
mod lifecycle;
mod ocr_router;

use anyhow::{Context, Result};
use clap::Parser;
use lingshot_core::config::{AppConfig, BackendConfig};
use lingshot_core::config_manager::ConfigManager;
use lingshot_core::models::status::MonitorAction;
use lingshot_core::ports::capture::FrameSource;
use lingshot_core::ports::ocr_provider::TextExtractor;
use lingshot_core::ports::translator::Translator;
use lingshot_network::ai_llm_client::RemoteTranslator;
use lingshot_network::ai_ocr_client::RemoteOcrProvider;
use lingshot_network::model_catalog::ModelCatalog;
use lingshot_pipeline::engine::EngineBuilder;
use lingshot_pipeline::journal::TranslationJournal;
use lingshot_vision::capture::ScreenCapture;
use lingshot_vision::local_ocr_provider::LocalOcrProvider;
use lingshot_web::WebServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;
use crate::ocr_router::OcrRouter;

/// Tesseract 학습 데이터 경로 환경 변수
const TESSDATA_ENV: &str = "LINGSHOT_TESSDATA";

/// LINGSHOT: 화면 텍스트 실시간 번역기
#[derive(Parser, Debug)]
#[command(name = "lingshot", version, about)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 로그 레벨 (RUST_LOG가 있으면 무시)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 웹 제어 서버 포트
    #[arg(long)]
    port: Option<u16>,

    /// 백엔드 기본 주소 (모든 엔드포인트를 이 주소 아래로 재구성)
    #[arg(long)]
    backend_url: Option<String>,

    /// 캡처할 창 ID
    #[arg(long, conflicts_with = "full_screen")]
    window: Option<u32>,

    /// 전체 화면 캡처
    #[arg(long)]
    full_screen: bool,

    /// 시작 즉시 모니터링
    #[arg(long)]
    start: bool,

    /// 캡처 가능한 창 목록 출력 후 종료
    #[arg(long)]
    list_windows: bool,

    /// 웹 제어 서버 비활성화
    #[arg(long)]
    no_web: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    info!("LINGSHOT v{} 시작", env!("CARGO_PKG_VERSION"));

    // 1. 설정
    let config_manager = load_config_manager(args.config.clone())?;
    let mut config = config_manager.get();
    apply_overrides(&mut config, &args);

    // 2. 어댑터
    let frame_source: Arc<dyn FrameSource> = Arc::new(ScreenCapture::new());
    let extractor = build_extractor(&config.backend)?;
    let translator: Arc<dyn Translator> = Arc::new(
        RemoteTranslator::new(&config.backend.translation_api)
            .context("번역 클라이언트 초기화 실패")?,
    );
    let catalog = Arc::new(
        ModelCatalog::new(config.backend.models_endpoint.clone())
            .context("모델 목록 클라이언트 초기화 실패")?,
    );

    // 3. 엔진
    let mut builder = EngineBuilder::new(frame_source, extractor, translator)
        .with_settings(config.translation.clone())
        .with_pipeline_config(config.pipeline.clone());
    if config.storage.translation_log_enabled {
        let path = match config.storage.translation_log_path.clone() {
            Some(path) => Some(path),
            None => config_manager
                .translation_log_path()
                .map_err(|e| warn!("번역 로그 경로 결정 실패, 로그 비활성화: {e}"))
                .ok(),
        };
        if let Some(path) = path {
            info!("번역 로그: {}", path.display());
            builder = builder.with_journal(TranslationJournal::new(path));
        }
    }
    let engine = builder.build();

    if args.list_windows {
        for info in engine.list_windows().await? {
            let id = info
                .source
                .window_id()
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            let visibility = if info.is_visible { "" } else { " (최소화됨)" };
            println!("{id:>10}  {}{visibility}", info.title);
        }
        return Ok(());
    }

    // 4. 라이프사이클 + 콘솔 출력
    let lifecycle = LifecycleManager::new();
    let console_handle = tokio::spawn(console::run_console(
        Arc::clone(&engine),
        lifecycle.subscribe(),
    ));

    // 5. 캡처 대상 / 모니터링
    if args.window.is_some() || args.full_screen {
        let selected = engine
            .select_source(args.window, None)
            .await
            .context("캡처 대상 선택 실패")?;
        info!(source = %selected.source, title = %selected.title, "캡처 대상 선택");
    }
    if args.start {
        let state = engine
            .control_monitor(MonitorAction::Start)
            .context("모니터링 시작 실패 (--window 또는 --full-screen 필요)")?;
        info!(?state, "모니터링 시작");
    }

    // 6. 웹 서버
    let web_handle = if config.web.enabled && !args.no_web {
        let server = WebServer::new(Arc::clone(&engine), config.web.clone())
            .with_config_manager(config_manager.clone())
            .with_model_catalog(Arc::clone(&catalog));
        let shutdown_rx = lifecycle.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(shutdown_rx).await {
                warn!("웹 서버 종료: {e}");
            }
        }))
    } else {
        info!("웹 서버 비활성화");
        None
    };

    // 7. 종료 대기
    lifecycle.wait_for_signal().await;
    engine.shutdown();

    if let Some(handle) = web_handle {
        if let Err(e) = handle.await {
            warn!("웹 서버 태스크 종료 실패: {e}");
        }
    }
    if let Err(e) = console_handle.await {
        warn!("콘솔 태스크 종료 실패: {e}");
    }

    info!("LINGSHOT 종료");
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lingshot={level},lingshot_core={level},lingshot_vision={level},\
             lingshot_network={level},lingshot_pipeline={level},lingshot_web={level},\
             tower_http=warn"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 설정 파일이 지정되지 않았고 플랫폼 디렉토리도 없으면 임시 디렉토리를 사용한다
fn load_config_manager(path: Option<PathBuf>) -> Result<ConfigManager> {
    if let Some(path) = path {
        return ConfigManager::with_path(path.clone())
            .with_context(|| format!("설정 로드 실패: {}", path.display()));
    }
    match ConfigManager::new() {
        Ok(manager) => Ok(manager),
        Err(e) => {
            let fallback = std::env::temp_dir().join("lingshot").join("config.json");
            warn!("기본 설정 경로 사용 불가 ({e}), 대체 경로: {}", fallback.display());
            ConfigManager::with_path(fallback).context("대체 설정 로드 실패")
        }
    }
}

/// CLI 인자로 설정 덮어쓰기 (파일에는 저장하지 않음)
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(url) = args.backend_url.as_deref() {
        config.backend = BackendConfig::with_base_url(url);
    }
}

fn build_extractor(backend: &BackendConfig) -> Result<Arc<dyn TextExtractor>> {
    let remote = RemoteOcrProvider::new(&backend.ocr_api).context("OCR 클라이언트 초기화 실패")?;

    let mut local = LocalOcrProvider::new();
    if let Some(path) = std::env::var_os(TESSDATA_ENV) {
        local = local.with_tessdata(PathBuf::from(path));
    }
    if !LocalOcrProvider::is_available() {
        info!("내장 OCR 미포함 빌드 (ocr feature 비활성), tesseract 모델 선택 시 에러");
    }

    Ok(Arc::new(OcrRouter::new(Arc::new(remote), Arc::new(local))))
}
