//! # lingshot-web
//!
//! 로컬 제어 API 서버.
//! Axum 기반 REST API + SSE 이벤트 스트림.
//!
//! ## 기능
//! - 상태 조회, 캡처 대상 선택
//! - 모니터 시작/일시정지/중지, 즉시 번역, 작업 중지
//! - 번역 설정 조회/변경 (설정 파일에 저장)
//! - 번역 결과 조회/삭제
//! - 백엔드 모델 목록
//! - 파이프라인 이벤트 실시간 스트림

pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use lingshot_core::config::WebConfig;
use lingshot_core::config_manager::ConfigManager;
use lingshot_network::model_catalog::ModelCatalog;
use lingshot_pipeline::engine::Engine;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 파이프라인 제어
    pub engine: Arc<Engine>,
    /// 설정 관리자 (설정 변경 저장)
    pub config_manager: Option<ConfigManager>,
    /// 백엔드 모델 목록
    pub catalog: Option<Arc<ModelCatalog>>,
}

/// 라우터 구성 (`/api` + CORS + 요청 추적)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 로컬 제어 API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(engine: Arc<Engine>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState {
                engine,
                config_manager: None,
                catalog: None,
            },
        }
    }

    /// 설정 관리자 설정
    pub fn with_config_manager(mut self, config_manager: ConfigManager) -> Self {
        self.state.config_manager = Some(config_manager);
        self
    }

    /// 모델 목록 조회기 설정
    pub fn with_model_catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.state.catalog = Some(catalog);
        self
    }

    /// 종료 신호까지 서버 실행.
    ///
    /// 설정 포트가 사용 중이면 다음 포트로 넘어가며 최대 [`MAX_PORT_ATTEMPTS`]번 시도한다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        let (listener, addr) = bind_with_fallback(host, self.config.port).await?;
        info!("제어 API 서버 시작: http://{addr}");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(async move {
                // 송신 측이 사라져도 종료로 본다
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
                info!("웹 서버 종료 신호 수신");
            })
            .await?;

        info!("제어 API 서버 종료");
        Ok(())
    }

    /// 설정 포트 기준 URL (대체 포트로 뜬 경우는 로그 참조)
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

async fn bind_with_fallback(
    host: Ipv4Addr,
    base_port: u16,
) -> Result<(TcpListener, SocketAddr), std::io::Error> {
    let last_port = base_port.saturating_add(MAX_PORT_ATTEMPTS - 1);
    for port in base_port..=last_port {
        let addr = SocketAddr::from((host, port));
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if port != base_port {
                    warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                }
                return Ok((listener, addr));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                warn!("포트 {port} 이미 사용 중");
            }
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::AddrInUse,
        format!("포트 {base_port}-{last_port} 모두 사용 불가"),
    ))
}

#[cfg(test)]
mod test_support;
