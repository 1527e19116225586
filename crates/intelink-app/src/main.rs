//! # intelink-app
//!
//! INTELINK 클라이언트 바이너리 진입점.
//! 설정을 로드해 알림 게이트웨이를 띄우고, 상태 변화와 새 알림을 로그로 남긴다.

mod lifecycle;

use anyhow::{Context, Result};
use clap::Parser;
use intelink_channel::{ChannelSettings, NotificationGateway};
use intelink_core::config_manager::ConfigManager;
use intelink_network::auth::TokenStore;
use intelink_network::ws_client::WsTransport;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::{shutdown_signal, ChannelLifecycle};

/// INTELINK 실시간 알림 클라이언트
#[derive(Parser, Debug)]
#[command(name = "intelink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: 설정 파일 또는 http://localhost:8000)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 조직 ID (생략 시 관리자 전역 채널)
    #[arg(long)]
    org: Option<String>,

    /// Bearer 토큰
    #[arg(long, env = "INTELINK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 종료 시 마지막 상태를 JSON으로 출력
    #[arg(long)]
    print_state: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "intelink={},intelink_app={},intelink_core={},intelink_network={},intelink_feed={},intelink_channel={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("INTELINK 클라이언트 시작");

    // 설정 로드
    let config_manager = match args.config.clone() {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", config_manager.config_path().display());

    // CLI 인자로 설정 오버라이드 (파일에는 저장하지 않음)
    let mut config = config_manager.get();
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    if let Some(ref org) = args.org {
        config.server.org_id = Some(org.clone());
    }
    info!(
        "서버: {} (조직: {})",
        config.server.base_url,
        config.server.org_id.as_deref().unwrap_or("전역")
    );

    let tokens = Arc::new(TokenStore::new());
    if let Some(token) = args.token {
        tokens.set_token(token);
    }
    if !tokens.is_authenticated() {
        warn!("토큰 없음 (--token 또는 INTELINK_TOKEN), 채널 연결을 건너뜀");
    }

    let gateway = NotificationGateway::spawn(
        ChannelSettings::from_config(&config),
        Arc::new(WsTransport::new()),
        tokens,
    );

    let snapshot = ChannelLifecycle::start(gateway)
        .run_until(async {
            if let Err(e) = shutdown_signal().await {
                warn!("시그널 핸들러 등록 실패, 즉시 종료: {e}");
            }
        })
        .await;

    if args.print_state {
        let json = serde_json::to_string_pretty(&snapshot).context("상태 직렬화 실패")?;
        println!("{json}");
    }

    let stats = snapshot.stats;
    info!(
        "INTELINK 클라이언트 종료 (연결 시도 {}, 재연결 예약 {}, 수신 {}, 폐기 {})",
        stats.connect_attempts,
        stats.reconnects_scheduled,
        stats.frames_received,
        stats.frames_discarded
    );
    Ok(())
}
