//! 애플리케이션 설정 구조체.
//!
//! 서버 주소, 조직 범위, 재연결/하트비트 주기, 피드 용량 등
//! 런타임 설정을 정의한다. [`crate::config_manager::ConfigManager`]가 JSON 파일로 로드/저장한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 실시간 채널 설정
    #[serde(default)]
    pub channel: ChannelConfig,
    /// 피드 용량 설정
    #[serde(default)]
    pub feed: FeedConfig,
}

// ============================================================
// 서버/채널/피드 설정
// ============================================================

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// REST API 기본 URL (예: "https://api.example.com")
    pub base_url: String,
    /// 조직 ID (None이면 관리자 전역 채널)
    #[serde(default)]
    pub org_id: Option<String>,
}

/// 실시간 채널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// 연결 종료 후 재연결 지연 (밀리초, 고정값)
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// 하트비트 주기 (밀리초)
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

impl ChannelConfig {
    /// 재연결 지연을 Duration으로 반환
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// 하트비트 주기를 Duration으로 반환
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

/// 피드 용량 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// 시그널 피드 최대 크기
    #[serde(default = "default_signal_capacity")]
    pub signal_capacity: usize,
    /// 알림 피드 최대 크기
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            signal_capacity: default_signal_capacity(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8000".to_string(),
                org_id: None,
            },
            channel: ChannelConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_reconnect_delay_ms() -> u64 {
    5_000
}
fn default_heartbeat_interval_ms() -> u64 {
    30_000
}
fn default_signal_capacity() -> usize {
    50
}
fn default_notification_capacity() -> usize {
    20
}
