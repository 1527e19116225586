//! 채널 상태 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 채널 연결 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelStatus {
    /// 연결 끊김
    #[default]
    Disconnected,
    /// 연결됨
    Connected,
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelStatus::Connected => write!(f, "Connected"),
            ChannelStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// 채널 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelStats {
    /// 연결 시도 횟수 (토큰 없음/주소 오류로 건너뛴 시도 제외)
    pub connect_attempts: u64,
    /// 예약된 재연결 횟수
    pub reconnects_scheduled: u64,
    /// 디코딩에 성공한 수신 프레임 수
    pub frames_received: u64,
    /// 디코딩 실패로 버린 프레임 수
    pub frames_discarded: u64,
    /// 마지막 연결 성공 시각
    pub last_connected_at: Option<DateTime<Utc>>,
}
