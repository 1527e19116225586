//! 실시간 채널 전송 포트.
//!
//! 구현: `intelink-network` crate (tokio-tungstenite)

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use crate::error::CoreError;

/// 전송 계층에서 올라오는 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// 텍스트 프레임 수신
    Text(String),
    /// 전송 에러 (항상 뒤이어 `Closed`가 온다)
    Error(String),
    /// 연결 종료
    Closed,
}

/// 프레임 송신기
#[async_trait]
pub trait FrameSender: Send + Sync {
    /// 텍스트 프레임 전송
    async fn send_text(&self, text: &str) -> Result<(), CoreError>;

    /// 연결 종료 요청
    async fn close(&self) -> Result<(), CoreError>;
}

/// 수립된 채널 — 송신기 + 수신 이벤트 스트림
pub struct ChannelLink {
    pub sender: Arc<dyn FrameSender>,
    pub events: mpsc::Receiver<TransportEvent>,
}

/// 실시간 채널 전송
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// 채널 연결 수립 (핸드셰이크 완료까지 대기)
    ///
    /// 실패는 일시적 전송 실패로 취급되어 호출자가 재연결을 예약한다.
    async fn open(&self, url: &Url) -> Result<ChannelLink, CoreError>;
}
