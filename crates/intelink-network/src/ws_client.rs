//! WebSocket 전송 어댑터.
//!
//! `tokio-tungstenite` 기반 `ChannelTransport` 포트 구현.
//! 수신은 별도 태스크가 `TransportEvent`로 변환해 채널로 넘기고,
//! 송신은 분리된 sink를 잠금으로 공유하는 `WsSender`가 담당한다.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use intelink_core::error::CoreError;
use intelink_core::ports::transport::{ChannelLink, ChannelTransport, FrameSender, TransportEvent};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoint::redact;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 수신 이벤트 채널 버퍼
const EVENT_BUFFER: usize = 64;

/// WebSocket 전송 — `ChannelTransport` 포트 구현
#[derive(Debug, Clone, Default)]
pub struct WsTransport;

impl WsTransport {
    /// 새 전송 생성
    pub fn new() -> Self {
        Self
    }

    /// 수신 루프
    ///
    /// 에러는 `Error` 다음 `Closed`로, 정상 종료는 `Closed`로 끝난다.
    async fn read_loop(mut read: SplitStream<WsStream>, tx: mpsc::Sender<TransportEvent>) {
        while let Some(msg) = read.next().await {
            let event = match msg {
                Ok(Message::Text(text)) => TransportEvent::Text(text.as_str().to_owned()),
                Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => TransportEvent::Text(text),
                    Err(_) => {
                        debug!("UTF-8이 아닌 바이너리 프레임 무시 ({}바이트)", data.len());
                        continue;
                    }
                },
                Ok(Message::Close(frame)) => {
                    debug!("서버 종료 프레임 수신: {frame:?}");
                    break;
                }
                Ok(_) => continue, // Ping/Pong은 자동 처리
                Err(e) => {
                    warn!("WebSocket 수신 에러: {e}");
                    if tx.send(TransportEvent::Error(e.to_string())).await.is_err() {
                        return;
                    }
                    break;
                }
            };

            if tx.send(event).await.is_err() {
                debug!("수신 채널 닫힘, 수신 루프 종료");
                return;
            }
        }

        let _ = tx.send(TransportEvent::Closed).await;
        debug!("WebSocket 수신 루프 종료");
    }
}

#[async_trait]
impl ChannelTransport for WsTransport {
    async fn open(&self, url: &Url) -> Result<ChannelLink, CoreError> {
        info!("WebSocket 연결: {}", redact(url));

        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| CoreError::Network(format!("WebSocket 연결 실패: {e}")))?;

        let (write, read) = ws_stream.split();
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        tokio::spawn(Self::read_loop(read, tx));

        Ok(ChannelLink {
            sender: Arc::new(WsSender {
                write: Mutex::new(write),
            }),
            events: rx,
        })
    }
}

/// WebSocket 송신기
pub struct WsSender {
    write: Mutex<SplitSink<WsStream, Message>>,
}

#[async_trait]
impl FrameSender for WsSender {
    async fn send_text(&self, text: &str) -> Result<(), CoreError> {
        let mut write = self.write.lock().await;
        write
            .send(Message::text(text.to_owned()))
            .await
            .map_err(|e| CoreError::Network(format!("WebSocket 전송 실패: {e}")))
    }

    async fn close(&self) -> Result<(), CoreError> {
        let mut write = self.write.lock().await;
        write
            .send(Message::Close(None))
            .await
            .map_err(|e| CoreError::Network(format!("WebSocket 종료 실패: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let transport = WsTransport::new();
        let url = Url::parse("ws://127.0.0.1:1/api/intelligence/ws/admin/global").unwrap();
        let result = transport.open(&url).await;
        assert!(matches!(result, Err(CoreError::Network(_))));
    }
}
