//! 테스트용 전송/송신기.

use async_trait::async_trait;
use intelink_core::error::CoreError;
use intelink_core::ports::auth::TokenProvider;
use intelink_core::ports::transport::{ChannelLink, ChannelTransport, FrameSender, TransportEvent};
use parking_lot::Mutex;
use std::future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// 준비된 태스크가 모두 한 바퀴씩 돌도록 양보 (시계는 움직이지 않음)
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// 보낸 프레임을 기록하는 송신기
#[derive(Default)]
pub(crate) struct RecordingSender {
    sent: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    fail_sends: AtomicBool,
    closed: AtomicBool,
}

impl RecordingSender {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSender for RecordingSender {
    async fn send_text(&self, text: &str) -> Result<(), CoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(CoreError::Network("송신 실패".to_string()));
        }
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), CoreError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// `open` 동작 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenMode {
    Succeed,
    Fail,
    Hang,
}

/// 열린 가짜 채널 — 테스트가 서버 쪽 이벤트를 주입한다.
pub(crate) struct MockChannel {
    pub(crate) url: Url,
    pub(crate) inject: mpsc::Sender<TransportEvent>,
    pub(crate) sender: Arc<RecordingSender>,
}

impl MockChannel {
    pub(crate) async fn push_text(&self, text: &str) {
        let _ = self.inject.send(TransportEvent::Text(text.to_string())).await;
    }

    pub(crate) async fn drop_connection(&self) {
        let _ = self.inject.send(TransportEvent::Closed).await;
    }

    pub(crate) async fn fail_connection(&self, reason: &str) {
        let _ = self
            .inject
            .send(TransportEvent::Error(reason.to_string()))
            .await;
        let _ = self.inject.send(TransportEvent::Closed).await;
    }
}

/// 스크립트 가능한 전송
pub(crate) struct MockTransport {
    mode: Mutex<OpenMode>,
    attempts: Mutex<Vec<Url>>,
    channels: Mutex<Vec<Arc<MockChannel>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(OpenMode::Succeed),
            attempts: Mutex::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn set_mode(&self, mode: OpenMode) {
        *self.mode.lock() = mode;
    }

    /// `open` 호출 횟수
    pub(crate) fn open_calls(&self) -> usize {
        self.attempts.lock().len()
    }

    pub(crate) fn attempted_urls(&self) -> Vec<Url> {
        self.attempts.lock().clone()
    }

    /// 성공적으로 열린 채널 수
    pub(crate) fn opened(&self) -> usize {
        self.channels.lock().len()
    }

    pub(crate) fn channel(&self, index: usize) -> Arc<MockChannel> {
        self.channels.lock()[index].clone()
    }

    pub(crate) fn latest(&self) -> Arc<MockChannel> {
        let channels = self.channels.lock();
        channels[channels.len() - 1].clone()
    }
}

#[async_trait]
impl ChannelTransport for MockTransport {
    async fn open(&self, url: &Url) -> Result<ChannelLink, CoreError> {
        self.attempts.lock().push(url.clone());
        let mode = *self.mode.lock();
        match mode {
            OpenMode::Fail => Err(CoreError::Network("핸드셰이크 실패".to_string())),
            OpenMode::Hang => future::pending().await,
            OpenMode::Succeed => {
                let (inject, events) = mpsc::channel(64);
                let sender = RecordingSender::new();
                self.channels.lock().push(Arc::new(MockChannel {
                    url: url.clone(),
                    inject,
                    sender: sender.clone(),
                }));
                Ok(ChannelLink { sender, events })
            }
        }
    }
}

/// 고정 토큰 제공자
pub(crate) struct FixedToken(pub(crate) Mutex<Option<String>>);

impl FixedToken {
    pub(crate) fn some(token: &str) -> Arc<Self> {
        Arc::new(Self(Mutex::new(Some(token.to_string()))))
    }

    pub(crate) fn none() -> Arc<Self> {
        Arc::new(Self(Mutex::new(None)))
    }

    pub(crate) fn set(&self, token: Option<&str>) {
        *self.0.lock() = token.map(str::to_string);
    }
}

impl TokenProvider for FixedToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.lock().clone()
    }
}
