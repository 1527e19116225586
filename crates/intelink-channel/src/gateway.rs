//! 알림 게이트웨이.
//!
//! 소비자(UI, CLI)가 채널에 접근하는 유일한 표면.
//! 조회는 이벤트 루프가 게시한 최신 스냅샷을 읽고, 명령은 루프 큐로 보낸다.

use intelink_core::models::channel::{ChannelStats, ChannelStatus};
use intelink_core::models::notification::Notification;
use intelink_core::models::signal::Signal;
use intelink_core::ports::auth::TokenProvider;
use intelink_core::ports::transport::ChannelTransport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::event::{Command, LoopEvent};
use crate::lifecycle::{ChannelManager, ChannelSettings};

/// 소비자에게 보이는 채널 상태 스냅샷
#[derive(Debug, Clone, Default, Serialize)]
pub struct GatewayState {
    pub status: ChannelStatus,
    /// 마지막으로 디코딩된 프레임 (타입 무관)
    pub last_message: Option<Value>,
    /// 최신순, 최대 50개
    pub signals: Vec<Signal>,
    /// 최신순, 최대 20개
    pub notifications: Vec<Notification>,
    pub stats: ChannelStats,
}

/// 알림 게이트웨이
///
/// 생성 시 이벤트 루프 태스크를 띄우며, 드롭되면 루프도 종료된다.
/// 연결은 [`connect`](Self::connect)를 호출해야 시작된다.
pub struct NotificationGateway {
    events: mpsc::UnboundedSender<LoopEvent>,
    state: watch::Receiver<GatewayState>,
    task: Option<JoinHandle<()>>,
}

impl NotificationGateway {
    /// 이벤트 루프 시작 (tokio 런타임 안에서 호출)
    pub fn spawn(
        settings: ChannelSettings,
        transport: Arc<dyn ChannelTransport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(GatewayState::default());
        let manager = ChannelManager::new(
            settings,
            transport,
            tokens,
            events_tx.clone(),
            events_rx,
            state_tx,
        );

        Self {
            events: events_tx,
            state,
            task: Some(tokio::spawn(manager.run())),
        }
    }

    // ── 조회 ──

    pub fn status(&self) -> ChannelStatus {
        self.state.borrow().status
    }

    pub fn last_message(&self) -> Option<Value> {
        self.state.borrow().last_message.clone()
    }

    /// 시그널 피드 (최신순)
    pub fn signals(&self) -> Vec<Signal> {
        self.state.borrow().signals.clone()
    }

    /// 알림 피드 (최신순)
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.borrow().notifications.clone()
    }

    pub fn stats(&self) -> ChannelStats {
        self.state.borrow().stats.clone()
    }

    /// 전체 상태 스냅샷
    pub fn snapshot(&self) -> GatewayState {
        self.state.borrow().clone()
    }

    /// 상태 변경 구독
    pub fn subscribe(&self) -> watch::Receiver<GatewayState> {
        self.state.clone()
    }

    // ── 명령 ──

    /// 연결 시작 — 이미 연결 중/연결됨이면 no-op
    pub fn connect(&self) {
        self.send(Command::Connect);
    }

    /// 연결 해제 — 대기 중인 재연결과 하트비트도 취소
    pub fn disconnect(&self) {
        self.send(Command::Disconnect);
    }

    /// 수동 재연결 (해제 후 연결)
    pub fn reconnect(&self) {
        self.send(Command::Disconnect);
        self.send(Command::Connect);
    }

    /// 알림 하나 닫기
    pub fn dismiss(&self, notification_id: i64) {
        self.send(Command::Dismiss(notification_id));
    }

    /// 알림 전체 닫기 (시그널 피드는 유지)
    pub fn clear_all(&self) {
        self.send(Command::ClearAll);
    }

    /// 이벤트 루프 종료 후 대기
    pub async fn shutdown(mut self) {
        self.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("채널 이벤트 루프 비정상 종료: {e}");
            }
        }
    }

    fn send(&self, command: Command) {
        if self.events.send(LoopEvent::Command(command.clone())).is_err() {
            debug!("이벤트 루프 종료됨, 명령 무시: {command:?}");
        }
    }
}

impl Drop for NotificationGateway {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.events.send(LoopEvent::Command(Command::Shutdown));
        }
    }
}
