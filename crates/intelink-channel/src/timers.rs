//! 채널 타이머.
//!
//! 하트비트(Open 동안)와 재연결(재시도 대기 동안) 두 타이머만 존재하며,
//! 연결 상태 옆에 독립 핸들로 보관되어 해제 시 함께 취소된다.

use intelink_core::ports::transport::FrameSender;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::event::LoopEvent;
use crate::heartbeat;

/// 하트비트/재연결 타이머 핸들
#[derive(Debug, Default)]
pub(crate) struct ChannelTimers {
    heartbeat: Option<JoinHandle<()>>,
    reconnect: Option<(u64, JoinHandle<()>)>,
    next_ticket: u64,
}

impl ChannelTimers {
    /// 하트비트 시작 (기존 하트비트는 취소)
    pub(crate) fn start_heartbeat(&mut self, sender: Arc<dyn FrameSender>, interval: Duration) {
        self.cancel_heartbeat();
        self.heartbeat = Some(heartbeat::spawn_heartbeat(sender, interval));
    }

    pub(crate) fn cancel_heartbeat(&mut self) {
        if let Some(handle) = self.heartbeat.take() {
            handle.abort();
            debug!("하트비트 취소");
        }
    }

    /// 재연결 예약 — 만료 시 `ReconnectDue { ticket }`을 이벤트 루프로 보낸다.
    ///
    /// 기존 예약은 취소되므로 살아있는 재연결 타이머는 항상 하나 이하.
    pub(crate) fn schedule_reconnect(
        &mut self,
        delay: Duration,
        events: mpsc::UnboundedSender<LoopEvent>,
    ) -> u64 {
        self.cancel_reconnect();
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(LoopEvent::ReconnectDue { ticket });
        });
        self.reconnect = Some((ticket, handle));
        ticket
    }

    /// 만료된 예약 소비. 취소/교체된 예약의 늦은 만료면 false.
    pub(crate) fn take_reconnect(&mut self, ticket: u64) -> bool {
        match &self.reconnect {
            Some((current, _)) if *current == ticket => {
                self.reconnect = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel_reconnect(&mut self) {
        if let Some((ticket, handle)) = self.reconnect.take() {
            handle.abort();
            debug!("재연결 예약 취소 (ticket={ticket})");
        }
    }

    /// 두 타이머 모두 취소
    pub(crate) fn cancel_all(&mut self) {
        self.cancel_heartbeat();
        self.cancel_reconnect();
    }

    pub(crate) fn heartbeat_active(&self) -> bool {
        self.heartbeat.is_some()
    }

    pub(crate) fn reconnect_pending(&self) -> bool {
        self.reconnect.is_some()
    }
}

impl Drop for ChannelTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
