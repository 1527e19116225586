//! 채널 라이프사이클.
//!
//! 게이트웨이 연결 시작, 상태 변화/새 알림 로그, 종료 조건 대기 후 정리까지
//! 바이너리 쪽 수명을 한곳에서 관리한다.

use intelink_channel::{GatewayState, NotificationGateway};
use intelink_core::models::channel::ChannelStatus;
use intelink_core::models::notification::Notification;
use std::future::Future;
use std::io;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 게이트웨이와 상태 감시 태스크의 묶음
pub struct ChannelLifecycle {
    gateway: NotificationGateway,
    stop_tx: watch::Sender<bool>,
    monitor: JoinHandle<()>,
}

impl ChannelLifecycle {
    /// 상태 감시를 붙이고 연결을 시작한다
    pub fn start(gateway: NotificationGateway) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let monitor = tokio::spawn(watch_gateway(gateway.subscribe(), stop_rx));
        gateway.connect();
        Self {
            gateway,
            stop_tx,
            monitor,
        }
    }

    /// `stop`이 끝날 때까지 실행한 뒤 게이트웨이를 내리고 마지막 상태를 돌려준다
    pub async fn run_until<F>(self, stop: F) -> GatewayState
    where
        F: Future<Output = ()>,
    {
        stop.await;
        info!("채널 종료 시작");

        let mut state = self.gateway.subscribe();
        self.gateway.shutdown().await;

        let _ = self.stop_tx.send(true);
        if let Err(e) = self.monitor.await {
            warn!("상태 감시 태스크 비정상 종료: {e}");
        }

        let final_state = state.borrow_and_update().clone();
        info!("채널 종료 완료: {}", final_state.status);
        final_state
    }
}

/// OS 종료 시그널 대기 (SIGINT, SIGTERM; unix 외에는 Ctrl+C)
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl+C 수신");
    }

    Ok(())
}

/// `newest_seen` 이후에 들어온 알림 (오래된 것부터)
///
/// 피드는 최신순이므로 이미 본 ID를 만나면 멈춘다.
fn fresh_notifications<'a>(
    feed: &'a [Notification],
    newest_seen: Option<i64>,
) -> Vec<&'a Notification> {
    let mut fresh: Vec<&Notification> = feed
        .iter()
        .take_while(|n| newest_seen.map_or(true, |seen| n.id > seen))
        .collect();
    fresh.reverse();
    fresh
}

/// 상태 변화/새 알림 로그 (종료 신호 또는 게이트웨이 종료까지)
async fn watch_gateway(mut state: watch::Receiver<GatewayState>, mut stop: watch::Receiver<bool>) {
    let mut last_status = ChannelStatus::Disconnected;
    let mut newest_seen: Option<i64> = None;

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = stop.wait_for(|stopped| *stopped) => break,
        }

        let snapshot = state.borrow_and_update().clone();
        if snapshot.status != last_status {
            info!("채널 상태: {last_status} → {}", snapshot.status);
            last_status = snapshot.status;
        }

        for n in fresh_notifications(&snapshot.notifications, newest_seen) {
            info!("[{:?}/{:?}] {}: {}", n.kind, n.severity, n.title, n.message);
        }
        if let Some(first) = snapshot.notifications.first() {
            newest_seen = Some(newest_seen.map_or(first.id, |seen| seen.max(first.id)));
        }
    }
}
