//! 하트비트.
//!
//! 채널이 열려 있는 동안 주기마다 `{"type":"ping"}`을 보낸다.
//! 첫 ping은 한 주기 뒤. 전송 실패는 재시도하지 않는다 (뒤따르는 close가 처리).

use intelink_core::models::frame::OutboundFrame;
use intelink_core::ports::transport::FrameSender;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// 하트비트 태스크 시작. 반환된 핸들을 abort하면 즉시 멈춘다.
pub fn spawn_heartbeat(sender: Arc<dyn FrameSender>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(run_heartbeat(sender, interval))
}

/// 하트비트 루프 (취소될 때까지)
pub async fn run_heartbeat(sender: Arc<dyn FrameSender>, interval: Duration) {
    if interval.is_zero() {
        warn!("하트비트 주기가 0, 하트비트 비활성화");
        return;
    }

    let ping = match OutboundFrame::Ping.to_text() {
        Ok(text) => text,
        Err(e) => {
            warn!("ping 직렬화 실패: {e}");
            return;
        }
    };

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match sender.send_text(&ping).await {
            Ok(()) => debug!("ping 전송"),
            Err(e) => debug!("ping 전송 실패: {e}"),
        }
    }
}
