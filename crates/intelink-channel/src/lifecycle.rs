//! 연결 라이프사이클 관리.
//!
//! 채널 하나를 소유하는 상태 머신:
//! Idle → Connecting → Open → (Closed | Errored) → Idle (재연결 예약 후),
//! 또는 `disconnect()`로만 도달하는 Stopped.
//!
//! 소켓 이벤트, 타이머 만료, 소비자 명령은 모두 `LoopEvent`로 하나의 큐에 들어와
//! [`ChannelManager::run`]에서 도착 순서대로 끝까지 처리된다.

use chrono::Utc;
use intelink_core::config::{AppConfig, FeedConfig};
use intelink_core::models::channel::{ChannelStats, ChannelStatus};
use intelink_core::ports::auth::TokenProvider;
use intelink_core::ports::transport::{ChannelLink, ChannelTransport, FrameSender, TransportEvent};
use intelink_feed::dispatcher::{DispatchOutcome, MessageDispatcher};
use intelink_network::endpoint::{authorize, redact, resolve_channel_url};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::event::{Command, LoopEvent};
use crate::gateway::GatewayState;
use crate::timers::ChannelTimers;

/// 채널 설정
#[derive(Debug, Clone)]
pub struct ChannelSettings {
    /// REST 기본 URL
    pub base_url: String,
    /// 조직 범위 (None이면 관리자 전역 채널)
    pub org_id: Option<String>,
    /// 종료 후 재연결 지연 (고정)
    pub reconnect_delay: Duration,
    /// 하트비트 주기
    pub heartbeat_interval: Duration,
    /// 피드 용량
    pub feed: FeedConfig,
}

impl ChannelSettings {
    /// 기본 주기/용량으로 생성
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&AppConfig::default_config()).with_base_url(base_url)
    }

    /// 애플리케이션 설정에서 생성
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.server.base_url.clone(),
            org_id: config.server.org_id.clone(),
            reconnect_delay: config.channel.reconnect_delay(),
            heartbeat_interval: config.channel.heartbeat_interval(),
            feed: config.feed.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }
}

/// 내부 연결 단계
enum Phase {
    /// 채널 없음 (최초 또는 재연결 대기)
    Idle,
    /// 핸드셰이크 진행 중
    Connecting { generation: u64 },
    /// 연결됨
    Open {
        generation: u64,
        sender: Arc<dyn FrameSender>,
    },
    /// 명시적 `disconnect()` 이후
    Stopped,
}

impl Phase {
    /// 현재 채널 세대 (채널이 없으면 None)
    fn generation(&self) -> Option<u64> {
        match self {
            Phase::Connecting { generation } | Phase::Open { generation, .. } => Some(*generation),
            Phase::Idle | Phase::Stopped => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Connecting { .. } => "connecting",
            Phase::Open { .. } => "open",
            Phase::Stopped => "stopped",
        }
    }
}

/// 연결 라이프사이클 관리자 — 이벤트 루프의 유일한 상태 소유자
pub(crate) struct ChannelManager {
    settings: ChannelSettings,
    transport: Arc<dyn ChannelTransport>,
    tokens: Arc<dyn TokenProvider>,
    dispatcher: MessageDispatcher,
    phase: Phase,
    generation: u64,
    /// 현재 채널의 연결+수신 전달 태스크
    pump: Option<JoinHandle<()>>,
    timers: ChannelTimers,
    status: ChannelStatus,
    stats: ChannelStats,
    events_tx: mpsc::UnboundedSender<LoopEvent>,
    events_rx: mpsc::UnboundedReceiver<LoopEvent>,
    state_tx: watch::Sender<GatewayState>,
}

impl ChannelManager {
    pub(crate) fn new(
        settings: ChannelSettings,
        transport: Arc<dyn ChannelTransport>,
        tokens: Arc<dyn TokenProvider>,
        events_tx: mpsc::UnboundedSender<LoopEvent>,
        events_rx: mpsc::UnboundedReceiver<LoopEvent>,
        state_tx: watch::Sender<GatewayState>,
    ) -> Self {
        let dispatcher = MessageDispatcher::new(&settings.feed);
        Self {
            settings,
            transport,
            tokens,
            dispatcher,
            phase: Phase::Idle,
            generation: 0,
            pump: None,
            timers: ChannelTimers::default(),
            status: ChannelStatus::Disconnected,
            stats: ChannelStats::default(),
            events_tx,
            events_rx,
            state_tx,
        }
    }

    /// 이벤트 루프 (Shutdown 명령까지)
    pub(crate) async fn run(mut self) {
        debug!("채널 이벤트 루프 시작");
        while let Some(event) = self.events_rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        self.disconnect();
        self.publish();
        debug!("채널 이벤트 루프 종료");
    }

    /// 이벤트 하나 처리. 루프를 끝내야 하면 false.
    fn handle(&mut self, event: LoopEvent) -> bool {
        match event {
            LoopEvent::Command(command) => return self.handle_command(command),
            LoopEvent::Opened { generation, sender } => self.on_open(generation, sender),
            LoopEvent::Frame { generation, text } => self.on_frame(generation, &text),
            LoopEvent::Errored { generation, reason } => self.on_error(generation, &reason),
            LoopEvent::Closed { generation } => self.on_close(generation),
            LoopEvent::ReconnectDue { ticket } => {
                if self.timers.take_reconnect(ticket) {
                    info!("재연결 시도");
                    self.connect();
                } else {
                    debug!("취소된 재연결 만료 무시 (ticket={ticket})");
                }
            }
        }
        self.publish();
        true
    }

    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Connect => self.connect(),
            Command::Disconnect => self.disconnect(),
            Command::Dismiss(id) => {
                if !self.dispatcher.store_mut().remove_notification(id) {
                    debug!("닫을 알림 없음: {id}");
                }
            }
            Command::ClearAll => {
                self.dispatcher.store_mut().clear_notifications();
            }
            Command::Shutdown => {
                info!("채널 종료 요청");
                return false;
            }
        }
        self.publish();
        true
    }

    /// 연결 — 이미 연결 중이거나 연결됐으면 no-op, 토큰이 없으면 조용히 건너뜀
    fn connect(&mut self) {
        if matches!(self.phase, Phase::Connecting { .. } | Phase::Open { .. }) {
            debug!("채널이 이미 {} 상태, connect 무시", self.phase.name());
            return;
        }

        let Some(token) = self.tokens.bearer_token() else {
            debug!("인증 토큰 없음, 연결 건너뜀");
            return;
        };

        // 수동 연결이 대기 중인 재연결을 대체한다
        if self.timers.reconnect_pending() {
            debug!("대기 중인 재연결을 수동 연결로 대체");
            self.timers.cancel_reconnect();
        }

        let url = match resolve_channel_url(&self.settings.base_url, self.settings.org_id.as_deref())
        {
            Ok(url) => url,
            Err(e) => {
                // 생성 실패는 재연결을 예약하지 않는다
                warn!("채널 주소 생성 실패, 재시도 안함: {e}");
                self.phase = Phase::Idle;
                self.status = ChannelStatus::Disconnected;
                return;
            }
        };

        self.generation += 1;
        let generation = self.generation;
        self.stats.connect_attempts += 1;
        self.phase = Phase::Connecting { generation };

        info!("채널 연결 시작: {} (세대 {generation})", redact(&url));
        let url = authorize(&url, &token);
        self.pump = Some(tokio::spawn(pump(
            self.transport.clone(),
            url,
            generation,
            self.events_tx.clone(),
        )));
    }

    /// 명시적 해제 — 멱등
    fn disconnect(&mut self) {
        self.timers.cancel_all();

        if let Some(pump) = self.pump.take() {
            pump.abort();
        }

        let previous = std::mem::replace(&mut self.phase, Phase::Stopped);
        if let Phase::Open { sender, .. } = previous {
            close_in_background(sender);
        }

        if self.status == ChannelStatus::Connected {
            info!("채널 연결 해제");
        }
        self.status = ChannelStatus::Disconnected;
    }

    fn on_open(&mut self, generation: u64, sender: Arc<dyn FrameSender>) {
        if !matches!(self.phase, Phase::Connecting { generation: g } if g == generation) {
            debug!("교체된 채널의 open 이벤트, 닫음 (세대 {generation})");
            close_in_background(sender);
            return;
        }

        info!("채널 연결됨 (세대 {generation})");
        self.timers
            .start_heartbeat(sender.clone(), self.settings.heartbeat_interval);
        self.phase = Phase::Open { generation, sender };
        self.status = ChannelStatus::Connected;
        self.stats.last_connected_at = Some(Utc::now());
    }

    fn on_frame(&mut self, generation: u64, text: &str) {
        if !matches!(self.phase, Phase::Open { generation: g, .. } if g == generation) {
            debug!("교체된 채널의 프레임 무시 (세대 {generation})");
            return;
        }

        match self.dispatcher.dispatch(text) {
            DispatchOutcome::Discarded => self.stats.frames_discarded += 1,
            DispatchOutcome::Recorded | DispatchOutcome::FeedsChanged => {
                self.stats.frames_received += 1
            }
        }
    }

    /// 에러 — 상태만 내린다. 재연결 예약은 뒤따르는 close가 한다.
    fn on_error(&mut self, generation: u64, reason: &str) {
        if self.phase.generation() != Some(generation) {
            return;
        }
        warn!("채널 에러: {reason}");
        self.status = ChannelStatus::Disconnected;
    }

    fn on_close(&mut self, generation: u64) {
        if self.phase.generation() != Some(generation) {
            debug!("교체된 채널의 close 이벤트 무시 (세대 {generation})");
            return;
        }

        if self.timers.heartbeat_active() {
            self.timers.cancel_heartbeat();
        }
        self.pump = None;
        self.phase = Phase::Idle;
        self.status = ChannelStatus::Disconnected;

        let delay = self.settings.reconnect_delay;
        self.timers.schedule_reconnect(delay, self.events_tx.clone());
        self.stats.reconnects_scheduled += 1;
        warn!("채널 종료, {}ms 후 재연결", delay.as_millis());
    }

    /// 현재 상태를 소비자에게 게시
    fn publish(&self) {
        let store = self.dispatcher.store();
        self.state_tx.send_replace(GatewayState {
            status: self.status,
            last_message: self.dispatcher.last_message().cloned(),
            signals: store.signals().to_vec(),
            notifications: store.notifications().to_vec(),
            stats: self.stats.clone(),
        });
    }
}

/// 채널 하나의 연결 + 수신 전달
///
/// 핸드셰이크 실패는 `Errored` 다음 `Closed`로 보고되어 재연결 경로를 탄다.
async fn pump(
    transport: Arc<dyn ChannelTransport>,
    url: Url,
    generation: u64,
    events: mpsc::UnboundedSender<LoopEvent>,
) {
    let ChannelLink {
        sender,
        events: mut inbound,
    } = match transport.open(&url).await {
        Ok(link) => link,
        Err(e) => {
            let _ = events.send(LoopEvent::Errored {
                generation,
                reason: e.to_string(),
            });
            let _ = events.send(LoopEvent::Closed { generation });
            return;
        }
    };

    // open 이후 Opened 전송까지는 await가 없어 abort가 끼어들 수 없다.
    // 루프가 이미 없으면 링크를 직접 닫는다.
    if let Err(mpsc::error::SendError(event)) = events.send(LoopEvent::Opened { generation, sender })
    {
        if let LoopEvent::Opened { sender, .. } = event {
            let _ = sender.close().await;
        }
        return;
    }

    while let Some(event) = inbound.recv().await {
        let forwarded = match event {
            TransportEvent::Text(text) => LoopEvent::Frame { generation, text },
            TransportEvent::Error(reason) => LoopEvent::Errored { generation, reason },
            TransportEvent::Closed => break,
        };
        if events.send(forwarded).is_err() {
            return;
        }
    }

    let _ = events.send(LoopEvent::Closed { generation });
}

/// 채널 종료 프레임 전송 (호출자를 막지 않음)
fn close_in_background(sender: Arc<dyn FrameSender>) {
    tokio::spawn(async move {
        if let Err(e) = sender.close().await {
            debug!("채널 종료 프레임 전송 실패: {e}");
        }
    });
}
