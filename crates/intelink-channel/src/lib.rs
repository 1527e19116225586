//! # intelink-channel
//!
//! 서버 푸시 이벤트를 받는 자가 복구형 실시간 채널.
//!
//! 모든 상태 변경은 하나의 이벤트 루프 태스크에서 순서대로 처리된다.
//! 소켓 이벤트, 타이머 만료, 소비자 명령이 모두 같은 큐로 들어오므로
//! 피드 저장소에 대한 경쟁 조건이 없다.
//!
//! - [`lifecycle`] — 연결 상태 머신과 이벤트 루프
//! - [`heartbeat`] — 연결 중 주기적 ping
//! - `timers` — 하트비트/재연결 타이머 핸들
//! - [`gateway`] — 소비자가 접근하는 유일한 표면

mod event;
pub mod gateway;
pub mod heartbeat;
pub mod lifecycle;
mod timers;

#[cfg(test)]
mod testing;

pub use gateway::{GatewayState, NotificationGateway};
pub use lifecycle::ChannelSettings;
