//! # intelink-network
//!
//! 실시간 채널 네트워크 어댑터.
//! `tokio-tungstenite` 기반 WebSocket 전송, REST 기본 URL에서의 채널 주소 해석,
//! 인증 서브시스템이 기록하는 Bearer 토큰 저장소를 제공한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use intelink_network::auth::TokenStore;
//! use intelink_network::endpoint::resolve_channel_url;
//! use intelink_network::ws_client::WsTransport;
//!
//! let url = resolve_channel_url("https://api.example.com", Some("org1"))?;
//! ```

pub mod auth;
pub mod endpoint;
pub mod ws_client;
