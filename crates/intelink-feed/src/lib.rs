//! # intelink-feed
//!
//! 피드 파이프라인.
//! 수신 프레임을 디코딩해 타입별로 분류하고, 용량이 제한된
//! 최신순 시그널/알림 피드에 반영한다. 모든 연산은 동기이며
//! 단일 이벤트 루프에서만 호출된다.

pub mod dispatcher;
pub mod feed;
pub mod store;
