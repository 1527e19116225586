//! Bearer 토큰 저장소.
//!
//! 인증 서브시스템이 로그인/로그아웃 시 토큰을 기록하고,
//! 채널은 연결 시도마다 현재 토큰을 읽는다. 갱신 로직은 없다.

use intelink_core::ports::auth::TokenProvider;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// 인메모리 토큰 저장소 — `TokenProvider` 포트 구현
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// 빈 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 토큰이 설정된 저장소 생성
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    /// 토큰 기록 (로그인 시)
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
        debug!("인증 토큰 설정됨");
    }

    /// 토큰 제거 (로그아웃 시)
    pub fn clear(&self) {
        *self.token.write() = None;
        debug!("인증 토큰 제거됨");
    }

    /// 토큰 보유 여부
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}

impl TokenProvider for TokenStore {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().clone().filter(|t| !t.is_empty())
    }
}
