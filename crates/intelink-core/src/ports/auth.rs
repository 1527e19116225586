//! 인증 토큰 포트.
//!
//! 토큰 발급/갱신은 인증 서브시스템의 책임이며, 채널은 현재 토큰을 읽기만 한다.
//! 구현: `intelink-network` crate (`TokenStore`)

/// Bearer 토큰 제공자
pub trait TokenProvider: Send + Sync {
    /// 현재 유효한 토큰 (없으면 None)
    fn bearer_token(&self) -> Option<String>;
}
