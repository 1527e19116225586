//! INTELINK 도메인 모델.
//!
//! 서버에서 푸시되는 실시간 이벤트와 클라이언트 측 피드 레코드를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod channel;
pub mod frame;
pub mod notification;
pub mod signal;
