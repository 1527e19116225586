//! 이벤트 루프 입력.

use intelink_core::ports::transport::FrameSender;
use std::sync::Arc;

/// 소비자 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Connect,
    Disconnect,
    Dismiss(i64),
    ClearAll,
    Shutdown,
}

/// 이벤트 루프가 처리하는 단일 이벤트
///
/// 전송 이벤트는 채널 세대(generation)로 태깅되어, 교체된 채널의 늦은 이벤트를 걸러낸다.
pub(crate) enum LoopEvent {
    Command(Command),
    Opened {
        generation: u64,
        sender: Arc<dyn FrameSender>,
    },
    Frame {
        generation: u64,
        text: String,
    },
    Errored {
        generation: u64,
        reason: String,
    },
    Closed {
        generation: u64,
    },
    ReconnectDue {
        ticket: u64,
    },
}
