//! 알림 모델.
//!
//! 수신 이벤트에서 파생되는 사용자 대상 알림 레코드.
//! 생성 이후 변경되지 않으며, ID 단위 또는 일괄로만 제거된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::Severity;

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Signal,
    Risk,
    Recommendation,
}

/// 사용자 대상 알림
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// 생성 시각(ms) 기반 단조 증가 ID
    pub id: i64,
    /// 알림 종류
    pub kind: NotificationKind,
    /// 제목
    pub title: String,
    /// 본문
    pub message: String,
    /// 심각도
    pub severity: Severity,
    /// 이벤트 시각
    pub timestamp: DateTime<Utc>,
}

/// 알림 ID 발급기
///
/// 현재 시각(epoch ms)을 기본값으로 쓰되, 같은 밀리초에 여러 건이 생성되면
/// 직전 ID + 1을 발급해 엄격한 단조 증가를 유지한다.
#[derive(Debug, Default)]
pub struct NotificationIdGenerator {
    last: i64,
}

impl NotificationIdGenerator {
    /// 새 발급기 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 다음 ID 발급
    pub fn next_id(&mut self) -> i64 {
        self.next_at(Utc::now())
    }

    /// 지정 시각 기준 다음 ID 발급
    pub fn next_at(&mut self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        self.last = if candidate > self.last {
            candidate
        } else {
            self.last + 1
        };
        self.last
    }
}
