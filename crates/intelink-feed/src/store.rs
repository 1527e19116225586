//! 피드 저장소.
//!
//! 시그널 피드와 알림 피드, 두 개의 독립된 용량 제한 피드를 관리한다.

use chrono::{DateTime, Utc};
use intelink_core::config::FeedConfig;
use intelink_core::models::notification::{Notification, NotificationIdGenerator, NotificationKind};
use intelink_core::models::signal::{Severity, Signal};

use crate::feed::BoundedFeed;

/// ID가 붙기 전의 알림
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// 시그널/알림 피드 저장소
#[derive(Debug)]
pub struct FeedStore {
    signals: BoundedFeed<Signal>,
    notifications: BoundedFeed<Notification>,
    ids: NotificationIdGenerator,
}

impl FeedStore {
    /// 설정 용량으로 생성
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_capacity(config.signal_capacity, config.notification_capacity)
    }

    /// 지정 용량으로 생성
    pub fn with_capacity(signal_capacity: usize, notification_capacity: usize) -> Self {
        Self {
            signals: BoundedFeed::new(signal_capacity),
            notifications: BoundedFeed::new(notification_capacity),
            ids: NotificationIdGenerator::new(),
        }
    }

    /// 시그널 추가 (최신순)
    pub fn push_signal(&mut self, signal: Signal) -> &[Signal] {
        self.signals.push(signal)
    }

    /// 시그널 확인 처리 — 위치를 유지한 채 교체
    ///
    /// 해당 ID가 없으면 false.
    pub fn acknowledge_signal(&mut self, signal_id: &str, acknowledged_by: Option<String>) -> bool {
        self.signals.update_by(
            |s| s.signal_id == signal_id,
            |s| s.acknowledged(acknowledged_by),
        )
    }

    /// 알림 생성 후 추가 (최신순)
    pub fn push_notification(&mut self, draft: NotificationDraft) -> &[Notification] {
        let notification = Notification {
            id: self.ids.next_id(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            severity: draft.severity,
            timestamp: draft.timestamp,
        };
        self.notifications.push(notification)
    }

    /// 알림 하나 제거
    pub fn remove_notification(&mut self, id: i64) -> bool {
        self.notifications.remove_by(|n| n.id == id).is_some()
    }

    /// 알림 전체 제거
    pub fn clear_notifications(&mut self) -> &[Notification] {
        self.notifications.clear()
    }

    /// 시그널 스냅샷
    pub fn signals(&self) -> &[Signal] {
        self.signals.as_slice()
    }

    /// 알림 스냅샷
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.as_slice()
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}
