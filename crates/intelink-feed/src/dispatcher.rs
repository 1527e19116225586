//! 메시지 디스패처.
//!
//! 수신 텍스트 프레임 → JSON 디코딩 → 마지막 메시지 기록 → `type`별 피드 반영.
//! 디코딩 실패는 로그만 남기고 버린다 (채널 상태와 피드는 변하지 않음).

use chrono::{DateTime, Utc};
use intelink_core::config::FeedConfig;
use intelink_core::models::frame::InboundFrame;
use intelink_core::models::notification::NotificationKind;
use intelink_core::models::signal::Severity;
use serde_json::Value;
use tracing::{debug, warn};

use crate::store::{FeedStore, NotificationDraft};

/// 이 점수 이상이면 critical 리스크
const CRITICAL_RISK_SCORE: f64 = 7.0;

/// 이 우선순위 이하면 critical 추천
const CRITICAL_RECOMMENDATION_PRIORITY: f64 = 2.0;

/// 프레임 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// JSON 디코딩 실패로 버림
    Discarded,
    /// 마지막 메시지만 갱신 (pong, 알 수 없는 타입, 필드 누락, 대상 없는 확인)
    Recorded,
    /// 피드 변경
    FeedsChanged,
}

/// 메시지 디스패처 — 프레임 → 피드 저장소
#[derive(Debug)]
pub struct MessageDispatcher {
    store: FeedStore,
    last_message: Option<Value>,
}

impl MessageDispatcher {
    /// 새 디스패처 생성
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_store(FeedStore::new(config))
    }

    /// 지정 저장소로 생성
    pub fn with_store(store: FeedStore) -> Self {
        Self {
            store,
            last_message: None,
        }
    }

    /// 수신 프레임 하나 처리
    pub fn dispatch(&mut self, raw: &str) -> DispatchOutcome {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("수신 프레임 디코딩 실패, 무시: {e}");
                return DispatchOutcome::Discarded;
            }
        };

        self.last_message = Some(value.clone());

        let frame = match serde_json::from_value::<InboundFrame>(value) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("프레임 형식 불일치, 피드 반영 안함: {e}");
                return DispatchOutcome::Recorded;
            }
        };

        if self.apply(frame) {
            DispatchOutcome::FeedsChanged
        } else {
            DispatchOutcome::Recorded
        }
    }

    /// 타입별 피드 반영. 피드가 바뀌었으면 true.
    fn apply(&mut self, frame: InboundFrame) -> bool {
        match frame {
            InboundFrame::SignalCreated { signal, timestamp } => {
                debug!("시그널 수신: {} ({:?})", signal.signal_id, signal.severity);
                let draft = NotificationDraft {
                    kind: NotificationKind::Signal,
                    title: "New Signal".to_string(),
                    message: signal.title.clone(),
                    severity: signal.severity,
                    timestamp: parse_timestamp(timestamp.as_deref()),
                };
                self.store.push_signal(signal);
                self.store.push_notification(draft);
                true
            }
            InboundFrame::SignalAcknowledged {
                signal_id,
                acknowledged_by,
                ..
            } => {
                let found = self.store.acknowledge_signal(&signal_id, acknowledged_by);
                if !found {
                    debug!("확인 대상 시그널 없음: {signal_id}");
                }
                found
            }
            InboundFrame::RiskCreated {
                risk_score,
                title,
                timestamp,
            } => {
                let severity = if risk_score >= CRITICAL_RISK_SCORE {
                    Severity::Critical
                } else {
                    Severity::Warning
                };
                self.store.push_notification(NotificationDraft {
                    kind: NotificationKind::Risk,
                    title: "New Risk Detected".to_string(),
                    message: title.unwrap_or_else(|| format!("Risk score: {risk_score}")),
                    severity,
                    timestamp: parse_timestamp(timestamp.as_deref()),
                });
                true
            }
            InboundFrame::RecommendationCreated {
                priority,
                title,
                timestamp,
            } => {
                self.push_recommendation(false, priority, title, timestamp);
                true
            }
            InboundFrame::AutoRecommendationCreated {
                priority,
                title,
                timestamp,
            } => {
                self.push_recommendation(true, priority, title, timestamp);
                true
            }
            InboundFrame::Pong {} => {
                debug!("pong 수신");
                false
            }
            InboundFrame::Unknown => {
                debug!("알 수 없는 프레임 타입, 무시");
                false
            }
        }
    }

    fn push_recommendation(
        &mut self,
        auto: bool,
        priority: f64,
        title: Option<String>,
        timestamp: Option<String>,
    ) {
        let severity = if priority <= CRITICAL_RECOMMENDATION_PRIORITY {
            Severity::Critical
        } else {
            Severity::Info
        };
        let heading = if auto {
            "Auto-Generated Recommendation"
        } else {
            "New Recommendation"
        };
        self.store.push_notification(NotificationDraft {
            kind: NotificationKind::Recommendation,
            title: heading.to_string(),
            message: title.unwrap_or_else(|| format!("Priority {priority} recommendation")),
            severity,
            timestamp: parse_timestamp(timestamp.as_deref()),
        });
    }

    /// 마지막으로 디코딩된 메시지
    pub fn last_message(&self) -> Option<&Value> {
        self.last_message.as_ref()
    }

    /// 피드 저장소 (읽기)
    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// 피드 저장소 (쓰기 — 소비자 명령용)
    pub fn store_mut(&mut self) -> &mut FeedStore {
        &mut self.store
    }
}

/// RFC 3339 타임스탬프 파싱 (없거나 잘못되면 현재 시각)
fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dispatcher() -> MessageDispatcher {
        MessageDispatcher::new(&FeedConfig::default())
    }

    fn signal_created(id: &str, severity: &str) -> String {
        json!({
            "type": "SIGNAL_CREATED",
            "signal": {"signal_id": id, "title": format!("시그널 {id}"), "severity": severity},
            "timestamp": "2026-01-28T10:00:00Z"
        })
        .to_string()
    }

    #[test]
    fn signal_created_feeds_both() {
        let mut d = dispatcher();
        let outcome = d.dispatch(&signal_created("S1", "critical"));
        assert_eq!(outcome, DispatchOutcome::FeedsChanged);

        let store = d.store();
        assert_eq!(store.signals().len(), 1);
        assert_eq!(store.notifications().len(), 1);

        let n = &store.notifications()[0];
        assert_eq!(n.kind, NotificationKind::Signal);
        assert_eq!(n.severity, Severity::Critical);
        assert_eq!(n.message, "시그널 S1");
        assert_eq!(n.timestamp.to_rfc3339(), "2026-01-28T10:00:00+00:00");
    }

    #[test]
    fn signal_feed_keeps_latest_fifty() {
        let mut d = dispatcher();
        for i in 0..120 {
            d.dispatch(&signal_created(&format!("S{i}"), "info"));
            assert!(d.store().signals().len() <= 50);
            assert!(d.store().notifications().len() <= 20);
        }
        let ids: Vec<&str> = d
            .store()
            .signals()
            .iter()
            .map(|s| s.signal_id.as_str())
            .collect();
        let expected: Vec<String> = (70..120).rev().map(|i| format!("S{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn acknowledgement_keeps_position() {
        let mut d = dispatcher();
        for id in ["S1", "S2", "S3", "S4"] {
            d.dispatch(&signal_created(id, "warning"));
        }
        // [S4, S3, S2, S1] — S1은 index 3
        let before = d.store().signals().to_vec();
        let notifications_before = d.store().notifications().len();

        let ack = json!({
            "type": "SIGNAL_ACKNOWLEDGED",
            "signal_id": "S1",
            "acknowledged_by": "alice",
            "timestamp": "2026-01-28T10:05:00Z"
        });
        assert_eq!(d.dispatch(&ack.to_string()), DispatchOutcome::FeedsChanged);

        let after = d.store().signals();
        assert_eq!(after[3].signal_id, "S1");
        assert!(after[3].acknowledged);
        assert_eq!(after[3].acknowledged_by.as_deref(), Some("alice"));
        assert_eq!(&after[..3], &before[..3]);
        assert_eq!(d.store().notifications().len(), notifications_before);
    }

    #[test]
    fn acknowledgement_for_unknown_signal() {
        let mut d = dispatcher();
        d.dispatch(&signal_created("S1", "info"));
        let ack = json!({"type": "SIGNAL_ACKNOWLEDGED", "signal_id": "nope", "acknowledged_by": "bob"});
        assert_eq!(d.dispatch(&ack.to_string()), DispatchOutcome::Recorded);
        assert!(!d.store().signals()[0].acknowledged);
    }

    #[test]
    fn risk_severity_threshold() {
        let mut d = dispatcher();
        d.dispatch(&json!({"type": "RISK_CREATED", "risk_score": 7}).to_string());
        d.dispatch(&json!({"type": "RISK_CREATED", "risk_score": 6.9}).to_string());

        let n = d.store().notifications();
        assert_eq!(n[0].severity, Severity::Warning);
        assert_eq!(n[1].severity, Severity::Critical);
        assert!(n.iter().all(|n| n.kind == NotificationKind::Risk));
        assert!(d.store().signals().is_empty());
    }

    #[test]
    fn recommendation_severity_and_title() {
        let mut d = dispatcher();
        d.dispatch(&json!({"type": "RECOMMENDATION_CREATED", "priority": 2}).to_string());
        d.dispatch(&json!({"type": "AUTO_RECOMMENDATION_CREATED", "priority": 3}).to_string());

        let n = d.store().notifications();
        let auto = &n[0];
        let manual = &n[1];
        assert_eq!(manual.severity, Severity::Critical);
        assert_eq!(auto.severity, Severity::Info);
        assert_eq!(manual.kind, NotificationKind::Recommendation);
        assert_ne!(manual.title, auto.title);
        assert!(auto.title.contains("Auto"));
    }

    #[test]
    fn fractional_priority_uses_numeric_threshold() {
        let mut d = dispatcher();
        assert_eq!(
            d.dispatch(&json!({"type": "RECOMMENDATION_CREATED", "priority": 2.0}).to_string()),
            DispatchOutcome::FeedsChanged
        );
        assert_eq!(
            d.dispatch(&json!({"type": "RECOMMENDATION_CREATED", "priority": 2.5}).to_string()),
            DispatchOutcome::FeedsChanged
        );

        let n = d.store().notifications();
        assert_eq!(n.len(), 2);
        assert_eq!(n[0].severity, Severity::Info);
        assert_eq!(n[0].message, "Priority 2.5 recommendation");
        assert_eq!(n[1].severity, Severity::Critical);
        assert_eq!(n[1].message, "Priority 2 recommendation");
    }

    #[test]
    fn signal_with_naive_created_at_feeds_both() {
        let mut d = dispatcher();
        let frame = json!({
            "type": "SIGNAL_CREATED",
            "signal": {
                "signal_id": "S1",
                "title": "매출 급감",
                "severity": "warning",
                "created_at": "2026-01-28T10:00:00"
            }
        });
        assert_eq!(d.dispatch(&frame.to_string()), DispatchOutcome::FeedsChanged);

        let store = d.store();
        assert_eq!(store.signals().len(), 1);
        assert_eq!(store.signals()[0].created_at.as_deref(), Some("2026-01-28T10:00:00"));
        assert_eq!(store.notifications().len(), 1);
        assert_eq!(store.notifications()[0].severity, Severity::Warning);
    }

    #[test]
    fn notification_feed_keeps_latest_twenty() {
        let mut d = dispatcher();
        for i in 0..45 {
            d.dispatch(&json!({"type": "RISK_CREATED", "risk_score": 1, "title": format!("R{i}")}).to_string());
        }
        let titles: Vec<&str> = d
            .store()
            .notifications()
            .iter()
            .map(|n| n.message.as_str())
            .collect();
        let expected: Vec<String> = (25..45).rev().map(|i| format!("R{i}")).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn malformed_frame_changes_nothing() {
        let mut d = dispatcher();
        d.dispatch(&signal_created("S1", "info"));
        let last = d.last_message().cloned();
        let signals = d.store().signals().to_vec();
        let notifications = d.store().notifications().to_vec();

        assert_eq!(d.dispatch("not json {"), DispatchOutcome::Discarded);

        assert_eq!(d.last_message().cloned(), last);
        assert_eq!(d.store().signals(), signals.as_slice());
        assert_eq!(d.store().notifications(), notifications.as_slice());
    }

    #[test]
    fn pong_and_unknown_only_record_last_message() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(r#"{"type":"pong"}"#), DispatchOutcome::Recorded);
        assert_eq!(d.last_message().unwrap()["type"], "pong");

        assert_eq!(
            d.dispatch(r#"{"type":"INVOICE_POSTED","id":1}"#),
            DispatchOutcome::Recorded
        );
        assert_eq!(d.last_message().unwrap()["type"], "INVOICE_POSTED");
        assert!(d.store().notifications().is_empty());
    }

    #[test]
    fn known_type_missing_fields_is_recorded_not_applied() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(r#"{"type":"SIGNAL_CREATED"}"#), DispatchOutcome::Recorded);
        assert!(d.last_message().is_some());
        assert!(d.store().signals().is_empty());
    }

    #[test]
    fn bad_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let ts = parse_timestamp(Some("어제"));
        assert!(ts >= before);
    }
}
