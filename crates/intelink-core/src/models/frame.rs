//! WebSocket 프레임 모델.
//!
//! 수신 프레임은 `type` 필드로 구분되는 JSON 객체다.
//! 알 수 없는 `type`은 [`InboundFrame::Unknown`]으로 역직렬화된다.

use serde::{Deserialize, Serialize};

use super::signal::Signal;

/// 수신 프레임 (서버 → 클라이언트)
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum InboundFrame {
    /// 새 시그널 생성
    #[serde(rename = "SIGNAL_CREATED")]
    SignalCreated {
        signal: Signal,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// 시그널 확인 처리
    #[serde(rename = "SIGNAL_ACKNOWLEDGED")]
    SignalAcknowledged {
        signal_id: String,
        #[serde(default)]
        acknowledged_by: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// 새 리스크 감지
    #[serde(rename = "RISK_CREATED")]
    RiskCreated {
        risk_score: f64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// 수동 추천 생성
    #[serde(rename = "RECOMMENDATION_CREATED")]
    RecommendationCreated {
        priority: f64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// 자동 추천 생성
    #[serde(rename = "AUTO_RECOMMENDATION_CREATED")]
    AutoRecommendationCreated {
        priority: f64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// 하트비트 응답
    #[serde(rename = "pong")]
    Pong {},
    /// 알 수 없는 타입
    #[serde(other)]
    Unknown,
}

/// 송신 프레임 (클라이언트 → 서버)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    /// 하트비트
    Ping,
}

impl OutboundFrame {
    /// JSON 텍스트로 직렬화
    pub fn to_text(&self) -> Result<String, crate::error::CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_wire_format() {
        assert_eq!(OutboundFrame::Ping.to_text().unwrap(), r#"{"type":"ping"}"#);
    }

    #[test]
    fn parse_signal_created() {
        let json = r#"{
            "type": "SIGNAL_CREATED",
            "signal": {"signal_id": "S1", "title": "결제 지연", "severity": "warning"},
            "timestamp": "2026-01-28T10:00:00Z"
        }"#;
        let frame: InboundFrame = serde_json::from_str(json).unwrap();
        assert!(matches!(frame, InboundFrame::SignalCreated { signal, .. } if signal.signal_id == "S1"));
    }

    #[test]
    fn parse_recommendation_without_title() {
        let json = r#"{"type": "AUTO_RECOMMENDATION_CREATED", "priority": 1}"#;
        let frame: InboundFrame = serde_json::from_str(json).unwrap();
        match frame {
            InboundFrame::AutoRecommendationCreated {
                priority, title, ..
            } => {
                assert_eq!(priority, 1.0);
                assert!(title.is_none());
            }
            other => panic!("추천 프레임 아님: {other:?}"),
        }
    }

    #[test]
    fn parse_pong_with_extra_fields() {
        let json = r#"{"type": "pong", "server_time": "2026-01-28T10:00:00Z"}"#;
        let frame: InboundFrame = serde_json::from_str(json).unwrap();
        assert!(matches!(frame, InboundFrame::Pong {}));
    }

    #[test]
    fn parse_unknown_type() {
        let json = r#"{"type": "INVOICE_POSTED", "invoice_id": 42}"#;
        let frame: InboundFrame = serde_json::from_str(json).unwrap();
        assert!(matches!(frame, InboundFrame::Unknown));
    }

    #[test]
    fn known_type_with_missing_field_fails() {
        let json = r#"{"type": "RISK_CREATED"}"#;
        assert!(serde_json::from_str::<InboundFrame>(json).is_err());
    }
}
