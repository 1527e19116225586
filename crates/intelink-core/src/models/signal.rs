//! 시그널 모델.
//!
//! 서버에서 `SIGNAL_CREATED`로 수신하는 리스크 시그널과 심각도.

use serde::{Deserialize, Serialize};

/// 심각도
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

/// 리스크 시그널 (서버 → 클라이언트 WebSocket으로 수신)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// 시그널 고유 ID
    pub signal_id: String,
    /// 제목
    pub title: String,
    /// 심각도
    #[serde(default)]
    pub severity: Severity,
    /// 확인 여부
    #[serde(default)]
    pub acknowledged: bool,
    /// 확인한 사용자
    #[serde(default)]
    pub acknowledged_by: Option<String>,
    /// 상세 설명 (서버가 보낸 경우)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 서버 측 생성 시각 (서버가 보낸 문자열 그대로, 형식 검증 안함)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Signal {
    /// 확인 처리된 사본 반환
    pub fn acknowledged(&self, by: Option<String>) -> Self {
        Self {
            acknowledged: true,
            acknowledged_by: by,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn acknowledged_copy_keeps_identity() {
        let signal = Signal {
            signal_id: "S1".to_string(),
            title: "재고 부족".to_string(),
            severity: Severity::Warning,
            acknowledged: false,
            acknowledged_by: None,
            description: None,
            created_at: None,
        };

        let acked = signal.acknowledged(Some("alice".to_string()));
        assert_eq!(acked.signal_id, "S1");
        assert_eq!(acked.title, signal.title);
        assert!(acked.acknowledged);
        assert_eq!(acked.acknowledged_by.as_deref(), Some("alice"));
    }

    #[test]
    fn created_at_without_timezone_still_decodes() {
        let json = r#"{"signal_id": "S9", "title": "재고", "created_at": "2026-01-28T10:00:00"}"#;
        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.created_at.as_deref(), Some("2026-01-28T10:00:00"));
    }
}
