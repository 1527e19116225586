//! 채널 주소 해석.
//!
//! REST 기본 URL의 스킴을 WebSocket 스킴으로 바꾸고
//! 조직 범위에 따라 채널 경로를 붙인다.

use intelink_core::error::CoreError;
use url::Url;

/// 채널 경로 세그먼트 (`/api/intelligence/ws`)
pub const CHANNEL_SEGMENTS: [&str; 3] = ["api", "intelligence", "ws"];

/// 조직 범위가 없을 때의 관리자 전역 채널 세그먼트
const GLOBAL_SCOPE: [&str; 2] = ["admin", "global"];

/// 채널 주소 해석
///
/// `https://` → `wss://`, `http://` → `ws://`. 빈 `org_id`는 없는 것으로 본다.
/// `org_id`는 경로 세그먼트 하나로 이스케이프되어 붙는다.
/// 그 외 스킴이나 파싱할 수 없는 결과는 에러 (재시도 없는 생성 실패).
pub fn resolve_channel_url(base_url: &str, org_id: Option<&str>) -> Result<Url, CoreError> {
    let base = base_url.trim().trim_end_matches('/');

    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(CoreError::Validation {
            field: "base_url".to_string(),
            message: format!("http(s) URL이 아님: {base}"),
        });
    };

    let mut url = Url::parse(&ws_base)
        .map_err(|e| CoreError::Config(format!("채널 주소 파싱 실패: {e}")))?;
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url.path_segments_mut().map_err(|_| CoreError::Validation {
            field: "base_url".to_string(),
            message: format!("경로를 붙일 수 없는 URL: {base}"),
        })?;
        segments.pop_if_empty().extend(CHANNEL_SEGMENTS);
        match org_id.filter(|id| !id.is_empty()) {
            Some(org) => segments.push(org),
            None => segments.extend(GLOBAL_SCOPE),
        };
    }

    Ok(url)
}

/// 토큰을 `token` 쿼리 파라미터로 붙인 주소
pub fn authorize(url: &Url, token: &str) -> Url {
    let mut authorized = url.clone();
    authorized.query_pairs_mut().append_pair("token", token);
    authorized
}

/// 로그용 주소 (쿼리 제거 — 토큰 노출 방지)
pub fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    redacted.set_query(None);
    redacted.to_string()
}
