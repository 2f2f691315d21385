use logline_core::current_utc_iso_timestamp;
use serde_json::Value;

use crate::LogLine;

pub const DEFAULT_FALLBACK_REASON: &str = "LLM unavailable";
pub const INVALID_REMOTE_OUTPUT_REASON: &str = "LLM output failed validation";
pub const PAYLOAD_EXCERPT_MAX_CHARS: usize = 250;

/// Builds the local record used when the remote summarizer cannot supply one.
pub fn fallback_logline(event_name: &str, payload: &Value, error_reason: &str) -> LogLine {
    fallback_logline_at(event_name, payload, error_reason, current_utc_iso_timestamp())
}

/// Same as [`fallback_logline`] with a caller-supplied `emitted_at`.
pub fn fallback_logline_at(
    event_name: &str,
    payload: &Value,
    error_reason: &str,
    emitted_at: impl Into<String>,
) -> LogLine {
    let mut logline = LogLine::executed(
        format!("Event {event_name} received. (local fallback: {error_reason})"),
        emitted_at,
    );
    logline.error = Some(error_reason.to_string());
    logline.payload_excerpt = Some(payload_excerpt(payload));
    logline
}

/// First [`PAYLOAD_EXCERPT_MAX_CHARS`] characters of the compact JSON rendering.
pub fn payload_excerpt(payload: &Value) -> String {
    payload
        .to_string()
        .chars()
        .take(PAYLOAD_EXCERPT_MAX_CHARS)
        .collect()
}
