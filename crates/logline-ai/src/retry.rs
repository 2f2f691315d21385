use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a failed summarizer attempt may be repeated.
pub enum RetryDecision {
    Retryable,
    Fatal,
}

pub fn should_retry_status(status: u16) -> bool {
    status == 408 || status == 409 || status == 425 || status == 429 || status >= 500
}

/// Classifies a status that failed an attempt.
///
/// 2xx statuses other than 200 carry no completion and are retried like
/// transient upstream failures.
pub fn classify_http_status(status: u16) -> RetryDecision {
    if (200..300).contains(&status) || should_retry_status(status) {
        RetryDecision::Retryable
    } else {
        RetryDecision::Fatal
    }
}

pub(crate) fn is_retryable_http_error(error: &reqwest::Error) -> bool {
    error.is_timeout()
        || error.is_connect()
        || error.is_request()
        || error.is_body()
        || error.is_decode()
}

pub(crate) fn new_request_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let count = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("logline-{millis}-{count}")
}
