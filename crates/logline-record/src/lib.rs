//! LogLine record model shared by the summarizer and the webhook gateway.
//!
//! A record is any JSON object carrying a `who` key. Locally generated records
//! come from [`LogLine`]; remote records are kept as the JSON object the model
//! produced once [`is_valid_logline`] accepts them.
mod fallback;
mod logline;
mod source;
mod validation;

pub use fallback::{
    fallback_logline, fallback_logline_at, payload_excerpt, DEFAULT_FALLBACK_REASON,
    INVALID_REMOTE_OUTPUT_REASON, PAYLOAD_EXCERPT_MAX_CHARS,
};
pub use logline::{
    LogLine, LOGLINE_CONFIRMED_BY, LOGLINE_DID, LOGLINE_STATUS_EXECUTED, LOGLINE_WHO,
};
pub use source::RecordSource;
pub use validation::is_valid_logline;
