use async_trait::async_trait;
use logline_record::RecordSource;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
/// Outcome of one summarization, before the record validator runs.
pub struct RemoteSummary {
    /// Parsed JSON object from the model, when any attempt produced one.
    pub candidate: Option<Value>,
    pub source: RecordSource,
    pub attempts: usize,
    /// Rendering of the last attempt failure.
    pub failure: Option<String>,
}

impl RemoteSummary {
    pub fn remote(candidate: Value, attempts: usize) -> Self {
        Self {
            candidate: Some(candidate),
            source: RecordSource::CopilotChat,
            attempts,
            failure: None,
        }
    }

    pub fn unavailable(attempts: usize, failure: Option<String>) -> Self {
        Self {
            candidate: None,
            source: RecordSource::LocalFallback,
            attempts,
            failure,
        }
    }
}

#[async_trait]
/// Trait contract for producing a candidate LogLine for one webhook event.
pub trait LogLineSummarizer: Send + Sync {
    async fn summarize(&self, event_name: &str, payload: &Value) -> RemoteSummary;
}

#[derive(Debug, Clone, Copy, Default)]
/// Summarizer used when no remote credentials are configured.
pub struct LocalOnlySummarizer;

#[async_trait]
impl LogLineSummarizer for LocalOnlySummarizer {
    async fn summarize(&self, _event_name: &str, _payload: &Value) -> RemoteSummary {
        RemoteSummary::unavailable(0, Some("remote summarizer is not configured".to_string()))
    }
}
