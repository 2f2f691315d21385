use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const LOGLINE_WHO: &str = "github_app";
pub const LOGLINE_DID: &str = "register_event";
pub const LOGLINE_STATUS_EXECUTED: &str = "executed";
pub const LOGLINE_CONFIRMED_BY: &str = "PromptOS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Structured event summary emitted for every accepted webhook delivery.
pub struct LogLine {
    pub who: String,
    pub did: String,
    pub this: String,
    pub status: String,
    pub confirmed_by: Vec<String>,
    pub emitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_excerpt: Option<String>,
}

impl LogLine {
    /// Builds an executed record with the institutional identity fields filled in.
    pub fn executed(this: impl Into<String>, emitted_at: impl Into<String>) -> Self {
        Self {
            who: LOGLINE_WHO.to_string(),
            did: LOGLINE_DID.to_string(),
            this: this.into(),
            status: LOGLINE_STATUS_EXECUTED.to_string(),
            confirmed_by: vec![LOGLINE_CONFIRMED_BY.to_string()],
            emitted_at: emitted_at.into(),
            error: None,
            payload_excerpt: None,
        }
    }

    /// Renders the record as the JSON object handed to persistence and responses.
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("who".to_string(), json!(self.who));
        record.insert("did".to_string(), json!(self.did));
        record.insert("this".to_string(), json!(self.this));
        record.insert("status".to_string(), json!(self.status));
        record.insert("confirmed_by".to_string(), json!(self.confirmed_by));
        record.insert("emitted_at".to_string(), json!(self.emitted_at));
        if let Some(error) = &self.error {
            record.insert("error".to_string(), json!(error));
        }
        if let Some(excerpt) = &self.payload_excerpt {
            record.insert("payload_excerpt".to_string(), json!(excerpt));
        }
        Value::Object(record)
    }
}
