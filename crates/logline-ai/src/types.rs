use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{classify_http_status, is_retryable_http_error, RetryDecision};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `MessageRole` values.
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// One conversational turn sent to the chat-completions endpoint.
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Request body for the chat-completions endpoint.
pub struct ChatCompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Error)]
/// Enumerates supported `LogLineAiError` values.
pub enum LogLineAiError {
    #[error("missing API token")]
    MissingApiToken,
    #[error("invalid summarizer configuration: {0}")]
    InvalidConfig(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote summarizer returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("model output is not a JSON object: {0}")]
    MalformedRecord(String),
}

impl LogLineAiError {
    /// Classifies the failure so configuration errors are not retried.
    pub fn retry_decision(&self) -> RetryDecision {
        match self {
            Self::MissingApiToken | Self::InvalidConfig(_) => RetryDecision::Fatal,
            Self::Http(error) => {
                if is_retryable_http_error(error) {
                    RetryDecision::Retryable
                } else {
                    RetryDecision::Fatal
                }
            }
            Self::HttpStatus { status, .. } => classify_http_status(*status),
            Self::Serde(_) | Self::InvalidResponse(_) | Self::MalformedRecord(_) => {
                RetryDecision::Retryable
            }
        }
    }
}
