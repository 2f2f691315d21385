use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    extract::extract_json_object,
    prompt::build_summary_request,
    retry::{new_request_id, RetryDecision},
    ChatCompletionRequest, LogLineAiError, LogLineSummarizer, RemoteSummary,
};

pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.github.com/models/copilot-chat";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 800;

const REQUEST_ID_HEADER: &str = "x-logline-request-id";
const RETRY_ATTEMPT_HEADER: &str = "x-logline-retry-attempt";
const MAX_LOGGED_BODY_CHARS: usize = 512;

#[derive(Debug, Clone)]
/// Settings for [`ChatSummarizer`].
pub struct ChatSummarizerConfig {
    pub api_url: String,
    pub api_token: String,
    pub model: Option<String>,
    pub request_timeout_ms: u64,
    /// Total attempts, not retries after the first; zero disables the remote call.
    pub max_attempts: usize,
    pub retry_delay_ms: u64,
}

impl ChatSummarizerConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            api_token: api_token.into(),
            model: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone)]
/// Bounded-retry LogLine summarizer backed by a chat-completions endpoint.
pub struct ChatSummarizer {
    client: reqwest::Client,
    config: ChatSummarizerConfig,
}

impl ChatSummarizer {
    pub fn new(config: ChatSummarizerConfig) -> Result<Self, LogLineAiError> {
        if config.api_token.trim().is_empty() {
            return Err(LogLineAiError::MissingApiToken);
        }
        if config.api_url.trim().is_empty() {
            return Err(LogLineAiError::InvalidConfig(
                "api url cannot be empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", config.api_token.trim());
        let mut authorization = HeaderValue::from_str(&bearer)
            .map_err(|e| LogLineAiError::InvalidConfig(format!("invalid API token header: {e}")))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;

        Ok(Self { client, config })
    }

    async fn request_logline(
        &self,
        request: &ChatCompletionRequest,
        attempt: usize,
    ) -> Result<Value, LogLineAiError> {
        let started = Instant::now();
        let response = self
            .client
            .post(&self.config.api_url)
            .header(REQUEST_ID_HEADER, new_request_id())
            .header(RETRY_ATTEMPT_HEADER, attempt.to_string())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;
        tracing::info!(
            attempt = attempt + 1,
            max_attempts = self.config.max_attempts,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "remote summarizer responded"
        );

        // Only 200 carries a completion; other 2xx statuses fail the attempt.
        if status != StatusCode::OK {
            return Err(LogLineAiError::HttpStatus {
                status: status.as_u16(),
                body: truncate_for_log(&raw),
            });
        }

        let text = parse_completion_text(&raw)?;
        extract_json_object(&text)
    }
}

#[async_trait]
impl LogLineSummarizer for ChatSummarizer {
    async fn summarize(&self, event_name: &str, payload: &Value) -> RemoteSummary {
        let request = build_summary_request(event_name, payload, self.config.model.as_deref());
        let max_attempts = self.config.max_attempts;
        let mut attempts = 0usize;
        let mut last_failure = None;

        for attempt in 0..max_attempts {
            attempts = attempt + 1;
            tracing::info!(
                event = event_name,
                attempt = attempts,
                max_attempts,
                "calling remote summarizer"
            );
            match self.request_logline(&request, attempt).await {
                Ok(candidate) => return RemoteSummary::remote(candidate, attempts),
                Err(error) => {
                    let decision = error.retry_decision();
                    tracing::warn!(
                        event = event_name,
                        attempt = attempts,
                        max_attempts,
                        retryable = decision == RetryDecision::Retryable,
                        error = %error,
                        "remote summarizer attempt failed"
                    );
                    last_failure = Some(error.to_string());
                    if decision == RetryDecision::Fatal {
                        break;
                    }
                }
            }
            if attempts < max_attempts {
                sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            }
        }

        RemoteSummary::unavailable(attempts, last_failure)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    #[serde(default)]
    message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

fn parse_completion_text(raw: &str) -> Result<String, LogLineAiError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(raw)?;
    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        LogLineAiError::InvalidResponse("response contained no choices".to_string())
    })?;
    Ok(choice
        .message
        .and_then(|message| message.content)
        .unwrap_or_default())
}

fn truncate_for_log(raw: &str) -> String {
    if raw.chars().count() <= MAX_LOGGED_BODY_CHARS {
        return raw.to_string();
    }
    let mut truncated = raw.chars().take(MAX_LOGGED_BODY_CHARS).collect::<String>();
    truncated.push_str("...");
    truncated
}
