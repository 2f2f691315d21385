//! Remote LogLine summarization over an OpenAI-style chat-completions API.
mod chat_summarizer;
mod extract;
mod prompt;
mod retry;
mod summarizer;
mod types;

pub use chat_summarizer::{
    ChatSummarizer, ChatSummarizerConfig, DEFAULT_CHAT_COMPLETIONS_URL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RETRY_DELAY_MS,
};
pub use extract::extract_json_object;
pub use prompt::{build_summary_request, build_user_prompt, logline_system_prompt};
pub use retry::{classify_http_status, should_retry_status, RetryDecision};
pub use summarizer::{LocalOnlySummarizer, LogLineSummarizer, RemoteSummary};
pub use types::{ChatCompletionRequest, ChatMessage, LogLineAiError, MessageRole};
