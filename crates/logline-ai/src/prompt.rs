use logline_record::{LOGLINE_CONFIRMED_BY, LOGLINE_DID, LOGLINE_STATUS_EXECUTED, LOGLINE_WHO};
use serde_json::Value;

use crate::{ChatCompletionRequest, ChatMessage};

/// System instruction pinning the model to the LogLine schema.
pub fn logline_system_prompt() -> String {
    format!(
        "You are an institutional agent. Produce a LogLine JSON that records GitHub events. \
Required format:\n\
{{\n  \"who\": \"{LOGLINE_WHO}\",\n  \"did\": \"{LOGLINE_DID}\",\n  \"this\": \"<event summary>\",\n  \
\"status\": \"{LOGLINE_STATUS_EXECUTED}\",\n  \"confirmed_by\": [\"{LOGLINE_CONFIRMED_BY}\"],\n  \
\"emitted_at\": \"<UTC ISO timestamp>\"\n}}\n\
Respond ONLY with the JSON."
    )
}

pub fn build_user_prompt(event_name: &str, payload: &Value) -> String {
    format!("Event {event_name}:\n{payload}")
}

pub fn build_summary_request(
    event_name: &str,
    payload: &Value,
    model: Option<&str>,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.map(str::to_string),
        messages: vec![
            ChatMessage::system(logline_system_prompt()),
            ChatMessage::user(build_user_prompt(event_name, payload)),
        ],
    }
}
