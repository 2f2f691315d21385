use serde_json::Value;

use crate::LogLineAiError;

/// Parses the span from the first `{` to the last `}` of `text` as JSON.
///
/// Models frequently wrap the requested object in prose or code fences; the
/// surrounding text is ignored.
pub fn extract_json_object(text: &str) -> Result<Value, LogLineAiError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(LogLineAiError::MalformedRecord(
            "model output contains no JSON object delimiters".to_string(),
        ));
    };
    if end < start {
        return Err(LogLineAiError::MalformedRecord(
            "closing brace precedes opening brace".to_string(),
        ));
    }

    serde_json::from_str::<Value>(&text[start..=end])
        .map_err(|error| LogLineAiError::MalformedRecord(format!("invalid embedded JSON: {error}")))
}
