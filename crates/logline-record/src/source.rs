use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Identifies which path produced the record returned to the caller.
pub enum RecordSource {
    #[serde(rename = "copilot-chat")]
    CopilotChat,
    #[serde(rename = "local-fallback")]
    LocalFallback,
}

impl RecordSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CopilotChat => "copilot-chat",
            Self::LocalFallback => "local-fallback",
        }
    }
}
