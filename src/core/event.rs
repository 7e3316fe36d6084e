use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record handed over by the SSE transport, already split on event
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// Payload of one `data:` event.
    Data(String),
    /// The transport failed for this event.
    Error(String),
}

impl RawEvent {
    pub fn data(data: impl Into<String>) -> Self {
        Self::Data(data.into())
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error(error.into())
    }
}

/// A tool/function call as accumulated so far. `args` is the raw argument
/// text; it is never parsed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub args: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            name: name.into(),
            id,
            args: String::new(),
        }
    }
}

/// What callers receive. `content` and `tools` are snapshots of everything
/// accumulated so far, not deltas. Error events never carry content or tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The decoded provider message that produced this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    /// Raw payload that failed to decode, only set on decode errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl NormalizedEvent {
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn decode_error(error: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Tool calls in this snapshot, empty when none have been seen yet.
    pub fn tools(&self) -> &[ToolCall] {
        self.tools.as_deref().unwrap_or_default()
    }
}
