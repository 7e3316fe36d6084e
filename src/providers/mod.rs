//! Per-provider readers that turn one decoded SSE message into a [`Delta`].
//!
//! Providers do not label their messages, and several of them reuse the same
//! field names, so every extractor is tried in a fixed order and the first one
//! that finds data wins.

mod anthropic;
mod gemini;
mod openai;
mod openai_responses;

use serde_json::Value;

#[cfg(test)]
mod tests;

/// Incremental fragment read from one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// Text to append. `Some("")` still counts as data.
    pub content: Option<String>,
    pub tools: Vec<ToolDelta>,
}

impl Delta {
    pub fn has_data(&self) -> bool {
        self.content.is_some() || !self.tools.is_empty()
    }
}

/// A piece of a tool call. A `name` starts a new call; `args` extends the
/// latest one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolDelta {
    pub id: Option<String>,
    pub name: Option<String>,
    pub args: Option<String>,
}

pub type Extractor = fn(&Value) -> Delta;

pub struct Provider {
    pub name: &'static str,
    pub extract: Extractor,
}

/// Dispatch order. OpenAI-compatible chat comes first because most relays
/// speak it; the Responses API is checked before Anthropic since both carry a
/// top-level `delta`.
pub static PROVIDERS: [Provider; 4] = [
    Provider {
        name: "openai",
        extract: openai::extract,
    },
    Provider {
        name: "openai_responses",
        extract: openai_responses::extract,
    },
    Provider {
        name: "anthropic",
        extract: anthropic::extract,
    },
    Provider {
        name: "gemini",
        extract: gemini::extract,
    },
];

/// Run the extractors in order and return the first delta that carries data,
/// with the name of the provider that produced it.
pub fn extract(message: &Value) -> Option<(&'static str, Delta)> {
    PROVIDERS.iter().find_map(|provider| {
        let delta = (provider.extract)(message);
        delta.has_data().then_some((provider.name, delta))
    })
}

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_string)
}
