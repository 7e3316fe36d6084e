use serde_json::Value;

use super::{str_at, Delta, ToolDelta};

/// Gemini `streamGenerateContent?alt=sse` chunks. Only the first part's text
/// is read. Function calls are never split across chunks, so each
/// `functionCall` part is a complete call with its args re-serialized to JSON
/// text.
pub(super) fn extract(message: &Value) -> Delta {
    let tools = message
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("functionCall"))
                .filter(|call| !call.is_null())
                .map(|call| ToolDelta {
                    id: None,
                    name: str_at(call, "/name"),
                    args: call.get("args").map(Value::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    Delta {
        content: str_at(message, "/candidates/0/content/parts/0/text"),
        tools,
    }
}
