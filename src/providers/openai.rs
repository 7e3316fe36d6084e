use serde_json::Value;

use super::{str_at, Delta, ToolDelta};

/// Chat completions chunks, also used by Azure, OpenRouter, Groq and most
/// relays: `choices[0].delta.{content,tool_calls}`.
pub(super) fn extract(message: &Value) -> Delta {
    let tools = message
        .pointer("/choices/0/delta/tool_calls")
        .and_then(Value::as_array)
        .map(|calls| {
            calls
                .iter()
                .map(|tc| ToolDelta {
                    id: str_at(tc, "/id"),
                    name: str_at(tc, "/function/name"),
                    args: str_at(tc, "/function/arguments"),
                })
                .collect()
        })
        .unwrap_or_default();

    Delta {
        content: str_at(message, "/choices/0/delta/content"),
        tools,
    }
}
