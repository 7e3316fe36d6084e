use serde_json::Value;

use super::{str_at, Delta, ToolDelta};

/// Anthropic messages stream. Text arrives in `delta.text`; a tool call opens
/// with a `content_block` carrying name and id, and its input streams in
/// `delta.partial_json`.
pub(super) fn extract(message: &Value) -> Delta {
    let tools = if let Some(name) = str_at(message, "/content_block/name") {
        vec![ToolDelta {
            id: str_at(message, "/content_block/id"),
            name: Some(name),
            args: None,
        }]
    } else if let Some(args) = str_at(message, "/delta/partial_json") {
        vec![ToolDelta {
            args: Some(args),
            ..Default::default()
        }]
    } else {
        vec![]
    };

    Delta {
        content: str_at(message, "/delta/text"),
        tools,
    }
}
