use serde_json::Value;

use super::{str_at, Delta, ToolDelta};

const OUTPUT_TEXT_DELTA: &str = "response.output_text.delta";
const OUTPUT_ITEM_ADDED: &str = "response.output_item.added";
const FUNCTION_CALL_ARGUMENTS_DELTA: &str = "response.function_call_arguments.delta";

/// OpenAI Responses API events, discriminated by `type`.
pub(super) fn extract(message: &Value) -> Delta {
    match message.get("type").and_then(Value::as_str) {
        Some(OUTPUT_TEXT_DELTA) => Delta {
            content: str_at(message, "/delta"),
            tools: vec![],
        },
        Some(OUTPUT_ITEM_ADDED)
            if message.pointer("/item/type").and_then(Value::as_str) == Some("function_call") =>
        {
            Delta {
                content: None,
                tools: vec![ToolDelta {
                    id: str_at(message, "/item/id"),
                    name: str_at(message, "/item/name"),
                    args: str_at(message, "/item/arguments"),
                }],
            }
        }
        Some(FUNCTION_CALL_ARGUMENTS_DELTA) => Delta {
            content: None,
            tools: vec![ToolDelta {
                args: str_at(message, "/delta"),
                ..Default::default()
            }],
        },
        _ => Delta::default(),
    }
}
