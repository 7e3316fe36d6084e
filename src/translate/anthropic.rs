use serde_json::{json, Map, Value};

use super::{copy_bool, copy_number, is_system, messages, parse_data_url, stop_sequences};

const DEFAULT_MAX_TOKENS: u64 = 4096;

/// OpenAI chat body → Anthropic messages body.
pub fn anthropic(body: &Value) -> Value {
    let messages = messages(body);
    let mut out = Map::new();

    // System prompt lives at the top level
    if let Some(system) = messages.iter().find(|m| is_system(m)) {
        out.insert("system".into(), system["content"].clone());
    }

    out.insert(
        "messages".into(),
        Value::Array(
            messages
                .iter()
                .filter(|m| !is_system(m))
                .map(convert_message)
                .collect(),
        ),
    );

    if let Some(model) = body.get("model").filter(|v| !v.is_null()) {
        out.insert("model".into(), model.clone());
    }
    let max_tokens = body
        .get("max_tokens")
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| json!(DEFAULT_MAX_TOKENS));
    out.insert("max_tokens".into(), max_tokens);

    if let Some(user_id) = body.pointer("/metadata/user_id").filter(|v| is_set(v)) {
        out.insert("metadata".into(), json!({ "user_id": user_id }));
    }
    copy_bool(body, "stream", &mut out, "stream");
    copy_number(body, "temperature", &mut out, "temperature");
    copy_number(body, "top_p", &mut out, "top_p");
    if let Some(stop) = stop_sequences(body) {
        out.insert("stop_sequences".into(), stop);
    }
    if let Some(choice) = tool_choice(body) {
        out.insert("tool_choice".into(), choice);
    }

    if let Some(tools) = body.get("tools").and_then(Value::as_array) {
        let tools = tools.iter().map(convert_tool).collect();
        out.insert("tools".into(), Value::Array(tools));
    }

    Value::Object(out)
}

fn convert_message(message: &Value) -> Value {
    let content = match &message["content"] {
        Value::Array(parts) => Value::Array(parts.iter().filter_map(convert_part).collect()),
        other => other.clone(),
    };
    json!({
        "role": message["role"],
        "content": content,
    })
}

fn convert_part(part: &Value) -> Option<Value> {
    match part["type"].as_str()? {
        "text" => Some(json!({ "type": "text", "text": part["text"] })),
        "image_url" => {
            // Only inline images; Anthropic cannot fetch URLs
            let url = part.pointer("/image_url/url")?.as_str()?;
            let (media_type, data) = parse_data_url(url)?;
            Some(json!({
                "type": "image",
                "source": { "type": "base64", "media_type": media_type, "data": data },
            }))
        }
        _ => None,
    }
}

fn tool_choice(body: &Value) -> Option<Value> {
    let mut choice = match body.get("tool_choice")? {
        Value::String(s) if s == "auto" => json!({ "type": "auto" }),
        Value::String(s) if s == "required" => json!({ "type": "any" }),
        Value::Object(_) => json!({
            "type": "tool",
            "name": body.pointer("/tool_choice/function/name").cloned().unwrap_or(Value::Null),
        }),
        _ => return None,
    };

    if let Some(parallel) = body.get("parallel_tool_calls").and_then(Value::as_bool) {
        choice["disable_parallel_tool_use"] = Value::Bool(!parallel);
    }
    Some(choice)
}

fn convert_tool(tool: &Value) -> Value {
    let function = &tool["function"];
    let mut out = Map::new();
    out.insert("name".into(), function["name"].clone());
    if let Some(description) = function.get("description").filter(|v| !v.is_null()) {
        out.insert("description".into(), description.clone());
    }
    if let Some(parameters) = function.get("parameters").filter(|v| !v.is_null()) {
        out.insert("input_schema".into(), parameters.clone());
    }
    Value::Object(out)
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
