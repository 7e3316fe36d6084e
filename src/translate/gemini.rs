use serde_json::{json, Map, Value};

use super::{copy_bool, copy_number, is_system, messages, parse_data_url, stop_sequences};

/// OpenAI chat body → Gemini `generateContent` body.
pub fn gemini(body: &Value) -> Value {
    let messages = messages(body);
    let mut out = Map::new();

    if let Some(system) = messages.iter().find(|m| is_system(m)) {
        out.insert(
            "systemInstruction".into(),
            json!({ "parts": [{ "text": system["content"] }] }),
        );
    }

    out.insert(
        "contents".into(),
        Value::Array(
            messages
                .iter()
                .filter(|m| !is_system(m))
                .map(convert_message)
                .collect(),
        ),
    );

    let config = generation_config(body);
    if !config.is_empty() {
        out.insert("generationConfig".into(), Value::Object(config));
    }

    if body.get("tool_choice").is_some_and(is_set) {
        out.insert("toolConfig".into(), tool_config(body));
    }

    if let Some(tools) = body.get("tools").and_then(Value::as_array) {
        let declarations: Vec<Value> = tools.iter().map(convert_tool).collect();
        out.insert(
            "tools".into(),
            json!({ "functionDeclarations": declarations }),
        );
    }

    Value::Object(out)
}

fn convert_message(message: &Value) -> Value {
    let role = match message["role"].as_str() {
        Some("assistant") => Value::String("model".into()),
        _ => message["role"].clone(),
    };
    let parts = match &message["content"] {
        Value::Array(parts) => parts.iter().filter_map(convert_part).collect(),
        text => vec![json!({ "text": text })],
    };
    json!({ "role": role, "parts": parts })
}

fn convert_part(part: &Value) -> Option<Value> {
    match part["type"].as_str()? {
        "text" => Some(json!({ "text": part["text"] })),
        "image_url" => Some(part_from_url(part.pointer("/image_url/url")?.as_str()?)),
        "input_audio" => Some(part_from_url(part.pointer("/input_audio/data")?.as_str()?)),
        _ => None,
    }
}

/// Inline data for data URLs, a file reference for everything else.
fn part_from_url(url: &str) -> Value {
    match parse_data_url(url) {
        Some((mime_type, data)) => json!({ "inlineData": { "mimeType": mime_type, "data": data } }),
        None => json!({ "fileData": { "fileUri": url } }),
    }
}

fn generation_config(body: &Value) -> Map<String, Value> {
    let mut config = Map::new();
    copy_number(body, "temperature", &mut config, "temperature");
    copy_number(body, "max_tokens", &mut config, "maxOutputTokens");
    copy_number(body, "max_completion_tokens", &mut config, "maxOutputTokens");
    copy_number(body, "top_p", &mut config, "topP");
    copy_number(body, "presence_penalty", &mut config, "presencePenalty");
    copy_number(body, "frequency_penalty", &mut config, "frequencyPenalty");
    copy_bool(body, "logprobs", &mut config, "responseLogprobs");
    copy_number(body, "top_logprobs", &mut config, "logprobs");
    copy_number(body, "n", &mut config, "candidateCount");
    if let Some(stop) = stop_sequences(body) {
        config.insert("stopSequences".into(), stop);
    }

    match body.pointer("/response_format/type").and_then(Value::as_str) {
        Some("json_object") => {
            config.insert("responseMimeType".into(), json!("application/json"));
        }
        Some("json_schema") => {
            config.insert("responseMimeType".into(), json!("application/json"));
            if let Some(schema) = body.pointer("/response_format/json_schema/schema") {
                config.insert("responseSchema".into(), strip_additional_properties(schema.clone()));
            }
        }
        _ => {}
    }

    config
}

fn tool_config(body: &Value) -> Value {
    match &body["tool_choice"] {
        Value::String(s) if s == "auto" => json!({ "function_calling_config": { "mode": "AUTO" } }),
        Value::String(s) if s == "required" => json!({ "function_calling_config": { "mode": "ANY" } }),
        Value::String(s) if s == "none" => json!({ "function_calling_config": { "mode": "NONE" } }),
        Value::Object(_) => json!({
            "function_calling_config": {
                "mode": "ANY",
                "allowed_function_names": [body.pointer("/tool_choice/function/name")],
            }
        }),
        _ => json!({}),
    }
}

fn convert_tool(tool: &Value) -> Value {
    let function = &tool["function"];
    let mut out = Map::new();
    out.insert("name".into(), function["name"].clone());
    if let Some(description) = function.get("description").filter(|v| !v.is_null()) {
        out.insert("description".into(), description.clone());
    }
    if let Some(parameters) = function.get("parameters").filter(|v| !v.is_null()) {
        out.insert(
            "parameters".into(),
            strip_additional_properties(parameters.clone()),
        );
    }
    Value::Object(out)
}

/// Gemini rejects `additionalProperties` anywhere in a schema.
fn strip_additional_properties(mut schema: Value) -> Value {
    fn strip(value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.shift_remove("additionalProperties");
                map.values_mut().for_each(strip);
            }
            Value::Array(items) => items.iter_mut().for_each(strip),
            _ => {}
        }
    }
    strip(&mut schema);
    schema
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
