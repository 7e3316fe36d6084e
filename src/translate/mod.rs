//! Rewrite an OpenAI chat-completions request body for other providers.
//!
//! Pure field remapping on `serde_json::Value`; unknown fields are dropped and
//! missing ones are simply not emitted.

mod anthropic;
mod gemini;

pub use anthropic::anthropic;
pub use gemini::gemini;

use serde_json::{Map, Value};

use crate::core::config::ProviderKind;


/// Translate `body` for `provider`. OpenAI bodies pass through unchanged.
pub fn for_provider(provider: ProviderKind, body: &Value) -> Value {
    match provider {
        ProviderKind::OpenAi => body.clone(),
        ProviderKind::Anthropic => anthropic(body),
        ProviderKind::Gemini => gemini(body),
    }
}

fn messages(body: &Value) -> &[Value] {
    body.get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn is_system(message: &Value) -> bool {
    message["role"] == "system"
}

/// `stop` as either a single string or an array of strings.
fn stop_sequences(body: &Value) -> Option<Value> {
    match body.get("stop") {
        Some(Value::String(s)) => Some(Value::Array(vec![Value::String(s.clone())])),
        Some(Value::Array(a)) => Some(Value::Array(a.clone())),
        _ => None,
    }
}

fn copy_number(from: &Value, key: &str, to: &mut Map<String, Value>, as_key: &str) {
    if let Some(n) = from.get(key).filter(|v| v.is_number()) {
        to.insert(as_key.into(), n.clone());
    }
}

fn copy_bool(from: &Value, key: &str, to: &mut Map<String, Value>, as_key: &str) {
    if let Some(b) = from.get(key).filter(|v| v.is_boolean()) {
        to.insert(as_key.into(), b.clone());
    }
}

/// A `data:<mime>;base64,<payload>` URL split into mime type and payload.
fn parse_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (head, data) = rest.split_once(',')?;
    let mime = head.strip_suffix(";base64").unwrap_or(head);
    Some((mime, data))
}
