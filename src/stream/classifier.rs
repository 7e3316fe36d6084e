use serde_json::Value;

/// Find a provider-reported error in a decoded message.
///
/// Checked in order, first non-null wins:
/// - `message.error` (OpenRouter wraps errors this way)
/// - `error.message` (OpenAI, Anthropic, Gemini)
/// - `error` itself, when it is a bare string or has no `message`
///
/// The chosen value only counts if it is truthy, so `"error": null`,
/// `"error": false` or `"error": ""` are not errors.
pub fn classify(message: &Value) -> Option<String> {
    let candidate = [
        message.pointer("/message/error"),
        message.pointer("/error/message"),
        message.get("error"),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.is_null())?;

    is_truthy(candidate).then(|| describe(candidate))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_openai_style_error() {
        let msg = json!({"error": {"message": "OpenAI API error", "type": "invalid_request_error"}});
        assert_eq!(classify(&msg).as_deref(), Some("OpenAI API error"));
    }

    #[test]
    fn test_anthropic_style_error() {
        let msg = json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Anthropic API error"}
        });
        assert_eq!(classify(&msg).as_deref(), Some("Anthropic API error"));
    }

    #[test]
    fn test_openrouter_style_error() {
        let msg = json!({"message": {"error": "OpenRouter API error"}});
        assert_eq!(classify(&msg).as_deref(), Some("OpenRouter API error"));
    }

    #[test]
    fn test_relay_wrapping_takes_priority() {
        let msg = json!({
            "message": {"error": "outer"},
            "error": {"message": "inner"}
        });
        assert_eq!(classify(&msg).as_deref(), Some("outer"));
    }

    #[test]
    fn test_bare_string_error() {
        let msg = json!({"error": "Gemini API error"});
        assert_eq!(classify(&msg).as_deref(), Some("Gemini API error"));
    }

    #[test]
    fn test_error_object_without_message_is_rendered_as_json() {
        let msg = json!({"error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}});
        assert_eq!(
            classify(&msg).as_deref(),
            Some(r#"{"code":429,"status":"RESOURCE_EXHAUSTED"}"#)
        );
    }

    #[test]
    fn test_falsy_values_are_not_errors() {
        for msg in [
            json!({"error": null}),
            json!({"error": false}),
            json!({"error": ""}),
            json!({"error": 0}),
            json!({"message": {"error": null}}),
        ] {
            assert_eq!(classify(&msg), None, "{msg}");
        }
    }

    #[test]
    fn test_falsy_first_match_hides_later_ones() {
        let msg = json!({"message": {"error": false}, "error": "ignored"});
        assert_eq!(classify(&msg), None);
    }

    #[test]
    fn test_regular_messages_are_not_errors() {
        for msg in [
            json!({"choices": [{"delta": {"content": "hi"}}]}),
            json!({"type": "message_start", "message": {"id": "msg_1", "content": []}}),
            json!({"type": "response.output_text.delta", "delta": "hi"}),
            json!("error"),
            json!([{"error": "inside array"}]),
        ] {
            assert_eq!(classify(&msg), None, "{msg}");
        }
    }
}
