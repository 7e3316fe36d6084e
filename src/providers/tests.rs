use super::*;
use serde_json::json;

fn tool(id: Option<&str>, name: Option<&str>, args: Option<&str>) -> ToolDelta {
    ToolDelta {
        id: id.map(String::from),
        name: name.map(String::from),
        args: args.map(String::from),
    }
}

#[test]
fn test_openai_content_delta() {
    let msg = json!({"choices": [{"index": 0, "delta": {"content": "Hello"}}]});
    let (provider, delta) = extract(&msg).unwrap();
    assert_eq!(provider, "openai");
    assert_eq!(delta.content.as_deref(), Some("Hello"));
    assert!(delta.tools.is_empty());
}

#[test]
fn test_openai_empty_content_counts_as_data() {
    let msg = json!({"choices": [{"delta": {"role": "assistant", "content": ""}}]});
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.content.as_deref(), Some(""));
}

#[test]
fn test_openai_null_content_is_absent() {
    let msg = json!({"choices": [{"delta": {"content": null}, "finish_reason": "stop"}]});
    assert!(extract(&msg).is_none());
}

#[test]
fn test_openai_tool_call_start() {
    let msg = json!({"choices": [{"delta": {
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "index": 0,
            "id": "call_F8YHCjnzrrTjfE4YSSpVW2Bc",
            "type": "function",
            "function": {"name": "get_delivery_date", "arguments": ""}
        }]
    }}]});
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.content, None);
    assert_eq!(
        delta.tools,
        vec![tool(
            Some("call_F8YHCjnzrrTjfE4YSSpVW2Bc"),
            Some("get_delivery_date"),
            Some("")
        )]
    );
}

#[test]
fn test_openai_tool_call_without_function_is_total() {
    let msg = json!({"choices": [{"delta": {"tool_calls": [{"index": 0}]}}]});
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.tools, vec![ToolDelta::default()]);
}

#[test]
fn test_responses_text_delta() {
    let msg = json!({
        "type": "response.output_text.delta",
        "item_id": "msg_1",
        "output_index": 0,
        "content_index": 0,
        "delta": "Hello"
    });
    let (provider, delta) = extract(&msg).unwrap();
    assert_eq!(provider, "openai_responses");
    assert_eq!(delta.content.as_deref(), Some("Hello"));
}

#[test]
fn test_responses_function_call_added() {
    let msg = json!({
        "type": "response.output_item.added",
        "output_index": 0,
        "item": {
            "id": "fc_123",
            "type": "function_call",
            "status": "in_progress",
            "arguments": "",
            "call_id": "call_abc",
            "name": "get_order"
        }
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(
        delta.tools,
        vec![tool(Some("fc_123"), Some("get_order"), Some(""))]
    );
}

#[test]
fn test_responses_message_item_added_is_ignored() {
    let msg = json!({
        "type": "response.output_item.added",
        "item": {"id": "msg_1", "type": "message", "role": "assistant", "content": []}
    });
    assert!(extract(&msg).is_none());
}

#[test]
fn test_responses_arguments_delta() {
    let msg = json!({
        "type": "response.function_call_arguments.delta",
        "item_id": "fc_123",
        "delta": "{\"id\":"
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.tools, vec![tool(None, None, Some("{\"id\":"))]);
}

#[test]
fn test_responses_lifecycle_events_are_ignored() {
    for kind in [
        "response.created",
        "response.in_progress",
        "response.output_text.done",
        "response.completed",
    ] {
        let msg = json!({"type": kind, "response": {"id": "resp_1", "output": []}});
        assert!(extract(&msg).is_none(), "{kind} should carry no data");
    }
}

#[test]
fn test_anthropic_text_delta() {
    let msg = json!({
        "type": "content_block_delta",
        "index": 0,
        "delta": {"type": "text_delta", "text": "2 + 2"}
    });
    let (provider, delta) = extract(&msg).unwrap();
    assert_eq!(provider, "anthropic");
    assert_eq!(delta.content.as_deref(), Some("2 + 2"));
}

#[test]
fn test_anthropic_tool_use_start() {
    let msg = json!({
        "type": "content_block_start",
        "index": 1,
        "content_block": {
            "type": "tool_use",
            "id": "toolu_01T1x1fJ34qAmk2tNTrN7Up6",
            "name": "get_weather",
            "input": {}
        }
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(
        delta.tools,
        vec![tool(Some("toolu_01T1x1fJ34qAmk2tNTrN7Up6"), Some("get_weather"), None)]
    );
}

#[test]
fn test_anthropic_partial_json() {
    let msg = json!({
        "type": "content_block_delta",
        "index": 1,
        "delta": {"type": "input_json_delta", "partial_json": "{\"location\": \"San"}
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(
        delta.tools,
        vec![tool(None, None, Some("{\"location\": \"San"))]
    );
}

#[test]
fn test_anthropic_framing_events_are_ignored() {
    let events = [
        json!({"type": "message_start", "message": {"id": "msg_1", "role": "assistant", "content": []}}),
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
        json!({"type": "ping"}),
        json!({"type": "content_block_stop", "index": 0}),
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}, "usage": {"output_tokens": 8}}),
        json!({"type": "message_stop"}),
    ];
    for msg in &events {
        assert!(extract(msg).is_none(), "{msg} should carry no data");
    }
}

#[test]
fn test_gemini_text() {
    let msg = json!({
        "candidates": [{"content": {"parts": [{"text": "2 + 2 = 4\n"}], "role": "model"}}],
        "modelVersion": "gemini-1.5-flash-8b"
    });
    let (provider, delta) = extract(&msg).unwrap();
    assert_eq!(provider, "gemini");
    assert_eq!(delta.content.as_deref(), Some("2 + 2 = 4\n"));
}

#[test]
fn test_gemini_only_first_part_text() {
    let msg = json!({
        "candidates": [{"content": {"parts": [{"text": "first"}, {"text": "second"}]}}]
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.content.as_deref(), Some("first"));
}

#[test]
fn test_gemini_function_calls_are_complete() {
    let msg = json!({
        "candidates": [{"content": {"role": "model", "parts": [
            {"functionCall": {"name": "get_order", "args": {"id": "123456"}}},
            {"functionCall": {"name": "get_customer", "args": {"id": "7890"}}}
        ]}}]
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.content, None);
    assert_eq!(
        delta.tools,
        vec![
            tool(None, Some("get_order"), Some(r#"{"id":"123456"}"#)),
            tool(None, Some("get_customer"), Some(r#"{"id":"7890"}"#)),
        ]
    );
}

#[test]
fn test_gemini_args_keep_key_order() {
    let msg = json!({
        "candidates": [{"content": {"parts": [
            {"functionCall": {"name": "f", "args": {"zeta": 1, "alpha": 2}}}
        ]}}]
    });
    let (_, delta) = extract(&msg).unwrap();
    assert_eq!(delta.tools[0].args.as_deref(), Some(r#"{"zeta":1,"alpha":2}"#));
}

#[test]
fn test_unknown_shapes_yield_nothing() {
    for msg in [
        json!({}),
        json!({"foo": "bar"}),
        json!([1, 2, 3]),
        json!("just a string"),
        json!(42),
        json!(null),
        json!({"choices": []}),
        json!({"candidates": [{"finishReason": "STOP"}]}),
    ] {
        assert!(extract(&msg).is_none(), "{msg} should not match");
    }
}

#[test]
fn test_first_matching_extractor_wins() {
    // Carries both an OpenAI chat delta and an Anthropic-style delta; the
    // chat shape is checked first.
    let msg = json!({
        "choices": [{"delta": {"content": "chat"}}],
        "delta": {"text": "anthropic"}
    });
    let (provider, delta) = extract(&msg).unwrap();
    assert_eq!(provider, "openai");
    assert_eq!(delta.content.as_deref(), Some("chat"));
}

#[test]
fn test_provider_table_order() {
    let names: Vec<_> = PROVIDERS.iter().map(|p| p.name).collect();
    assert_eq!(names, ["openai", "openai_responses", "anthropic", "gemini"]);
}
