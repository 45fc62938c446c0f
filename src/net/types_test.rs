use super::*;
use serde_json::json;

// =============================================================
// ReplyPayload parsing
// =============================================================

#[test]
fn parse_text_only_reply() {
    let reply = ReplyPayload::parse(r#"{"text":"Hi! How can I help?"}"#).unwrap();
    assert_eq!(reply.text, "Hi! How can I help?");
    assert!(reply.buttons.is_none());
    assert!(reply.extra.is_empty());
}

#[test]
fn parse_reply_with_buttons_keeps_order() {
    let body = json!({
        "text": "Pick one",
        "buttons": [
            { "text": "Get a quote", "value": "quote" },
            { "text": "Talk to an agent", "value": "agent" }
        ]
    })
    .to_string();

    let reply = ReplyPayload::parse(&body).unwrap();
    let buttons = reply.buttons.unwrap();
    assert_eq!(buttons, vec![ButtonSpec::new("Get a quote", "quote"), ButtonSpec::new("Talk to an agent", "agent")]);
}

#[test]
fn parse_accepts_reply_alias() {
    let reply = ReplyPayload::parse(r#"{"reply":"from the old backend"}"#).unwrap();
    assert_eq!(reply.text, "from the old backend");
}

#[test]
fn parse_prefers_text_and_keeps_reply_as_extra() {
    let reply = ReplyPayload::parse(r#"{"text":"Hi","reply":"legacy"}"#).unwrap();
    assert_eq!(reply.text, "Hi");
    assert_eq!(reply.extra.get("reply"), Some(&json!("legacy")));
}

#[test]
fn parse_falls_back_to_reply_when_text_is_null() {
    let reply = ReplyPayload::parse(r#"{"text":null,"reply":"legacy"}"#).unwrap();
    assert_eq!(reply.text, "legacy");
    assert!(reply.extra.is_empty());
}

#[test]
fn parse_rejects_non_string_text() {
    assert!(ReplyPayload::parse(r#"{"text":42}"#).is_err());
}

#[test]
fn parse_keeps_unknown_fields() {
    let reply = ReplyPayload::parse(r#"{"text":"ok","step":3,"lead_id":"abc"}"#).unwrap();
    assert_eq!(reply.extra.get("step"), Some(&json!(3)));
    assert_eq!(reply.extra.get("lead_id"), Some(&json!("abc")));
}

#[test]
fn parse_null_buttons_is_none() {
    let reply = ReplyPayload::parse(r#"{"text":"ok","buttons":null}"#).unwrap();
    assert!(reply.buttons.is_none());
}

#[test]
fn parse_rejects_missing_text() {
    assert!(ReplyPayload::parse(r#"{"error":"nope"}"#).is_err());
}

#[test]
fn parse_rejects_non_json() {
    assert!(ReplyPayload::parse("<html>502 Bad Gateway</html>").is_err());
}

#[test]
fn parse_rejects_malformed_button() {
    assert!(ReplyPayload::parse(r#"{"text":"ok","buttons":[{"text":"no value"}]}"#).is_err());
}

// =============================================================
// Fallback + request body
// =============================================================

#[test]
fn fallback_has_fixed_text_and_no_buttons() {
    let reply = ReplyPayload::fallback();
    assert_eq!(reply.text, "Sorry, there was an error connecting to the server.");
    assert!(reply.buttons.is_none());
    assert!(reply.extra.is_empty());
}

#[test]
fn chat_request_serializes_message_field() {
    let body = serde_json::to_value(ChatRequest { message: "__CLICKED__:quote" }).unwrap();
    assert_eq!(body, json!({ "message": "__CLICKED__:quote" }));
}

#[test]
fn reply_serialization_omits_absent_buttons() {
    let value = serde_json::to_value(ReplyPayload::text("hi")).unwrap();
    assert_eq!(value, json!({ "text": "hi" }));
}
