use super::*;
use serde_json::json;

fn quote_reply() -> ReplyPayload {
    ReplyPayload::text("Hi! How can I help?").with_buttons(vec![ButtonSpec::new("Get a quote", "quote")])
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state_is_open_and_empty() {
    let state = ConversationState::default();
    assert!(state.is_open());
    assert!(state.messages().is_empty());
    assert_eq!(state.draft_input(), "");
    assert!(state.shows_greeting());
}

#[test]
fn new_respects_initial_visibility() {
    assert!(!ConversationState::new(false).is_open());
}

// =============================================================
// Panel + draft
// =============================================================

#[test]
fn toggle_panel_once_flips() {
    let mut state = ConversationState::default();
    assert!(!state.toggle_panel());
    assert!(!state.is_open());
}

#[test]
fn toggle_panel_twice_restores() {
    let mut state = ConversationState::new(false);
    state.toggle_panel();
    state.toggle_panel();
    assert!(!state.is_open());
}

#[test]
fn toggle_panel_leaves_log_and_draft_alone() {
    let mut state = ConversationState::default();
    state.edit_draft("half typed");
    state.begin_submit(&Submission::UserText("Hello".into()));
    state.edit_draft("half typed");
    let before = state.messages().to_vec();

    state.toggle_panel();

    assert_eq!(state.messages(), before.as_slice());
    assert_eq!(state.draft_input(), "half typed");
}

#[test]
fn close_panel_reports_previous_visibility() {
    let mut state = ConversationState::default();
    assert!(state.close_panel());
    assert!(!state.close_panel());
    assert!(!state.is_open());
}

#[test]
fn edit_draft_replaces_buffer() {
    let mut state = ConversationState::default();
    state.edit_draft("Hel");
    state.edit_draft("Hello");
    assert_eq!(state.draft_input(), "Hello");
}

// =============================================================
// Submission parsing
// =============================================================

#[test]
fn parse_plain_text_is_user_text() {
    assert_eq!(Submission::parse("Hello"), Submission::UserText("Hello".into()));
}

#[test]
fn parse_sentinel_is_button_click() {
    assert_eq!(Submission::parse("__CLICKED__:quote"), Submission::ButtonClick("quote".into()));
}

#[test]
fn parse_sentinel_without_colon_is_user_text() {
    assert_eq!(Submission::parse("__CLICKED__quote"), Submission::UserText("__CLICKED__quote".into()));
}

#[test]
fn wire_text_restores_sentinel() {
    assert_eq!(Submission::ButtonClick("quote".into()).wire_text(), "__CLICKED__:quote");
    assert_eq!(Submission::UserText("  hi ".into()).wire_text(), "  hi ");
}

#[test]
fn blank_detection_only_applies_to_typed_text() {
    assert!(Submission::UserText(String::new()).is_blank());
    assert!(Submission::UserText(" \t\n".into()).is_blank());
    assert!(!Submission::UserText(" x ".into()).is_blank());
    assert!(!Submission::ButtonClick(String::new()).is_blank());
}

// =============================================================
// begin_submit
// =============================================================

#[test]
fn begin_submit_logs_exact_user_text_and_clears_draft() {
    let mut state = ConversationState::default();
    state.edit_draft("  Hello  ");

    let wire = state.begin_submit(&Submission::UserText("  Hello  ".into()));

    assert_eq!(wire.as_deref(), Some("  Hello  "));
    assert_eq!(state.messages(), &[Message::user("  Hello  ")]);
    assert_eq!(state.draft_input(), "");
}

#[test]
fn begin_submit_button_click_logs_nothing_but_clears_draft() {
    let mut state = ConversationState::default();
    state.edit_draft("something");

    let wire = state.begin_submit(&Submission::ButtonClick("quote".into()));

    assert_eq!(wire.as_deref(), Some("__CLICKED__:quote"));
    assert!(state.messages().is_empty());
    assert_eq!(state.draft_input(), "");
}

#[test]
fn begin_submit_blank_is_noop() {
    for blank in ["", "   "] {
        let mut state = ConversationState::default();
        state.edit_draft("draft stays");

        assert_eq!(state.begin_submit(&Submission::UserText(blank.into())), None);
        assert!(state.messages().is_empty());
        assert_eq!(state.draft_input(), "draft stays");
    }
}

// =============================================================
// append_reply + Message
// =============================================================

#[test]
fn append_reply_logs_bot_turn_with_buttons() {
    let mut state = ConversationState::default();
    state.begin_submit(&Submission::UserText("Hello".into()));

    let len = state.append_reply(quote_reply());

    assert_eq!(len, 2);
    let bot = &state.messages()[1];
    assert_eq!(bot.sender, Sender::Bot);
    assert_eq!(bot.text, "Hi! How can I help?");
    assert_eq!(bot.quick_replies(), &[ButtonSpec::new("Get a quote", "quote")]);
    assert!(!state.shows_greeting());
}

#[test]
fn bot_message_keeps_extra_fields_but_not_sender_override() {
    let mut reply = ReplyPayload::text("ok");
    reply.extra.insert("sender".into(), json!("user"));
    reply.extra.insert("step".into(), json!(2));

    let msg = Message::bot(reply);

    assert_eq!(msg.sender, Sender::Bot);
    assert_eq!(msg.extra.get("step"), Some(&json!(2)));
    assert!(!msg.extra.contains_key("sender"));
}

#[test]
fn user_message_never_offers_quick_replies() {
    let mut msg = Message::user("hi");
    msg.buttons = Some(vec![ButtonSpec::new("x", "y")]);
    assert!(msg.quick_replies().is_empty());
}

#[test]
fn message_serializes_like_the_widget_log() {
    let value = serde_json::to_value(Message::bot(quote_reply())).unwrap();
    assert_eq!(
        value,
        json!({
            "sender": "bot",
            "text": "Hi! How can I help?",
            "buttons": [{ "text": "Get a quote", "value": "quote" }]
        })
    );
    assert_eq!(serde_json::to_value(Message::user("Hello")).unwrap(), json!({ "sender": "user", "text": "Hello" }));
}
