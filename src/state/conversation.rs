//! Conversation state: panel visibility, message log, and draft input.
//!
//! DESIGN
//! ======
//! Transitions here are synchronous and pure so they can be tested without a
//! transport or a UI. The controller wraps them with the async send pipeline.
//! The log is append-only: nothing outside `append_*` touches `messages`.

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::net::types::{ButtonSpec, ReplyPayload};

/// Wire prefix marking a submission that came from a quick-reply button.
pub const CLICK_SENTINEL: &str = "__CLICKED__:";

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonSpec>>,
    /// Reply fields the widget does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into(), buttons: None, extra: Map::new() }
    }

    /// Wrap a reply as a bot turn. A `sender` key in the reply never wins over `bot`.
    pub fn bot(reply: ReplyPayload) -> Self {
        let ReplyPayload { text, buttons, mut extra } = reply;
        extra.remove("sender");
        Self { sender: Sender::Bot, text, buttons, extra }
    }

    /// Buttons to render beneath this message; empty for user turns.
    pub fn quick_replies(&self) -> &[ButtonSpec] {
        match (self.sender, &self.buttons) {
            (Sender::Bot, Some(buttons)) => buttons,
            _ => &[],
        }
    }
}

/// What the user asked to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Free text typed into the input field.
    UserText(String),
    /// A quick-reply button, identified by its `value`.
    ButtonClick(String),
}

impl Submission {
    /// Interpret raw input text, recognising the button-click wire prefix.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.strip_prefix(CLICK_SENTINEL) {
            Some(value) => Self::ButtonClick(value.to_owned()),
            None => Self::UserText(raw),
        }
    }

    /// The literal text placed in the request body.
    pub fn wire_text(&self) -> String {
        match self {
            Self::UserText(text) => text.clone(),
            Self::ButtonClick(value) => format!("{CLICK_SENTINEL}{value}"),
        }
    }

    /// Typed text that is empty or whitespace only. Button clicks are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::UserText(text) if text.trim().is_empty())
    }
}

/// In-memory state for one mounted widget.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversationState {
    is_open: bool,
    messages: Vec<Message>,
    draft_input: String,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConversationState {
    pub fn new(is_open: bool) -> Self {
        Self { is_open, messages: Vec::new(), draft_input: String::new() }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    /// The greeting bubble is shown only while nothing has been logged.
    pub fn shows_greeting(&self) -> bool {
        self.messages.is_empty()
    }

    /// Flip panel visibility. Returns the new value.
    pub fn toggle_panel(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Hide the panel. Returns `true` if it was open.
    pub fn close_panel(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }

    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft_input = text.into();
    }

    /// Apply the synchronous half of a submission.
    ///
    /// Returns the wire text to send, or `None` when the submission is blank
    /// and nothing changed. Typed text is logged as a user turn right away;
    /// button clicks are not, since their label is already on screen. The
    /// draft is cleared in both cases.
    pub fn begin_submit(&mut self, submission: &Submission) -> Option<String> {
        if submission.is_blank() {
            return None;
        }
        if let Submission::UserText(text) = submission {
            self.messages.push(Message::user(text.clone()));
        }
        self.draft_input.clear();
        Some(submission.wire_text())
    }

    /// Log a bot turn. Returns the new log length.
    pub fn append_reply(&mut self, reply: ReplyPayload) -> usize {
        self.messages.push(Message::bot(reply));
        self.messages.len()
    }
}
