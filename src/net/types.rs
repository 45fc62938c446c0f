//! Wire types shared with the assistant endpoint.
//!
//! DESIGN
//! ======
//! The endpoint is a black box: requests are `{"message": ...}` and replies
//! carry at least `text`. Unknown reply fields are kept in `extra` so they
//! flow through to the message log untouched.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Text shown as the bot turn whenever the endpoint cannot be reached or
/// answers with something unusable.
pub const FALLBACK_REPLY_TEXT: &str = "Sorry, there was an error connecting to the server.";

/// Outbound request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// A quick-reply option offered by the assistant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSpec {
    /// Visible label.
    pub text: String,
    /// Value sent back when the button is activated.
    pub value: String,
}

impl ButtonSpec {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self { text: text.into(), value: value.into() }
    }
}

/// Parsed assistant reply.
///
/// Older backends answer with `{"reply": ...}`; that key stands in for `text`
/// only when `text` is absent. Otherwise it is an ordinary extra field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireReply")]
pub struct ReplyPayload {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonSpec>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply body as received, before `text` and `reply` are reconciled.
#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    buttons: Option<Vec<ButtonSpec>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<WireReply> for ReplyPayload {
    type Error = &'static str;

    fn try_from(wire: WireReply) -> Result<Self, Self::Error> {
        let WireReply { text, reply, buttons, mut extra } = wire;
        let text = match (text, reply) {
            (Some(text), reply) => {
                if let Some(reply) = reply {
                    extra.insert("reply".to_owned(), Value::String(reply));
                }
                text
            }
            (None, Some(reply)) => reply,
            (None, None) => return Err("missing field `text`"),
        };
        Ok(Self { text, buttons, extra })
    }
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), buttons: None, extra: Map::new() }
    }

    #[must_use]
    pub fn with_buttons(mut self, buttons: Vec<ButtonSpec>) -> Self {
        self.buttons = Some(buttons);
        self
    }

    /// The reply used when the exchange fails for any reason.
    pub fn fallback() -> Self {
        Self::text(FALLBACK_REPLY_TEXT)
    }

    /// Parse a raw response body.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body is not a JSON object with a
    /// string `text` (or `reply`) field.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
