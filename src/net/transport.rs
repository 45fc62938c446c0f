//! Transport adapter: one request/response exchange with the assistant.
//!
//! ERROR HANDLING
//! ==============
//! [`Transport::exchange`] is fallible so backends and tests can report what
//! went wrong. Callers never see those errors: [`send_message`] logs them and
//! substitutes [`ReplyPayload::fallback`], so the conversation always gets a
//! bot turn.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use super::types::ReplyPayload;

/// Errors produced by a single exchange with the assistant endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout, CORS).
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("endpoint responded with status {status}")]
    Status { status: u16, body: String },

    /// The response body was not a usable reply.
    #[error("reply parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// No transport exists for this build target.
    #[error("transport unavailable: {0}")]
    Unavailable(&'static str),
}

/// Longest slice of an error body carried into the log line.
const LOGGED_BODY_CHARS: usize = 200;

impl TransportError {
    /// One-line description for the diagnostic log, including a trimmed
    /// response body when the endpoint sent one.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => {
                let snippet: String = body.trim().chars().take(LOGGED_BODY_CHARS).collect();
                format!("{self}; body: {snippet}")
            }
            _ => self.to_string(),
        }
    }
}

/// A backend able to deliver one message and return the assistant's reply.
///
/// Futures are not required to be `Send`: the widget runs on the single UI
/// thread and browser fetch futures are `!Send`.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// Send `message` verbatim and parse the reply.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure, non-2xx status, or an
    /// unparseable body.
    async fn exchange(&self, message: &str) -> Result<ReplyPayload, TransportError>;
}

/// Deliver `message` and always come back with a reply.
pub async fn send_message<T>(transport: &T, message: &str) -> ReplyPayload
where
    T: Transport + ?Sized,
{
    match transport.exchange(message).await {
        Ok(reply) => reply,
        Err(e) => {
            log::warn!("chat transport: exchange failed, using fallback reply: {}", e.diagnostic());
            ReplyPayload::fallback()
        }
    }
}

/// Turn a finished HTTP response into a reply.
///
/// Shared by the native and browser transports so both apply identical
/// status and body rules.
///
/// # Errors
///
/// Returns [`TransportError::Status`] for non-2xx statuses and
/// [`TransportError::Parse`] when the body is not a reply object.
pub fn decode_response(status: u16, body: &str) -> Result<ReplyPayload, TransportError> {
    if !(200..300).contains(&status) {
        return Err(TransportError::Status { status, body: body.to_owned() });
    }
    ReplyPayload::parse(body).map_err(|e| TransportError::Parse(e.to_string()))
}

/// Transport for builds with no way to reach the network.
///
/// Every exchange fails, so every submission yields the fallback reply.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

#[async_trait::async_trait(?Send)]
impl Transport for UnavailableTransport {
    async fn exchange(&self, _message: &str) -> Result<ReplyPayload, TransportError> {
        Err(TransportError::Unavailable("no HTTP client for this target"))
    }
}
