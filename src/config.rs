//! Widget configuration fixed at build or deploy time.
//!
//! DESIGN
//! ======
//! The end user never edits these values. They come either from constants
//! baked in by the bundler (`option_env!`) or from a JSON blob the host page
//! embeds next to the widget script. Both paths funnel through
//! [`WidgetConfig::from_raw`] so validation lives in one place.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;

use serde::Deserialize;

pub const DEFAULT_CREDENTIAL_HEADER: &str = "X-API-Key";
pub const DEFAULT_GREETING: &str = "Welcome! How can I help you?";
pub const DEFAULT_TITLE: &str = "Assistant";
pub const DEFAULT_PLACEHOLDER: &str = "Type a message...";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors produced while building a [`WidgetConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required value was not provided.
    #[error("missing config value: {0}")]
    Missing(&'static str),

    /// A value was present but could not be interpreted.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The deploy-time JSON blob could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static token attached to every outbound request.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// How bot turns from overlapping submissions are ordered in the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplyOrdering {
    /// Append each reply as soon as its request resolves.
    #[default]
    Arrival,
    /// Append replies strictly in the order their submissions were issued.
    Fifo,
}

/// Typed widget configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub credential: Credential,
    pub credential_header: String,
    pub greeting: String,
    pub title: String,
    pub placeholder: String,
    pub start_open: bool,
    pub reply_ordering: ReplyOrdering,
    pub request_timeout_secs: u64,
}

/// Unvalidated configuration as supplied by the host page or the build.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawWidgetConfig {
    pub endpoint: Option<String>,
    pub credential: Option<String>,
    pub credential_header: Option<String>,
    pub greeting: Option<String>,
    pub title: Option<String>,
    pub placeholder: Option<String>,
    pub start_open: Option<bool>,
    pub reply_ordering: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl WidgetConfig {
    /// Build a config with defaults for everything but the endpoint and credential.
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            credential,
            credential_header: DEFAULT_CREDENTIAL_HEADER.to_owned(),
            greeting: DEFAULT_GREETING.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            start_open: true,
            reply_ordering: ReplyOrdering::Arrival,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Validate raw values into a typed config.
    ///
    /// Required: `endpoint`, `credential`.
    ///
    /// Optional:
    /// - `credential_header`: default `X-API-Key`
    /// - `greeting`, `title`, `placeholder`: UI copy
    /// - `start_open`: default `true`
    /// - `reply_ordering`: `arrival` (default) or `fifo`
    /// - `request_timeout_secs`: default 30, must be non-zero
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required value is missing or any value is invalid.
    pub fn from_raw(raw: RawWidgetConfig) -> Result<Self, ConfigError> {
        let endpoint = parse_endpoint(raw.endpoint.as_deref())?;
        let credential = match raw.credential.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Credential::new(token),
            _ => return Err(ConfigError::Missing("credential")),
        };
        let credential_header = parse_header_name(raw.credential_header.as_deref())?;
        let reply_ordering = parse_reply_ordering(raw.reply_ordering.as_deref())?;
        let request_timeout_secs = match raw.request_timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    field: "request_timeout_secs",
                    reason: "must be greater than zero".to_owned(),
                });
            }
            Some(secs) => secs,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let mut config = Self::new(endpoint, credential);
        config.credential_header = credential_header;
        config.reply_ordering = reply_ordering;
        config.request_timeout_secs = request_timeout_secs;
        if let Some(greeting) = raw.greeting {
            config.greeting = greeting;
        }
        if let Some(title) = raw.title {
            config.title = title;
        }
        if let Some(placeholder) = raw.placeholder {
            config.placeholder = placeholder;
        }
        if let Some(start_open) = raw.start_open {
            config.start_open = start_open;
        }
        Ok(config)
    }

    /// Parse the JSON blob a host page embeds alongside the widget.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON, otherwise as [`WidgetConfig::from_raw`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawWidgetConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Build from values baked in at compile time.
    ///
    /// - `CHAT_WIDGET_ENDPOINT` (required)
    /// - `CHAT_WIDGET_API_KEY` (required)
    /// - `CHAT_WIDGET_CREDENTIAL_HEADER`
    /// - `CHAT_WIDGET_GREETING`
    /// - `CHAT_WIDGET_TITLE`
    /// - `CHAT_WIDGET_REPLY_ORDERING`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the build did not provide the required values.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_raw(RawWidgetConfig {
            endpoint: option_env!("CHAT_WIDGET_ENDPOINT").map(str::to_owned),
            credential: option_env!("CHAT_WIDGET_API_KEY").map(str::to_owned),
            credential_header: option_env!("CHAT_WIDGET_CREDENTIAL_HEADER").map(str::to_owned),
            greeting: option_env!("CHAT_WIDGET_GREETING").map(str::to_owned),
            title: option_env!("CHAT_WIDGET_TITLE").map(str::to_owned),
            placeholder: None,
            start_open: None,
            reply_ordering: option_env!("CHAT_WIDGET_REPLY_ORDERING").map(str::to_owned),
            request_timeout_secs: None,
        })
    }
}

fn parse_endpoint(raw: Option<&str>) -> Result<String, ConfigError> {
    let endpoint = raw.map(str::trim).unwrap_or_default();
    if endpoint.is_empty() {
        return Err(ConfigError::Missing("endpoint"));
    }
    let allowed = endpoint.starts_with("https://") || endpoint.starts_with("http://") || endpoint.starts_with('/');
    if !allowed {
        return Err(ConfigError::Invalid {
            field: "endpoint",
            reason: format!("expected an http(s) URL or a same-origin path, got '{endpoint}'"),
        });
    }
    Ok(endpoint.trim_end_matches('/').to_owned())
}

fn parse_header_name(raw: Option<&str>) -> Result<String, ConfigError> {
    let name = raw.map(str::trim).unwrap_or(DEFAULT_CREDENTIAL_HEADER);
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        return Err(ConfigError::Invalid { field: "credential_header", reason: format!("'{name}' is not a header name") });
    }
    Ok(name.to_owned())
}

fn parse_reply_ordering(raw: Option<&str>) -> Result<ReplyOrdering, ConfigError> {
    match raw.unwrap_or("arrival") {
        "arrival" => Ok(ReplyOrdering::Arrival),
        "fifo" => Ok(ReplyOrdering::Fifo),
        other => Err(ConfigError::Invalid {
            field: "reply_ordering",
            reason: format!("unsupported ordering '{other}' (expected 'arrival' or 'fifo')"),
        }),
    }
}
