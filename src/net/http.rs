//! Native HTTP transport backed by `reqwest`.
//!
//! Used off the browser (tests, native embedders). The browser build talks
//! through `api::FetchTransport`.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use super::transport::{Transport, TransportError, decode_response};
use super::types::{ChatRequest, ReplyPayload};
use crate::config::{Credential, WidgetConfig};

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    credential: Credential,
    credential_header: String,
}

impl HttpTransport {
    /// Build a transport for the configured endpoint and credential.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &WidgetConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(config.request_timeout_secs)))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            credential: config.credential.clone(),
            credential_header: config.credential_header.clone(),
        })
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for HttpTransport {
    async fn exchange(&self, message: &str) -> Result<ReplyPayload, TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(self.credential_header.as_str(), self.credential.expose())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        decode_response(status, &body)
    }
}
