//! Browser transport: `fetch` via `gloo-net`.
//!
//! Only compiled for the `csr` build. Request timeouts are left to the
//! browser; `request_timeout_secs` applies to the native transport.

use super::transport::{Transport, TransportError, decode_response};
use super::types::{ChatRequest, ReplyPayload};
use crate::config::{Credential, WidgetConfig};

pub struct FetchTransport {
    endpoint: String,
    credential: Credential,
    credential_header: String,
}

impl FetchTransport {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            credential: config.credential.clone(),
            credential_header: config.credential_header.clone(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn exchange(&self, message: &str) -> Result<ReplyPayload, TransportError> {
        let resp = gloo_net::http::Request::post(&self.endpoint)
            .header(&self.credential_header, self.credential.expose())
            .json(&ChatRequest { message })
            .map_err(|e| TransportError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        decode_response(status, &body)
    }
}
