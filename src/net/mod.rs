//! Networking modules for the assistant endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` defines the fail-soft exchange contract, `http` and `api`
//! implement it natively and in the browser, and `types` defines the wire
//! schema.

#[cfg(feature = "csr")]
pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod transport;
pub mod types;

use std::rc::Rc;

use crate::config::WidgetConfig;
use transport::Transport;

/// Pick the transport for the current build target.
pub fn default_transport(config: &WidgetConfig) -> Rc<dyn Transport> {
    #[cfg(feature = "csr")]
    {
        Rc::new(api::FetchTransport::new(config))
    }
    #[cfg(all(not(feature = "csr"), not(target_arch = "wasm32")))]
    {
        match http::HttpTransport::new(config) {
            Ok(transport) => Rc::new(transport),
            Err(e) => {
                log::error!("chat transport: {e}; replies will use the fallback text");
                Rc::new(transport::UnavailableTransport)
            }
        }
    }
    #[cfg(all(not(feature = "csr"), target_arch = "wasm32"))]
    {
        let _ = config;
        Rc::new(transport::UnavailableTransport)
    }
}
