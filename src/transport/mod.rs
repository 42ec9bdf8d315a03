//! Transport module - request/response delivery to bound addresses.
//!
//! The dispatcher treats delivery as an opaque synchronous exchange: send a
//! serialized event to an address, get a response body or an error back.
//! Framing, connections and protocol choice live behind the [`Transport`]
//! trait; [`HttpTransport`] is the stock HTTP/1.1 implementation.

mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::event::Event;

pub use http::HttpTransport;

/// Request/response exchange with a remote handler process.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `event` to `address`; resolves to the response body.
    async fn deliver(&self, address: &str, event: &Event) -> Result<String>;
}
