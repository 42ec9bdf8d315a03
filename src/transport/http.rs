//! HTTP/1.1 transport over plain `hyper` connections.
//!
//! One TCP connection per delivery: connect, handshake, `POST` the
//! JSON-encoded event, collect the response body. Connection pooling is
//! deliberately absent; deliveries are independent round trips.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::error::{EventwireError, Result};
use crate::event::Event;
use crate::transport::Transport;

/// Stock transport: JSON event over HTTP/1.1 `POST`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport;

impl HttpTransport {
    /// Create an HTTP transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, address: &str, event: &Event) -> Result<String> {
        let uri: Uri = address
            .parse()
            .map_err(|_| EventwireError::InvalidAddress(address.to_string()))?;
        let host = uri
            .host()
            .ok_or_else(|| EventwireError::InvalidAddress(address.to_string()))?
            .to_string();
        let port = uri.port_u16().unwrap_or(80);

        let stream = TcpStream::connect((host.as_str(), port)).await?;
        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| EventwireError::Transport(format!("handshake with {address}: {e}")))?;

        // The connection driver must be polled for the request to make
        // progress; it ends when the exchange completes.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("connection driver error: {e}");
            }
        });

        let payload = serde_json::to_vec(event)?;
        let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

        let req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(HOST, &host)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| EventwireError::Transport(format!("request build: {e}")))?;

        let res = sender
            .send_request(req)
            .await
            .map_err(|e| EventwireError::Transport(format!("request to {address}: {e}")))?;

        let body = res
            .into_body()
            .collect()
            .await
            .map_err(|e| EventwireError::Transport(format!("response from {address}: {e}")))?
            .to_bytes();

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
