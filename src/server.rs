//! Inbound event server - the single receive endpoint.
//!
//! Every path on the listener behaves the same way: decode the JSON
//! [`Event`] from the request body, hand it to [`Dispatcher::invoke`], and
//! answer `"Ok"`. There is no routing or multiplexing beyond this one entry
//! point.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use eventwire::{Dispatcher, EventServer};
//!
//! let dispatcher = Arc::new(Dispatcher::builder().build());
//! let server = EventServer::bind(dispatcher, "127.0.0.1:5002").await?;
//! server.run().await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::event::Event;

/// Acknowledgement body written back after a successful invoke.
const ACK_BODY: &str = "Ok";

/// HTTP server feeding inbound events into a dispatcher.
pub struct EventServer {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
}

impl EventServer {
    /// Bind the inbound endpoint.
    ///
    /// `addr` may use port 0 to take an ephemeral port; see
    /// [`local_addr`](Self::local_addr).
    pub async fn bind(dispatcher: Arc<Dispatcher>, addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    /// The address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails.
    ///
    /// Each connection is served on its own task; a failed connection is
    /// logged and never takes the accept loop down.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let io = TokioIo::new(stream);
            let dispatcher = self.dispatcher.clone();

            tokio::spawn(async move {
                let service =
                    service_fn(move |req| handle_event(dispatcher.clone(), req));
                if let Err(e) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    tracing::debug!("connection error from {peer}: {e}");
                }
            });
        }
    }
}

/// Decode one inbound event and invoke the local handler.
async fn handle_event(
    dispatcher: Arc<Dispatcher>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let body = req.into_body().collect().await?.to_bytes();

    let event: Event = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("rejecting undecodable event envelope: {e}");
            return Ok(plain_response(
                StatusCode::BAD_REQUEST,
                format!("invalid event: {e}"),
            ));
        }
    };

    match dispatcher.invoke(&event.signature, &event.body) {
        Ok(()) => Ok(plain_response(StatusCode::OK, ACK_BODY.to_string())),
        Err(e) => {
            tracing::error!("invoke failed for {}: {e}", event.signature);
            Ok(plain_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}

fn plain_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
}
