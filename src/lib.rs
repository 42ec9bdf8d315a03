//! # eventwire
//!
//! A minimal RPC/event-dispatch layer. Services register handler methods
//! under a textual signature derived from their argument and return types;
//! callers emit events (a signature plus a serialized payload) that are
//! routed over plain HTTP to every registered handler whose signature
//! matches, and invoked by name with payload fields decoded into the
//! declared argument types.
//!
//! ## Architecture
//!
//! - **Signature codec**: `Greet:(*User):(string, error)` is both the wire
//!   spelling of a method's shape and the routing key for dispatch
//! - **Type registry**: lets a payload type be constructed by name so an
//!   inbound body can be decoded into the right concrete shape
//! - **Service directory**: ordered (signature, address) bindings; several
//!   bindings may share a signature and all of them receive the event
//! - **Dispatcher**: matches events against the directory, fans deliveries
//!   out concurrently (fire-and-collect `call` or fire-and-wait `emit`) and
//!   invokes local handlers on inbound events
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use eventwire::{Dispatcher, Event, EventServer};
//!
//! #[tokio::main]
//! async fn main() -> eventwire::Result<()> {
//!     let dispatcher = Arc::new(Dispatcher::builder().build());
//!     dispatcher.register_type::<User>("*User");
//!     dispatcher.register(Arc::new(GreetService), "http://localhost:5002")?;
//!
//!     dispatcher
//!         .emit(&Event::new(
//!             "Greet:(*User):(string, error)",
//!             br#"{"name":"Ewan","age":29}"#.to_vec(),
//!         ))
//!         .await?;
//!
//!     EventServer::bind(dispatcher, "127.0.0.1:5002")
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod registry;
pub mod server;
pub mod service;
pub mod signature;
pub mod transport;

pub use directory::{ServiceBinding, ServiceDirectory};
pub use dispatcher::{CallOutcome, Dispatcher, DispatcherBuilder, DEFAULT_DELIVERY_TIMEOUT};
pub use error::{DeliveryFailure, EventwireError, Result};
pub use event::Event;
pub use registry::TypeRegistry;
pub use server::EventServer;
pub use service::{MethodSpec, Service};
pub use signature::{Signature, SignatureCodec};
pub use transport::{HttpTransport, Transport};
