//! Dispatcher - registration, fan-out and inbound invocation.
//!
//! The dispatcher owns the three core collaborators for the lifetime of the
//! host process:
//!
//! - the [`SignatureCodec`] that encodes handler shapes into routing keys
//! - the [`TypeRegistry`] that materializes argument types by name
//! - the [`ServiceDirectory`] of (signature, address) bindings
//!
//! Outbound, [`emit`](Dispatcher::emit) and [`call`](Dispatcher::call) match
//! an event against the directory and deliver to every matching binding
//! concurrently, joining all deliveries before returning. Inbound,
//! [`invoke`](Dispatcher::invoke) decodes the event's signature, materializes
//! one argument per declared type from the payload and calls the local
//! service by method name.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use eventwire::{Dispatcher, Event};
//!
//! let dispatcher = Dispatcher::builder().build();
//! dispatcher.register_type::<User>("*User");
//! dispatcher.register(Arc::new(GreetService), "http://localhost:5002")?;
//!
//! dispatcher
//!     .emit(&Event::new(
//!         "Greet:(*User):(string, error)",
//!         br#"{"name":"Ewan","age":29}"#.to_vec(),
//!     ))
//!     .await?;
//! ```

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::task::JoinSet;

use crate::directory::{ServiceBinding, ServiceDirectory};
use crate::error::{DeliveryFailure, EventwireError, Result};
use crate::event::Event;
use crate::registry::TypeRegistry;
use crate::service::Service;
use crate::signature::SignatureCodec;
use crate::transport::{HttpTransport, Transport};

/// Default per-delivery timeout.
///
/// A timed-out delivery is a per-binding failure; it never aborts the rest
/// of the fan-out.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Collected outcome of a [`Dispatcher::call`] fan-out.
///
/// Successful response bodies arrive in completion order (which is
/// non-deterministic, not registration order); failed deliveries are
/// reported separately and never hide a sibling's result.
#[derive(Debug, Default)]
pub struct CallOutcome {
    /// Response bodies from successful deliveries, in arrival order.
    pub responses: Vec<String>,
    /// Per-binding delivery failures.
    pub failures: Vec<DeliveryFailure>,
}

/// Builder for configuring a [`Dispatcher`].
pub struct DispatcherBuilder {
    codec: SignatureCodec,
    transport: Arc<dyn Transport>,
    delivery_timeout: Duration,
}

impl DispatcherBuilder {
    /// Create a builder with the stock HTTP transport and default timeout.
    pub fn new() -> Self {
        Self {
            codec: SignatureCodec::new(),
            transport: Arc::new(HttpTransport::new()),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Strip `<namespace>.` from type names when encoding signatures.
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.codec = SignatureCodec::with_namespace(namespace);
        self
    }

    /// Replace the delivery transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Set the per-delivery timeout.
    pub fn delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            codec: self.codec,
            registry: TypeRegistry::new(),
            directory: ServiceDirectory::new(),
            local: RwLock::new(None),
            transport: self.transport,
            delivery_timeout: self.delivery_timeout,
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Signature-routed event dispatcher.
///
/// One instance per host process. Registration mutates the directory and
/// registry; each emit/call/invoke is a one-shot operation over a
/// point-in-time snapshot of both.
pub struct Dispatcher {
    codec: SignatureCodec,
    registry: TypeRegistry,
    directory: ServiceDirectory,
    /// Local inbound target. The most recent registration wins.
    local: RwLock<Option<Arc<dyn Service>>>,
    transport: Arc<dyn Transport>,
    delivery_timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher builder.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// The signature codec.
    pub fn codec(&self) -> &SignatureCodec {
        &self.codec
    }

    /// The type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The service directory.
    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    /// Register a payload type under the exact spelling signatures use.
    pub fn register_type<T>(&self, name: &str)
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        self.registry.register::<T>(name);
    }

    /// Register a service's methods at `address`.
    ///
    /// Walks the service's method table, encodes each method's canonical
    /// signature and appends one binding per method, all sharing `address`.
    /// The service also becomes the local target for inbound
    /// [`invoke`](Self::invoke) dispatch.
    pub fn register(&self, service: Arc<dyn Service>, address: &str) -> Result<()> {
        for method in service.methods() {
            let args: Vec<&str> = method.args.iter().map(String::as_str).collect();
            let returns: Vec<&str> = method.returns.iter().map(String::as_str).collect();
            let signature =
                self.codec
                    .encode(&method.name, &args, &returns, method.has_returns())?;

            tracing::debug!("registered {} at {}", signature, address);
            self.directory.insert(ServiceBinding {
                signature,
                address: address.to_string(),
            });
        }

        let mut local = self.local.write().expect("local service lock poisoned");
        *local = Some(service);
        Ok(())
    }

    /// Emit an event to every matching binding, waiting for all deliveries.
    ///
    /// Response bodies are discarded. Zero matches is success. When one or
    /// more deliveries fail, the aggregate
    /// [`EventwireError::Delivery`] carries every per-binding failure;
    /// successful siblings are unaffected.
    pub async fn emit(&self, event: &Event) -> Result<()> {
        let (_, failures) = self.fan_out(event).await;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(EventwireError::Delivery(failures))
        }
    }

    /// Call every matching binding and collect the response bodies.
    ///
    /// Zero matches yields an empty outcome. Delivery failures are reported
    /// in [`CallOutcome::failures`] alongside the siblings' responses.
    pub async fn call(&self, event: &Event) -> Result<CallOutcome> {
        let (responses, failures) = self.fan_out(event).await;
        Ok(CallOutcome {
            responses,
            failures,
        })
    }

    /// Concurrent delivery to every binding matching the event's signature.
    ///
    /// Each delivery runs as its own task; the task is accounted by the
    /// `JoinSet` at spawn time, before it runs, so the join below cannot
    /// return early. The full join completes before this returns.
    async fn fan_out(&self, event: &Event) -> (Vec<String>, Vec<DeliveryFailure>) {
        let matched = self.directory.matches(&event.signature);
        tracing::debug!(
            "fan-out for {}: {} matching binding(s)",
            event.signature,
            matched.len()
        );

        let mut tasks: JoinSet<std::result::Result<String, DeliveryFailure>> = JoinSet::new();
        for binding in matched {
            let transport = Arc::clone(&self.transport);
            let event = event.clone();
            let timeout = self.delivery_timeout;

            tasks.spawn(async move {
                let exchange = transport.deliver(&binding.address, &event);
                match tokio::time::timeout(timeout, exchange).await {
                    Ok(Ok(body)) => Ok(body),
                    Ok(Err(e)) => Err(DeliveryFailure {
                        address: binding.address,
                        error: e.to_string(),
                    }),
                    Err(_) => Err(DeliveryFailure {
                        address: binding.address,
                        error: format!("delivery timed out after {:?}", timeout),
                    }),
                }
            });
        }

        let mut responses = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(body)) => responses.push(body),
                Ok(Err(failure)) => {
                    tracing::warn!("delivery failed: {}", failure);
                    failures.push(failure);
                }
                Err(e) => {
                    tracing::error!("delivery task failed to join: {e}");
                    failures.push(DeliveryFailure {
                        address: String::new(),
                        error: format!("delivery task panicked: {e}"),
                    });
                }
            }
        }

        (responses, failures)
    }

    /// Dispatch an inbound event to the local service.
    ///
    /// Decodes the signature, materializes one instance per declared
    /// argument type via the registry and invokes the method by name. The
    /// SAME body bytes are decoded once per argument slot - one shared
    /// payload fills every argument, so registered types should tolerate
    /// fields meant for their siblings (`#[serde(default)]`).
    pub fn invoke(&self, signature: &str, body: &[u8]) -> Result<()> {
        let parsed = self.codec.decode(signature)?;

        let local = self.local.read().expect("local service lock poisoned");
        let service = local.clone().ok_or(EventwireError::NoLocalService)?;
        drop(local);

        let mut args = Vec::with_capacity(parsed.args.len());
        for type_name in &parsed.args {
            args.push(self.registry.decode(type_name, body)?);
        }

        tracing::debug!(
            "invoking {} with {} argument(s)",
            parsed.method,
            args.len()
        );
        service.call(&parsed.method, args)
    }
}
