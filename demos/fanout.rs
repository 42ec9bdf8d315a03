//! Fan-out demo - one event, two listening endpoints.
//!
//! The same signature is bound at two addresses (two inbound servers sharing
//! one dispatcher), so a single `call` delivers concurrently to both and
//! collects both acknowledgements.
//!
//! Run with:
//!
//! ```bash
//! cargo run --example fanout
//! ```

use std::any::Any;
use std::sync::Arc;

use serde::Deserialize;

use eventwire::{Dispatcher, Event, EventServer, EventwireError, MethodSpec, Result, Service};

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct Order {
    id: String,
}

struct OrderService;

impl Service for OrderService {
    fn methods(&self) -> Vec<MethodSpec> {
        vec![MethodSpec::new("PlaceOrder", &["*OrderService", "*Order"], &[])]
    }

    fn call(&self, method: &str, mut args: Vec<Box<dyn Any + Send>>) -> Result<()> {
        match method {
            "PlaceOrder" => {
                let order = *args
                    .remove(0)
                    .downcast::<Order>()
                    .map_err(|_| EventwireError::UnknownMethod("PlaceOrder: bad argument".into()))?;
                println!("placing order {}", order.id);
                Ok(())
            }
            other => Err(EventwireError::UnknownMethod(other.to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventwire=debug".into()),
        )
        .init();

    let dispatcher = Arc::new(Dispatcher::builder().build());
    dispatcher.register_type::<Order>("*Order");

    // Two inbound endpoints sharing one dispatcher.
    let first = EventServer::bind(dispatcher.clone(), "127.0.0.1:0").await?;
    let second = EventServer::bind(dispatcher.clone(), "127.0.0.1:0").await?;
    let first_addr = first.local_addr()?;
    let second_addr = second.local_addr()?;
    tokio::spawn(first.run());
    tokio::spawn(second.run());

    dispatcher.register(Arc::new(OrderService), &format!("http://{first_addr}"))?;
    dispatcher.register(Arc::new(OrderService), &format!("http://{second_addr}"))?;

    let outcome = dispatcher
        .call(&Event::new(
            "PlaceOrder:(*Order)",
            br#"{"id":"abc123"}"#.to_vec(),
        ))
        .await?;

    println!(
        "{} acknowledgement(s), {} failure(s)",
        outcome.responses.len(),
        outcome.failures.len()
    );
    for response in &outcome.responses {
        println!("response: {response}");
    }

    Ok(())
}
