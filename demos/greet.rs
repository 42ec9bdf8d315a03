//! Greet demo - a service that events itself over loopback HTTP.
//!
//! This demo demonstrates:
//! - Registering a payload type so it can be constructed by name
//! - Registering a service's handler table at its own HTTP address
//! - Emitting an event whose signature routes back to the handler
//!
//! Run with:
//!
//! ```bash
//! cargo run --example greet
//! ```

use std::any::Any;
use std::sync::Arc;

use serde::Deserialize;

use eventwire::{Dispatcher, Event, EventServer, EventwireError, MethodSpec, Result, Service};

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct User {
    name: String,
    age: u32,
}

struct GreetService;

impl Service for GreetService {
    fn methods(&self) -> Vec<MethodSpec> {
        vec![MethodSpec::new(
            "Greet",
            &["*GreetService", "*User"],
            &["string", "error"],
        )]
    }

    fn call(&self, method: &str, mut args: Vec<Box<dyn Any + Send>>) -> Result<()> {
        match method {
            "Greet" => {
                let user = *args
                    .remove(0)
                    .downcast::<User>()
                    .map_err(|_| EventwireError::UnknownMethod("Greet: bad argument".into()))?;
                println!("Hello {} I am {}", user.name, user.age);
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
    dispatcher.register_type::<User>("*User");

    // Bind first so the emitted event finds a live endpoint.
    let server = EventServer::bind(dispatcher.clone(), "127.0.0.1:5002").await?;
    let addr = server.local_addr()?;
    tokio::spawn(server.run());

    dispatcher.register(Arc::new(GreetService), &format!("http://{addr}"))?;

    dispatcher
        .emit(&Event::new(
            "Greet:(*User):(string, error)",
            br#"{"name":"Ewan","age":29}"#.to_vec(),
        ))
        .await?;

    Ok(())
}
