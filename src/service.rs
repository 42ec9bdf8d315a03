//! Service trait - the explicit handler table.
//!
//! Rather than runtime reflection, a service describes its own methods
//! ([`Service::methods`]) and invokes them by name with type-erased,
//! already-decoded arguments ([`Service::call`]). The dispatcher drives
//! both halves: method descriptions at registration time, invocation on
//! inbound events.
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use eventwire::service::{MethodSpec, Service};
//! use eventwire::error::{EventwireError, Result};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct User {
//!     name: String,
//! }
//!
//! struct GreetService;
//!
//! impl Service for GreetService {
//!     fn methods(&self) -> Vec<MethodSpec> {
//!         vec![MethodSpec::new(
//!             "Greet",
//!             &["*GreetService", "*User"],
//!             &["string", "error"],
//!         )]
//!     }
//!
//!     fn call(&self, method: &str, mut args: Vec<Box<dyn Any + Send>>) -> Result<()> {
//!         match method {
//!             "Greet" => {
//!                 let user = args.remove(0).downcast::<User>().map_err(|_| {
//!                     EventwireError::UnknownMethod("Greet: bad argument".into())
//!                 })?;
//!                 println!("Hello {}", user.name);
//!                 Ok(())
//!             }
//!             other => Err(EventwireError::UnknownMethod(other.to_string())),
//!         }
//!     }
//! }
//! ```

use std::any::Any;

use crate::error::Result;

/// Declared shape of one handler method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name.
    pub name: String,
    /// Full declared argument type names. The first entry names the service
    /// type itself (the receiver slot); the codec drops it when encoding.
    pub args: Vec<String>,
    /// Declared return type names; empty for methods returning nothing.
    pub returns: Vec<String>,
}

impl MethodSpec {
    /// Build a method spec from name and type-name lists.
    pub fn new(name: &str, args: &[&str], returns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            returns: returns.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether the method declares any return values.
    pub fn has_returns(&self) -> bool {
        !self.returns.is_empty()
    }
}

/// A local service exposing named, typed handler methods.
///
/// Implementations supply the method table the dispatcher registers from,
/// and dynamic by-name invocation for inbound events. `call` receives one
/// decoded instance per declared argument (receiver excluded), in
/// declaration order, and must fail with
/// [`EventwireError::UnknownMethod`](crate::error::EventwireError::UnknownMethod)
/// for names missing from the table.
pub trait Service: Send + Sync + 'static {
    /// Describe the methods this service exposes.
    fn methods(&self) -> Vec<MethodSpec>;

    /// Invoke a method by name with decoded arguments.
    fn call(&self, method: &str, args: Vec<Box<dyn Any + Send>>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventwireError;

    struct NullService;

    impl Service for NullService {
        fn methods(&self) -> Vec<MethodSpec> {
            vec![
                MethodSpec::new("Ping", &["*NullService"], &["error"]),
                MethodSpec::new("Fire", &["*NullService", "*Shot"], &[]),
            ]
        }

        fn call(&self, method: &str, _args: Vec<Box<dyn Any + Send>>) -> Result<()> {
            match method {
                "Ping" | "Fire" => Ok(()),
                other => Err(EventwireError::UnknownMethod(other.to_string())),
            }
        }
    }

    #[test]
    fn test_method_spec_has_returns() {
        let svc = NullService;
        let methods = svc.methods();
        assert!(methods[0].has_returns());
        assert!(!methods[1].has_returns());
    }

    #[test]
    fn test_unknown_method_fails() {
        let svc = NullService;
        let err = svc.call("Missing", Vec::new()).unwrap_err();
        assert!(matches!(err, EventwireError::UnknownMethod(name) if name == "Missing"));
    }
}
