//! Type registry - construct payload types by name at runtime.
//!
//! Inbound events carry type names, not types: the registry maps the exact
//! spelling used in signatures (pointer markers included, so `"*User"` and
//! `"User"` are distinct keys) to a factory that produces a zero-valued
//! instance and a decoder that deserializes a JSON payload into that type.
//!
//! # Example
//!
//! ```
//! use eventwire::registry::TypeRegistry;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let registry = TypeRegistry::new();
//! registry.register::<User>("*User");
//!
//! let instance = registry.decode("*User", br#"{"name":"Ewan","age":29}"#).unwrap();
//! let user = instance.downcast::<User>().unwrap();
//! assert_eq!(user.name, "Ewan");
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::RwLock;

use serde::de::DeserializeOwned;

use crate::error::{EventwireError, Result};

/// A type-erased instance produced by the registry.
pub type Instance = Box<dyn Any + Send>;

/// Factory closures for one registered type.
struct TypeEntry {
    make: Box<dyn Fn() -> Instance + Send + Sync>,
    decode: Box<dyn Fn(&[u8]) -> Result<Instance> + Send + Sync>,
}

/// Runtime name-to-factory table.
///
/// Safe for concurrent registration and lookup: mutation takes the write
/// lock, lookups clone nothing and run under the read lock.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, TypeEntry>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Register a type under `name`.
    ///
    /// Registering the same name twice silently overwrites the previous
    /// entry (last write wins). Payload types should tolerate missing
    /// fields (`#[serde(default)]`) because inbound dispatch decodes one
    /// shared body into every argument slot.
    pub fn register<T>(&self, name: &str)
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        let entry = TypeEntry {
            make: Box::new(|| Box::new(T::default()) as Instance),
            decode: Box::new(move |body| {
                let value: T = serde_json::from_slice(body).map_err(|source| {
                    EventwireError::Decode {
                        type_name: std::any::type_name::<T>().to_string(),
                        source,
                    }
                })?;
                Ok(Box::new(value) as Instance)
            }),
        };

        let mut types = self.types.write().expect("type registry lock poisoned");
        types.insert(name.to_string(), entry);
    }

    /// Remove a registered type.
    ///
    /// Subsequent [`make_instance`](Self::make_instance) and
    /// [`decode`](Self::decode) calls for `name` fail.
    pub fn deregister(&self, name: &str) {
        let mut types = self.types.write().expect("type registry lock poisoned");
        types.remove(name);
    }

    /// Whether `name` is currently registered.
    pub fn contains(&self, name: &str) -> bool {
        let types = self.types.read().expect("type registry lock poisoned");
        types.contains_key(name)
    }

    /// Produce a fresh zero-valued instance of the type registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EventwireError::UnregisteredType`] for an unknown name.
    pub fn make_instance(&self, name: &str) -> Result<Instance> {
        let types = self.types.read().expect("type registry lock poisoned");
        let entry = types
            .get(name)
            .ok_or_else(|| EventwireError::UnregisteredType(name.to_string()))?;
        Ok((entry.make)())
    }

    /// Decode a JSON payload into the type registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EventwireError::UnregisteredType`] for an unknown name, or
    /// [`EventwireError::Decode`] when the body does not fit the type.
    pub fn decode(&self, name: &str, body: &[u8]) -> Result<Instance> {
        let types = self.types.read().expect("type registry lock poisoned");
        let entry = types
            .get(name)
            .ok_or_else(|| EventwireError::UnregisteredType(name.to_string()))?;
        (entry.decode)(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Default, Debug, PartialEq)]
    #[serde(default)]
    struct User {
        name: String,
        age: u32,
    }

    #[derive(Deserialize, Default, Debug, PartialEq)]
    #[serde(default)]
    struct Order {
        id: String,
    }

    #[test]
    fn test_make_instance_yields_zero_value() {
        let registry = TypeRegistry::new();
        registry.register::<User>("*User");

        let instance = registry.make_instance("*User").unwrap();
        let user = instance.downcast::<User>().unwrap();
        assert_eq!(*user, User::default());
    }

    #[test]
    fn test_make_instance_unregistered_fails() {
        let registry = TypeRegistry::new();
        let err = registry.make_instance("*User").unwrap_err();
        assert!(matches!(err, EventwireError::UnregisteredType(name) if name == "*User"));
    }

    #[test]
    fn test_decode_payload() {
        let registry = TypeRegistry::new();
        registry.register::<User>("*User");

        let instance = registry
            .decode("*User", br#"{"name":"Ewan","age":29}"#)
            .unwrap();
        let user = instance.downcast::<User>().unwrap();
        assert_eq!(user.name, "Ewan");
        assert_eq!(user.age, 29);
    }

    #[test]
    fn test_decode_tolerates_missing_and_unknown_fields() {
        let registry = TypeRegistry::new();
        registry.register::<Order>("*Order");

        // Body shaped for a different type still decodes; absent fields
        // keep their zero value.
        let instance = registry
            .decode("*Order", br#"{"name":"Ewan","age":29}"#)
            .unwrap();
        let order = instance.downcast::<Order>().unwrap();
        assert_eq!(order.id, "");
    }

    #[test]
    fn test_decode_invalid_json_fails() {
        let registry = TypeRegistry::new();
        registry.register::<User>("*User");

        let err = registry.decode("*User", b"not json").unwrap_err();
        assert!(matches!(err, EventwireError::Decode { .. }));
    }

    #[test]
    fn test_deregister_removes_entry() {
        let registry = TypeRegistry::new();
        registry.register::<User>("*User");
        assert!(registry.contains("*User"));

        registry.deregister("*User");
        assert!(!registry.contains("*User"));
        assert!(registry.make_instance("*User").is_err());
    }

    #[test]
    fn test_reregister_overwrites() {
        let registry = TypeRegistry::new();
        registry.register::<User>("*Thing");
        registry.register::<Order>("*Thing");

        let instance = registry.decode("*Thing", br#"{"id":"abc123"}"#).unwrap();
        assert!(instance.downcast::<Order>().is_ok());
    }

    #[test]
    fn test_pointer_marker_is_part_of_the_key() {
        let registry = TypeRegistry::new();
        registry.register::<User>("*User");

        assert!(registry.make_instance("User").is_err());
        assert!(registry.make_instance("*User").is_ok());
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        use std::sync::Arc;

        let registry = Arc::new(TypeRegistry::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                let name = format!("*User{}", i);
                registry.register::<User>(&name);
                assert!(registry.make_instance(&name).is_ok());
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
