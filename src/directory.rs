//! Service directory - ordered (signature, address) bindings.
//!
//! Every registered handler method contributes one binding. Bindings are
//! matched by exact signature equality, never by position, and several
//! bindings may share one signature (multiple services listening for the
//! same event) - dispatch fans out to all of them.

use std::sync::RwLock;

/// Association between a canonical signature and the address where a
/// matching handler lives.
///
/// Immutable once created; bindings live until the owning process shuts
/// down (there is no deregistration path for bindings, unlike type
/// registrations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBinding {
    /// Canonical signature string, the routing key.
    pub signature: String,
    /// Transport address of the handler's host process.
    pub address: String,
}

/// Ordered collection of service bindings.
///
/// Insertion order defines iteration order; lookups return a point-in-time
/// snapshot so an in-flight fan-out never observes a half-applied mutation.
#[derive(Default)]
pub struct ServiceDirectory {
    bindings: RwLock<Vec<ServiceBinding>>,
}

impl ServiceDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(Vec::new()),
        }
    }

    /// Append a binding. Duplicate signatures are allowed.
    pub fn insert(&self, binding: ServiceBinding) {
        let mut bindings = self.bindings.write().expect("directory lock poisoned");
        bindings.push(binding);
    }

    /// Snapshot of every binding whose signature equals `signature` exactly.
    pub fn matches(&self, signature: &str) -> Vec<ServiceBinding> {
        let bindings = self.bindings.read().expect("directory lock poisoned");
        bindings
            .iter()
            .filter(|b| b.signature == signature)
            .cloned()
            .collect()
    }

    /// Snapshot of all bindings, in registration order.
    pub fn bindings(&self) -> Vec<ServiceBinding> {
        let bindings = self.bindings.read().expect("directory lock poisoned");
        bindings.clone()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        let bindings = self.bindings.read().expect("directory lock poisoned");
        bindings.len()
    }

    /// Whether the directory holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(signature: &str, address: &str) -> ServiceBinding {
        ServiceBinding {
            signature: signature.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_insert_preserves_order() {
        let directory = ServiceDirectory::new();
        directory.insert(binding("A:(x)", "http://a"));
        directory.insert(binding("B:(y)", "http://b"));
        directory.insert(binding("C:(z)", "http://c"));

        let all = directory.bindings();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].signature, "A:(x)");
        assert_eq!(all[1].signature, "B:(y)");
        assert_eq!(all[2].signature, "C:(z)");
    }

    #[test]
    fn test_matches_by_exact_equality() {
        let directory = ServiceDirectory::new();
        directory.insert(binding("Greet:(*User):(string, error)", "http://a"));
        directory.insert(binding("Greet:(*User)", "http://b"));

        let matched = directory.matches("Greet:(*User):(string, error)");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].address, "http://a");
    }

    #[test]
    fn test_duplicate_signatures_all_match() {
        let directory = ServiceDirectory::new();
        directory.insert(binding("Greet:(User):(string)", "http://a"));
        directory.insert(binding("Other:(x)", "http://z"));
        directory.insert(binding("Greet:(User):(string)", "http://b"));

        let matched = directory.matches("Greet:(User):(string)");
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].address, "http://a");
        assert_eq!(matched[1].address, "http://b");
    }

    #[test]
    fn test_no_match_is_empty() {
        let directory = ServiceDirectory::new();
        directory.insert(binding("A:(x)", "http://a"));
        assert!(directory.matches("B:(y)").is_empty());
    }

    #[test]
    fn test_len_and_is_empty() {
        let directory = ServiceDirectory::new();
        assert!(directory.is_empty());
        directory.insert(binding("A:(x)", "http://a"));
        assert_eq!(directory.len(), 1);
        assert!(!directory.is_empty());
    }
}
