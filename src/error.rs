//! Error types for eventwire.

use thiserror::Error;

/// Main error type for all eventwire operations.
#[derive(Debug, Error)]
pub enum EventwireError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (event envelope).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Signature string could not be parsed into a canonical form.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Type name looked up in the registry was never registered.
    #[error("type not registered: {0}")]
    UnregisteredType(String),

    /// Invoke target has no method by the requested name.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Payload body could not be decoded into an argument type.
    #[error("failed to decode payload into `{type_name}`: {source}")]
    Decode {
        /// Registered name of the argument type.
        type_name: String,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Inbound event arrived before any local service was registered.
    #[error("no local service registered for inbound dispatch")]
    NoLocalService,

    /// Binding address could not be parsed into a deliverable URI.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Transport-level exchange failed (connect, handshake, request).
    #[error("transport error: {0}")]
    Transport(String),

    /// One or more deliveries in a fan-out failed.
    #[error("delivery failed for {} binding(s)", .0.len())]
    Delivery(Vec<DeliveryFailure>),
}

/// Record of a single failed delivery within a fan-out.
///
/// A failure never aborts sibling deliveries; it is collected and
/// surfaced in the aggregate result instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Address of the binding whose delivery failed.
    pub address: String,
    /// Human-readable description of what went wrong.
    pub error: String,
}

impl std::fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.address, self.error)
    }
}

/// Result type alias using EventwireError.
pub type Result<T> = std::result::Result<T, EventwireError>;
