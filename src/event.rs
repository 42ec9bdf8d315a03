//! Event - the wire unit.

use serde::{Deserialize, Serialize};

/// A signature plus an opaque serialized payload.
///
/// The signature is the routing key; the body is interpreted only by the
/// receiving process, which decodes it into the argument types the
/// signature declares (resolved through the type registry). Field names in
/// the body match the target type's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Canonical signature string, matched byte-for-byte against bindings.
    pub signature: String,
    /// Opaque serialized payload.
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
}

impl Event {
    /// Build an event from a signature and payload bytes.
    pub fn new(signature: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            signature: signature.into(),
            body: body.into(),
        }
    }
}
