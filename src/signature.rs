//! Signature codec - canonical text form of a method's shape.
//!
//! A signature encodes a method name together with its ordered argument and
//! return type names:
//!
//! ```text
//! Greet:(*User, Test):(string, error)   // with return values
//! Notify:(*User)                        // without return values
//! ```
//!
//! The canonical string is the routing key for dispatch: directory lookup,
//! registration and event emission all compare it byte-for-byte. There is no
//! explicit return/no-return marker in the string - the number of
//! colon-delimited segments is the only signal.
//!
//! # Example
//!
//! ```
//! use eventwire::signature::SignatureCodec;
//!
//! let codec = SignatureCodec::new();
//! let sig = codec
//!     .encode("Greet", &["*GreetService", "*User"], &["string", "error"], true)
//!     .unwrap();
//! assert_eq!(sig, "Greet:(*User):(string, error)");
//!
//! let parsed = codec.decode(&sig).unwrap();
//! assert_eq!(parsed.method, "Greet");
//! assert_eq!(parsed.canonical(), sig);
//! ```

use crate::error::{EventwireError, Result};

/// Separator between type names inside a parenthesized group.
///
/// Splitting is literal: a type name containing `", "` is not supported.
const TYPE_SEPARATOR: &str = ", ";

/// A parsed signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Method name.
    pub method: String,
    /// Ordered argument type names (receiver already dropped).
    pub args: Vec<String>,
    /// Ordered return type names; empty when the method returns nothing.
    pub returns: Vec<String>,
}

impl Signature {
    /// Render the canonical string form.
    ///
    /// Methods without return values omit the trailing `:(...)` group, so a
    /// decoded `Method:(args):()` re-renders as `Method:(args)` - the one
    /// normalization the codec applies.
    pub fn canonical(&self) -> String {
        let args = self.args.join(TYPE_SEPARATOR);
        if self.returns.is_empty() {
            format!("{}:({})", self.method, args)
        } else {
            format!(
                "{}:({}):({})",
                self.method,
                args,
                self.returns.join(TYPE_SEPARATOR)
            )
        }
    }

    /// Whether the signature declares any return values.
    pub fn has_returns(&self) -> bool {
        !self.returns.is_empty()
    }
}

/// Encoder/decoder for canonical signature strings.
///
/// The codec is instance-scoped: all parsing state lives here, never in
/// process-wide globals. An optional local namespace is stripped from every
/// type name during encoding, so signatures never carry a process-local
/// prefix on the wire. Pointer markers (`*User`) are preserved verbatim
/// because the type registry keys on the exact spelling.
#[derive(Debug, Clone, Default)]
pub struct SignatureCodec {
    /// Local namespace prefix (without the trailing dot), if any.
    namespace: Option<String>,
}

impl SignatureCodec {
    /// Create a codec that strips no namespace.
    pub fn new() -> Self {
        Self { namespace: None }
    }

    /// Create a codec that strips `<namespace>.` from every type name.
    ///
    /// `*main.User` becomes `*User`, `main.Test` becomes `Test`.
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
        }
    }

    /// Encode a method's shape into its canonical signature string.
    ///
    /// `arg_types` is the method's full declared argument list; the first
    /// entry names the receiver and is always dropped - this is a fixed rule,
    /// not an option. An empty `arg_types` is malformed input (there is no
    /// receiver to drop). The trailing return group is emitted only when
    /// `has_returns` is set.
    pub fn encode(
        &self,
        method: &str,
        arg_types: &[&str],
        return_types: &[&str],
        has_returns: bool,
    ) -> Result<String> {
        if arg_types.is_empty() {
            return Err(EventwireError::MalformedSignature(format!(
                "method {} declares no receiver argument",
                method
            )));
        }

        let args: Vec<String> = arg_types[1..]
            .iter()
            .map(|t| self.strip_namespace(t))
            .collect();

        if !has_returns {
            return Ok(format!("{}:({})", method, args.join(TYPE_SEPARATOR)));
        }

        let returns: Vec<String> = return_types
            .iter()
            .map(|t| self.strip_namespace(t))
            .collect();

        Ok(format!(
            "{}:({}):({})",
            method,
            args.join(TYPE_SEPARATOR),
            returns.join(TYPE_SEPARATOR)
        ))
    }

    /// Decode a canonical signature string.
    ///
    /// Splits on `:`. With more than two segments the last parenthesized
    /// group is the return list; with exactly two there are no returns and
    /// the sole group is the argument list. An empty group decodes to an
    /// empty sequence (no empty-string placeholder element).
    ///
    /// # Errors
    ///
    /// Returns [`EventwireError::MalformedSignature`] when the method segment
    /// is empty, a group is missing, or a group is not wrapped in `(...)`.
    pub fn decode(&self, signature: &str) -> Result<Signature> {
        let segments: Vec<&str> = signature.split(':').collect();
        if segments.len() < 2 {
            return Err(EventwireError::MalformedSignature(format!(
                "expected at least one parenthesized group in {:?}",
                signature
            )));
        }

        let method = segments[0];
        if method.is_empty() {
            return Err(EventwireError::MalformedSignature(format!(
                "empty method name in {:?}",
                signature
            )));
        }

        let (args, returns) = if segments.len() > 2 {
            (
                parse_group(signature, segments[segments.len() - 2])?,
                parse_group(signature, segments[segments.len() - 1])?,
            )
        } else {
            (parse_group(signature, segments[1])?, Vec::new())
        };

        Ok(Signature {
            method: method.to_string(),
            args,
            returns,
        })
    }

    /// Strip the configured namespace from a type name, keeping any leading
    /// pointer marker in place.
    fn strip_namespace(&self, type_name: &str) -> String {
        let Some(ns) = &self.namespace else {
            return type_name.to_string();
        };

        let (marker, bare) = match type_name.strip_prefix('*') {
            Some(rest) => ("*", rest),
            None => ("", type_name),
        };

        match bare.strip_prefix(&format!("{}.", ns)) {
            Some(stripped) => format!("{}{}", marker, stripped),
            None => type_name.to_string(),
        }
    }
}

/// Split one `(a, b, c)` group into bare type-name tokens.
fn parse_group(signature: &str, group: &str) -> Result<Vec<String>> {
    let inner = group
        .strip_prefix('(')
        .and_then(|g| g.strip_suffix(')'))
        .ok_or_else(|| {
            EventwireError::MalformedSignature(format!(
                "group {:?} in {:?} is not parenthesized",
                group, signature
            ))
        })?;

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    Ok(inner.split(TYPE_SEPARATOR).map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_with_returns() {
        let codec = SignatureCodec::new();
        let sig = codec
            .encode(
                "Greet",
                &["*GreetService", "*User", "Test"],
                &["string", "error"],
                true,
            )
            .unwrap();
        assert_eq!(sig, "Greet:(*User, Test):(string, error)");
    }

    #[test]
    fn test_encode_without_returns_omits_trailing_group() {
        let codec = SignatureCodec::new();
        let sig = codec
            .encode("Notify", &["*NotifyService", "*User"], &[], false)
            .unwrap();
        assert_eq!(sig, "Notify:(*User)");
        assert!(!sig.ends_with(":()"));
    }

    #[test]
    fn test_encode_drops_receiver() {
        let codec = SignatureCodec::new();
        let sig = codec
            .encode("Ping", &["*PingService"], &["error"], true)
            .unwrap();
        assert_eq!(sig, "Ping:():(error)");
    }

    #[test]
    fn test_encode_empty_args_is_malformed() {
        let codec = SignatureCodec::new();
        let err = codec.encode("Ping", &[], &[], false).unwrap_err();
        assert!(matches!(err, EventwireError::MalformedSignature(_)));
    }

    #[test]
    fn test_encode_strips_namespace() {
        let codec = SignatureCodec::with_namespace("main");
        let sig = codec
            .encode(
                "Greet",
                &["*main.GreetService", "*main.User", "main.Test"],
                &["string", "error"],
                true,
            )
            .unwrap();
        assert_eq!(sig, "Greet:(*User, Test):(string, error)");
    }

    #[test]
    fn test_namespace_only_strips_matching_prefix() {
        let codec = SignatureCodec::with_namespace("main");
        let sig = codec
            .encode("Get", &["*Svc", "other.User", "string"], &[], false)
            .unwrap();
        assert_eq!(sig, "Get:(other.User, string)");
    }

    #[test]
    fn test_decode_with_returns() {
        let codec = SignatureCodec::new();
        let sig = codec.decode("Greet:(*User, Test):(string, error)").unwrap();
        assert_eq!(sig.method, "Greet");
        assert_eq!(sig.args, vec!["*User", "Test"]);
        assert_eq!(sig.returns, vec!["string", "error"]);
        assert!(sig.has_returns());
    }

    #[test]
    fn test_decode_without_returns() {
        let codec = SignatureCodec::new();
        let sig = codec.decode("Notify:(*User)").unwrap();
        assert_eq!(sig.method, "Notify");
        assert_eq!(sig.args, vec!["*User"]);
        assert!(sig.returns.is_empty());
        assert!(!sig.has_returns());
    }

    #[test]
    fn test_decode_empty_args_normalizes_to_empty_sequence() {
        let codec = SignatureCodec::new();
        let sig = codec.decode("Ping:():(error)").unwrap();
        assert!(sig.args.is_empty());
        assert_eq!(sig.returns, vec!["error"]);
    }

    #[test]
    fn test_decode_rejects_missing_group() {
        let codec = SignatureCodec::new();
        assert!(matches!(
            codec.decode("Greet").unwrap_err(),
            EventwireError::MalformedSignature(_)
        ));
    }

    #[test]
    fn test_decode_rejects_unparenthesized_group() {
        let codec = SignatureCodec::new();
        assert!(matches!(
            codec.decode("Greet:*User").unwrap_err(),
            EventwireError::MalformedSignature(_)
        ));
        assert!(matches!(
            codec.decode("Greet:(*User:string").unwrap_err(),
            EventwireError::MalformedSignature(_)
        ));
    }

    #[test]
    fn test_decode_rejects_empty_method() {
        let codec = SignatureCodec::new();
        assert!(matches!(
            codec.decode(":(*User)").unwrap_err(),
            EventwireError::MalformedSignature(_)
        ));
    }

    #[test]
    fn test_round_trip_stability() {
        let codec = SignatureCodec::new();
        for sig in [
            "Greet:(*User, Test):(string, error)",
            "Notify:(*User)",
            "Ping:():(error)",
            "Empty:()",
        ] {
            let decoded = codec.decode(sig).unwrap();
            assert_eq!(decoded.canonical(), sig);
            // Second pass through the codec stays fixed.
            let again = codec.decode(&decoded.canonical()).unwrap();
            assert_eq!(again, decoded);
        }
    }

    #[test]
    fn test_empty_returns_group_normalizes_to_no_returns_form() {
        let codec = SignatureCodec::new();
        let decoded = codec.decode("Notify:(*User):()").unwrap();
        assert!(decoded.returns.is_empty());
        assert_eq!(decoded.canonical(), "Notify:(*User)");
    }

    #[test]
    fn test_pointer_markers_preserved() {
        let codec = SignatureCodec::with_namespace("main");
        let sig = codec.decode("Greet:(*User):(string)").unwrap();
        assert_eq!(sig.args[0], "*User");
    }
}
