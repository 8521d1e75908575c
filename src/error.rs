//! Error types for xsdmsg
//!
//! This module defines all error types used throughout the library.
//! Decoding failures and structural flattening failures carry their own
//! context structs so callers can locate the offending input.

use std::fmt;
use thiserror::Error;

/// Result type alias using xsdmsg Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdmsg operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes are not a well-formed XSD document
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Flattening met a node it cannot place
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Encoding error (schema tree to XML)
    #[error("encoding error: {0}")]
    Encode(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed XML or an unexpected document shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Error message
    pub message: String,
    /// Byte offset in the input where decoding stopped
    pub position: Option<u64>,
}

impl DecodeError {
    /// Create a new decode error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Set the byte offset
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(position) = self.position {
            write!(f, " at byte {}", position)?;
        }

        Ok(())
    }
}

impl std::error::Error for DecodeError {}

/// A schema node found in a context the flattener cannot interpret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    /// Kind of the offending node (e.g. `attribute`)
    pub kind: &'static str,
    /// One-line description of the offending node
    pub node: String,
    /// What was missing
    pub reason: String,
}

impl StructuralError {
    /// Create a new structural error
    pub fn new(kind: &'static str, node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            node: node.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.node)
    }
}

impl std::error::Error for StructuralError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::new("mismatched end tag").with_position(42);

        let msg = format!("{}", err);
        assert!(msg.contains("mismatched end tag"));
        assert!(msg.contains("at byte 42"));
    }

    #[test]
    fn test_decode_error_without_position() {
        let err = DecodeError::new("no root element");
        assert_eq!(err.to_string(), "no root element");
    }

    #[test]
    fn test_structural_error_display() {
        let err = StructuralError::new("attribute", "Attribute: id", "attribute but no current message");

        let msg = format!("{}", Error::from(err));
        assert!(msg.starts_with("structural error:"));
        assert!(msg.contains("attribute but no current message"));
        assert!(msg.contains("Attribute: id"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = DecodeError::new("test").into();
        assert!(matches!(err, Error::Decode(_)));
    }
}
