//! Limits applied while decoding schema documents
//!
//! The schema tree and its traversal are recursive, so input size and
//! nesting depth are bounded before a tree is handed to the walker.

use crate::error::{Error, Result};

/// Decoder limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum input size in bytes
    pub max_size: usize,

    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Maximum number of XML elements in one document
    pub max_elements: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_size: 100 * 1024 * 1024, // 100 MB
            max_depth: 256,
            max_elements: 1_000_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_size: 10 * 1024 * 1024, // 10 MB
            max_depth: 64,
            max_elements: 100_000,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_size: 1024 * 1024 * 1024, // 1 GB
            max_depth: 4096,
            max_elements: 100_000_000,
        }
    }

    /// Check if the input size is within limits
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_size {
            Err(Error::LimitExceeded(format!(
                "Input size {} bytes exceeds maximum {} bytes",
                size, self.max_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if nesting depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(Error::LimitExceeded(format!(
                "Nesting depth {} exceeds maximum {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the element count is within limits
    pub fn check_elements(&self, count: usize) -> Result<()> {
        if count > self.max_elements {
            Err(Error::LimitExceeded(format!(
                "Element count {} exceeds maximum {}",
                count, self.max_elements
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_depth, 256);
        assert!(limits.check_depth(100).is_ok());
        assert!(limits.check_depth(300).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_depth < Limits::default().max_depth);
        assert!(limits.check_depth(100).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_depth > Limits::default().max_depth);
        assert!(limits.check_depth(1000).is_ok());
    }

    #[test]
    fn test_check_size() {
        let limits = Limits::default();
        assert!(limits.check_size(1024).is_ok());
        assert!(matches!(
            limits.check_size(200 * 1024 * 1024),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_check_elements() {
        let limits = Limits::strict();
        assert!(limits.check_elements(10).is_ok());
        assert!(limits.check_elements(200_000).is_err());
    }
}
