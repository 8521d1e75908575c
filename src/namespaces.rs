//! XML namespace handling
//!
//! This module tracks the namespace declarations found on an element and
//! answers the one question the flattener needs: which prefixes name the
//! XML Schema namespace.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Prefixes treated as the XSD namespace when a schema declares none
pub const CONVENTIONAL_XSD_PREFIXES: [&str; 2] = ["xs", "xsd"];

/// Namespace declarations in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI, in declaration order
    prefixes: IndexMap<String, String>,
    /// Default namespace (no prefix)
    default_namespace: Option<String>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Iterate over prefix declarations in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// True if no declaration has been recorded
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }

    /// Whether a type reference prefix names the XSD namespace.
    ///
    /// An empty prefix matches only when the default namespace is XSD.
    /// Without any binding for the XSD namespace, the conventional `xs`
    /// and `xsd` prefixes are assumed.
    pub fn is_xsd_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return self.default_namespace.as_deref() == Some(XSD_NAMESPACE);
        }
        match self.get_namespace(prefix) {
            Some(ns) => ns == XSD_NAMESPACE,
            None => !self.binds_xsd() && CONVENTIONAL_XSD_PREFIXES.contains(&prefix),
        }
    }

    fn binds_xsd(&self) -> bool {
        self.prefixes.values().any(|ns| ns == XSD_NAMESPACE)
    }
}
