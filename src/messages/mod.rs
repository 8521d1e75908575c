//! Flattened message descriptions
//!
//! A [`Message`] is one record type and its [`MessageItem`]s are its fields,
//! in XSD declaration order. They are independent of any generated-code
//! syntax and serialize to camelCase JSON for downstream generators, with
//! fields under `messageItems` and root messages flagged `isNamed`.

mod flatten;
mod translate;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use crate::model::Presence;
pub use flatten::flatten;
pub use translate::{TargetFormat, TypeMapping, TypeTable};

/// A flattened record type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Namespace prefix for placeholder messages of qualified references
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,
    /// Message name, unique within its package
    pub name: String,
    /// Fields in declaration order
    #[serde(rename = "messageItems", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MessageItem>,
    /// Documentation text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Schema-level named type rather than an inline one
    #[serde(rename = "isNamed", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_root: bool,
}

impl Message {
    /// Create an empty message
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// `package.name`, or just the name without a package
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Find a field by name
    pub fn item(&self, name: &str) -> Option<&MessageItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// One field of a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    pub name: String,
    /// Target type name or the qualified name of another message
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
    /// Format hint or regex pattern
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_optional: Option<Presence>,
    /// Raw `minOccurs`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub min_occurs: String,
    /// Raw `maxOccurs`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub max_occurs: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Enumerated literals
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub min_inclusive: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub max_inclusive: String,
}

impl MessageItem {
    /// Create an item with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Render messages as pretty-printed JSON
pub fn to_json(messages: &[Message]) -> Result<String> {
    Ok(serde_json::to_string_pretty(messages)?)
}
