//! XSD primitive type translation tables
//!
//! A [`TypeTable`] is built for one flatten call from the requested
//! [`TargetFormat`] and only read afterwards.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target format selecting the translation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// Protocol buffer scalar types
    Protobuf,
    /// JSON schema types with format hints
    Json,
    /// No translation, XSD names pass through
    #[default]
    Identity,
}

impl FromStr for TargetFormat {
    type Err = Infallible;

    /// Unknown names select [`TargetFormat::Identity`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "protobuf" => TargetFormat::Protobuf,
            "json" => TargetFormat::Json,
            _ => TargetFormat::Identity,
        })
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::Protobuf => "protobuf",
            TargetFormat::Json => "json",
            TargetFormat::Identity => "identity",
        };
        f.write_str(name)
    }
}

/// Translation of one XSD primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeMapping {
    /// Target type name
    pub type_name: &'static str,
    /// Format hint, e.g. `date-time`
    pub format: Option<&'static str>,
    /// Implied lower bound
    pub min_inclusive: Option<&'static str>,
    /// Implied upper bound
    pub max_inclusive: Option<&'static str>,
}

impl TypeMapping {
    const fn to(type_name: &'static str) -> Self {
        Self {
            type_name,
            format: None,
            min_inclusive: None,
            max_inclusive: None,
        }
    }

    const fn with_format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    const fn with_min(mut self, min: &'static str) -> Self {
        self.min_inclusive = Some(min);
        self
    }
}

/// XSD local type name to target mapping
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: HashMap<&'static str, TypeMapping>,
}

impl TypeTable {
    /// Build the table for a target format
    pub fn new(format: TargetFormat) -> Self {
        let entries: &[(&'static str, TypeMapping)] = match format {
            TargetFormat::Protobuf => &PROTOBUF[..],
            TargetFormat::Json => &JSON[..],
            TargetFormat::Identity => &[],
        };
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// Look up an XSD primitive by local name (`string`, `dateTime`, ...)
    pub fn get(&self, local_name: &str) -> Option<&TypeMapping> {
        self.entries.get(local_name)
    }

    /// Number of mapped primitives
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for the identity table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const TIMESTAMP: TypeMapping = TypeMapping::to("google.protobuf.Timestamp");

const PROTOBUF: [(&str, TypeMapping); 20] = [
    ("string", TypeMapping::to("string")),
    ("normalizedString", TypeMapping::to("string")),
    ("token", TypeMapping::to("string")),
    ("long", TypeMapping::to("int64")),
    ("int", TypeMapping::to("int64")),
    ("integer", TypeMapping::to("int64")),
    ("short", TypeMapping::to("int32")),
    ("byte", TypeMapping::to("int32")),
    ("unsignedLong", TypeMapping::to("uint64")),
    ("unsignedInt", TypeMapping::to("uint32")),
    ("positiveInteger", TypeMapping::to("int64").with_min("1")),
    ("nonNegativeInteger", TypeMapping::to("int64").with_min("0")),
    ("float", TypeMapping::to("float")),
    ("decimal", TypeMapping::to("float")),
    ("double", TypeMapping::to("double")),
    ("boolean", TypeMapping::to("bool")),
    ("date", TIMESTAMP),
    ("dateTime", TIMESTAMP),
    ("time", TIMESTAMP),
    ("duration", TypeMapping::to("google.protobuf.Duration")),
];

const JSON: [(&str, TypeMapping); 20] = [
    ("string", TypeMapping::to("string")),
    ("normalizedString", TypeMapping::to("string")),
    ("token", TypeMapping::to("string")),
    ("long", TypeMapping::to("integer")),
    ("int", TypeMapping::to("integer")),
    ("integer", TypeMapping::to("integer")),
    ("short", TypeMapping::to("integer")),
    ("byte", TypeMapping::to("integer")),
    ("unsignedLong", TypeMapping::to("integer").with_min("0")),
    ("unsignedInt", TypeMapping::to("integer").with_min("0")),
    ("positiveInteger", TypeMapping::to("integer").with_min("1")),
    ("nonNegativeInteger", TypeMapping::to("integer").with_min("0")),
    ("float", TypeMapping::to("number")),
    ("decimal", TypeMapping::to("number")),
    ("double", TypeMapping::to("number")),
    ("boolean", TypeMapping::to("boolean")),
    ("date", TypeMapping::to("string").with_format("date")),
    ("dateTime", TypeMapping::to("string").with_format("date-time")),
    ("time", TypeMapping::to("string").with_format("time")),
    ("duration", TypeMapping::to("string").with_format("duration")),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("protobuf".parse::<TargetFormat>().unwrap(), TargetFormat::Protobuf);
        assert_eq!("JSON".parse::<TargetFormat>().unwrap(), TargetFormat::Json);
        assert_eq!("avro".parse::<TargetFormat>().unwrap(), TargetFormat::Identity);
        assert_eq!("".parse::<TargetFormat>().unwrap(), TargetFormat::Identity);
        assert_eq!(TargetFormat::default(), TargetFormat::Identity);
    }

    #[test]
    fn test_protobuf_table() {
        let table = TypeTable::new(TargetFormat::Protobuf);
        assert_eq!(table.get("string").unwrap().type_name, "string");
        assert_eq!(table.get("int").unwrap().type_name, "int64");
        assert_eq!(
            table.get("dateTime").unwrap().type_name,
            "google.protobuf.Timestamp"
        );
        assert_eq!(table.get("positiveInteger").unwrap().min_inclusive, Some("1"));
        assert!(table.get("anyURI").is_none());
    }

    #[test]
    fn test_json_table_formats() {
        let table = TypeTable::new(TargetFormat::Json);
        let date = table.get("date").unwrap();
        assert_eq!(date.type_name, "string");
        assert_eq!(date.format, Some("date"));
        assert_eq!(table.get("boolean").unwrap().type_name, "boolean");
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_identity_table_is_empty() {
        let table = TypeTable::new(TargetFormat::Identity);
        assert!(table.is_empty());
        assert!(table.get("string").is_none());
    }
}
