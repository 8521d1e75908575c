//! Occurrence bounds helpers
//!
//! `minOccurs`/`maxOccurs` are kept as raw strings in the model; these
//! functions interpret them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mandatory/optional marker of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    /// Must be present
    #[serde(rename = "M")]
    Mandatory,
    /// May be absent
    #[serde(rename = "O")]
    Optional,
}

impl Presence {
    /// Single-letter code, `M` or `O`
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Mandatory => "M",
            Presence::Optional => "O",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summarize an occurrence pair as a short label
pub fn occurs(min_occurs: &str, max_occurs: &str) -> String {
    match (min_occurs, max_occurs) {
        ("", "") => String::new(),
        ("0", "") => "optional".to_string(),
        ("1", "1") => "1:1".to_string(),
        ("0", "unbounded") => "0:N".to_string(),
        ("1", "unbounded") => "1:N".to_string(),
        (min, max) => format!("{}:{}", min, max),
    }
}

/// True if `maxOccurs` allows more than one occurrence
pub fn is_repeated(max_occurs: &str) -> bool {
    max_occurs == "unbounded" || max_occurs.parse::<i64>().map_or(false, |n| n > 1)
}

/// Mandatory/optional marker derived from `minOccurs`
pub fn presence(min_occurs: &str) -> Option<Presence> {
    match min_occurs {
        "" => None,
        "0" => Some(Presence::Optional),
        _ => Some(Presence::Mandatory),
    }
}
