//! # xsdmsg
//!
//! Decode XML Schema documents into a typed tree and flatten that tree into
//! ordered, generator-neutral message descriptions.
//!
//! ## Features
//!
//! - Lossless decoding of the common XSD subset into [`Schema`]
//! - Encoding back to XSD text ([`Schema::to_xml`])
//! - Generic depth-first traversal with parent-to-child context
//! - Flattening into [`Message`]s with protobuf or JSON type translation
//! - Protection against oversized documents ([`limits::Limits`])
//!
//! ## Example
//!
//! ```rust
//! use xsdmsg::{Schema, TargetFormat};
//!
//! let schema: Schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:complexType name="Person">
//!     <xs:sequence>
//!       <xs:element name="name" type="xs:string" minOccurs="1"/>
//!     </xs:sequence>
//!   </xs:complexType>
//! </xs:schema>"#.parse()?;
//!
//! let messages = schema.messages(TargetFormat::Protobuf)?;
//! assert_eq!(messages[0].name, "Person");
//! assert_eq!(messages[0].items[0].type_name, "string");
//! # Ok::<(), xsdmsg::Error>(())
//! ```

#![warn(clippy::all)]

pub mod documents;
pub mod error;
pub mod limits;
pub mod messages;
pub mod model;
pub mod namespaces;
pub mod traversal;

// Re-exports for convenience
pub use error::{Error, Result};
pub use messages::{flatten, Message, MessageItem, TargetFormat};
pub use model::{Describe, Node, Schema};
pub use traversal::{describe_all, tree_view, walk, walk_with_context, Traverse};

/// Version of the xsdmsg library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
