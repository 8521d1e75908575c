//! XSD schema tree model
//!
//! One struct per modelled XSD construct. Containment is a strict tree:
//! every child is owned by its parent. Attributes missing from the source
//! decode to empty strings, so `""` always means "not stated".
//!
//! [`Node`] borrows any one of these structs and is what the traversal
//! engine hands to visitors.

mod decode;
mod encode;
mod occurs;

use serde::{Deserialize, Serialize};

use crate::namespaces::NamespaceContext;

pub use occurs::{is_repeated, occurs, presence, Presence};

/// Render a node as a short one-line label
pub trait Describe {
    /// Human readable summary carrying the node's identifying attribute
    fn describe(&self) -> String;
}

/// The `schema` root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Prefix used on the schema's own element names (`xs` in `xs:schema`)
    pub prefix: String,
    /// Namespace declarations made on the root element
    pub namespaces: NamespaceContext,
    /// `targetNamespace` attribute
    pub target_namespace: String,
    /// `import` declarations, never followed
    pub imports: Vec<Import>,
    /// Top-level named complex types
    pub complex_types: Vec<ComplexType>,
    /// Top-level named simple types
    pub simple_types: Vec<SimpleType>,
    /// Top-level element declarations
    pub elements: Vec<Element>,
}

/// `import`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub namespace: String,
    pub schema_location: String,
}

/// `complexType`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexType {
    /// Empty for anonymous inline types
    pub name: String,
    pub annotation: Option<Annotation>,
    pub sequence: Option<Sequence>,
    pub complex_content: Option<ComplexContent>,
    pub simple_content: Option<SimpleContent>,
    pub attributes: Vec<Attribute>,
    pub choice: Option<Choice>,
}

/// `simpleType`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleType {
    /// Empty for anonymous inline types
    pub name: String,
    pub annotation: Option<Annotation>,
    pub restriction: Option<Restriction>,
}

/// `restriction` with the facets this crate models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub base: String,
    pub enumerations: Vec<Enumeration>,
    pub pattern: Option<Pattern>,
    pub min_inclusive: Option<MinInclusive>,
    pub max_inclusive: Option<MaxInclusive>,
}

/// `enumeration` facet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    pub value: String,
}

/// `pattern` facet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub value: String,
}

/// `minInclusive` facet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinInclusive {
    pub value: String,
}

/// `maxInclusive` facet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxInclusive {
    pub value: String,
}

/// `sequence`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub min_occurs: String,
    pub max_occurs: String,
    pub elements: Vec<Element>,
    pub choice: Option<Box<Choice>>,
}

/// `choice`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub min_occurs: String,
    pub max_occurs: String,
    pub elements: Vec<Element>,
    pub sequence: Option<Box<Sequence>>,
}

/// `element`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub min_occurs: String,
    pub max_occurs: String,
    pub complex_type: Option<Box<ComplexType>>,
    pub simple_type: Option<Box<SimpleType>>,
    pub annotation: Option<Annotation>,
}

impl Element {
    /// True if more than one occurrence is allowed
    pub fn is_repeated(&self) -> bool {
        is_repeated(&self.max_occurs)
    }

    /// Mandatory/optional marker derived from `minOccurs`
    pub fn presence(&self) -> Option<Presence> {
        presence(&self.min_occurs)
    }
}

/// `attribute`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// `use` attribute: `required`, `optional` or `prohibited`
    #[serde(rename = "use")]
    pub usage: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub simple_type: Option<Box<SimpleType>>,
    pub annotation: Option<Annotation>,
}

impl Attribute {
    /// Attributes never repeat
    pub fn is_repeated(&self) -> bool {
        false
    }

    /// Mandatory only when `use="required"`
    pub fn presence(&self) -> Option<Presence> {
        (self.usage == "required").then_some(Presence::Mandatory)
    }
}

/// `complexContent`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexContent {
    pub extension: Option<Extension>,
}

/// `simpleContent`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleContent {
    pub extension: Option<Extension>,
}

/// `extension` inside complex or simple content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub id: String,
    pub base: String,
    pub sequence: Option<Sequence>,
    pub attributes: Vec<Attribute>,
}

/// `annotation`, reduced to its first `documentation` text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub documentation: String,
}

impl Describe for Schema {
    fn describe(&self) -> String {
        if self.target_namespace.is_empty() {
            "Schema".to_string()
        } else {
            format!("Schema {}", self.target_namespace)
        }
    }
}

impl Describe for Import {
    fn describe(&self) -> String {
        format!(
            "Import: Namespace:{}, Location:{}",
            self.namespace, self.schema_location
        )
    }
}

impl Describe for ComplexType {
    fn describe(&self) -> String {
        format!("ComplexType: {}", self.name)
    }
}

impl Describe for SimpleType {
    fn describe(&self) -> String {
        format!("SimpleType: {}", self.name)
    }
}

impl Describe for Restriction {
    fn describe(&self) -> String {
        format!("Restriction: {}", self.base)
    }
}

impl Describe for Enumeration {
    fn describe(&self) -> String {
        format!("Enumeration: {}", self.value)
    }
}

impl Describe for Pattern {
    fn describe(&self) -> String {
        format!("Pattern: {}", self.value)
    }
}

impl Describe for MinInclusive {
    fn describe(&self) -> String {
        format!("MinInclusive: {}", self.value)
    }
}

impl Describe for MaxInclusive {
    fn describe(&self) -> String {
        format!("MaxInclusive: {}", self.value)
    }
}

impl Describe for Sequence {
    fn describe(&self) -> String {
        format!(
            "Sequence: {} {}",
            self.name,
            occurs(&self.min_occurs, &self.max_occurs)
        )
    }
}

impl Describe for Choice {
    fn describe(&self) -> String {
        format!(
            "Choice: {} {}",
            self.name,
            occurs(&self.min_occurs, &self.max_occurs)
        )
    }
}

impl Describe for Element {
    fn describe(&self) -> String {
        format!(
            "Element: {} ({}) {}",
            self.name,
            self.type_name,
            occurs(&self.min_occurs, &self.max_occurs)
        )
    }
}

impl Describe for Attribute {
    fn describe(&self) -> String {
        format!("Attribute: {}", self.name)
    }
}

impl Describe for ComplexContent {
    fn describe(&self) -> String {
        "ComplexContent".to_string()
    }
}

impl Describe for SimpleContent {
    fn describe(&self) -> String {
        "SimpleContent".to_string()
    }
}

impl Describe for Extension {
    fn describe(&self) -> String {
        format!("Extension: Base:{}", self.base)
    }
}

impl Describe for Annotation {
    fn describe(&self) -> String {
        format!("Annotation: {}", self.documentation)
    }
}

/// A borrowed schema node of any kind
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Schema(&'a Schema),
    Import(&'a Import),
    ComplexType(&'a ComplexType),
    SimpleType(&'a SimpleType),
    Restriction(&'a Restriction),
    Enumeration(&'a Enumeration),
    Pattern(&'a Pattern),
    MinInclusive(&'a MinInclusive),
    MaxInclusive(&'a MaxInclusive),
    Sequence(&'a Sequence),
    Choice(&'a Choice),
    Element(&'a Element),
    Attribute(&'a Attribute),
    ComplexContent(&'a ComplexContent),
    SimpleContent(&'a SimpleContent),
    Extension(&'a Extension),
    Annotation(&'a Annotation),
}

impl<'a> Node<'a> {
    /// XSD local name of the node kind
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Schema(_) => "schema",
            Node::Import(_) => "import",
            Node::ComplexType(_) => "complexType",
            Node::SimpleType(_) => "simpleType",
            Node::Restriction(_) => "restriction",
            Node::Enumeration(_) => "enumeration",
            Node::Pattern(_) => "pattern",
            Node::MinInclusive(_) => "minInclusive",
            Node::MaxInclusive(_) => "maxInclusive",
            Node::Sequence(_) => "sequence",
            Node::Choice(_) => "choice",
            Node::Element(_) => "element",
            Node::Attribute(_) => "attribute",
            Node::ComplexContent(_) => "complexContent",
            Node::SimpleContent(_) => "simpleContent",
            Node::Extension(_) => "extension",
            Node::Annotation(_) => "annotation",
        }
    }

    fn as_describe(&self) -> &'a dyn Describe {
        match *self {
            Node::Schema(n) => n,
            Node::Import(n) => n,
            Node::ComplexType(n) => n,
            Node::SimpleType(n) => n,
            Node::Restriction(n) => n,
            Node::Enumeration(n) => n,
            Node::Pattern(n) => n,
            Node::MinInclusive(n) => n,
            Node::MaxInclusive(n) => n,
            Node::Sequence(n) => n,
            Node::Choice(n) => n,
            Node::Element(n) => n,
            Node::Attribute(n) => n,
            Node::ComplexContent(n) => n,
            Node::SimpleContent(n) => n,
            Node::Extension(n) => n,
            Node::Annotation(n) => n,
        }
    }
}

impl Describe for Node<'_> {
    fn describe(&self) -> String {
        self.as_describe().describe()
    }
}
