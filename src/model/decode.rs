//! Decoding the schema model from an XML element tree
//!
//! Matching is done on local names only, and unknown elements are skipped,
//! so dialects that carry extra constructs still decode.

use std::str::FromStr;

use super::*;
use crate::documents::{Document, Element as XmlElement};
use crate::error::{DecodeError, Error, Result};
use crate::limits::Limits;

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const IMPORT: &str = "import";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ANNOTATION: &str = "annotation";
    pub const DOCUMENTATION: &str = "documentation";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    // Facets
    pub const PATTERN: &str = "pattern";
    pub const ENUMERATION: &str = "enumeration";
    pub const MIN_INCLUSIVE: &str = "minInclusive";
    pub const MAX_INCLUSIVE: &str = "maxInclusive";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const ID: &str = "id";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
}

use xsd_attrs as attrs;
use xsd_elements as tags;

impl Schema {
    /// Decode a schema from raw bytes with default limits
    pub fn from_bytes(xml: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limits(xml, &Limits::default())
    }

    /// Decode a schema from raw bytes, enforcing the given limits
    pub fn from_bytes_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        let doc = Document::parse_with_limits(xml, limits)?;
        Self::from_document(&doc)
    }

    /// Decode a schema from an already parsed document
    pub fn from_document(doc: &Document) -> Result<Self> {
        let root = &doc.root;
        if root.local_name() != tags::SCHEMA {
            return Err(DecodeError::new(format!(
                "expected <schema> root element, found <{}>",
                root.local_name()
            ))
            .into());
        }

        let schema = Schema {
            prefix: root.prefix.clone().unwrap_or_default(),
            namespaces: root.namespaces.clone(),
            target_namespace: root.attribute_or_empty(attrs::TARGET_NAMESPACE),
            imports: root.find_children(tags::IMPORT).map(decode_import).collect(),
            complex_types: root
                .find_children(tags::COMPLEX_TYPE)
                .map(decode_complex_type)
                .collect(),
            simple_types: root
                .find_children(tags::SIMPLE_TYPE)
                .map(decode_simple_type)
                .collect(),
            elements: root.find_children(tags::ELEMENT).map(decode_element).collect(),
        };

        tracing::debug!(
            complex_types = schema.complex_types.len(),
            simple_types = schema.simple_types.len(),
            elements = schema.elements.len(),
            "decoded schema"
        );

        Ok(schema)
    }
}

impl FromStr for Schema {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(s.as_bytes())
    }
}

fn decode_import(el: &XmlElement) -> Import {
    Import {
        namespace: el.attribute_or_empty(attrs::NAMESPACE),
        schema_location: el.attribute_or_empty(attrs::SCHEMA_LOCATION),
    }
}

fn decode_complex_type(el: &XmlElement) -> ComplexType {
    ComplexType {
        name: el.attribute_or_empty(attrs::NAME),
        annotation: el.find_child(tags::ANNOTATION).map(decode_annotation),
        sequence: el.find_child(tags::SEQUENCE).map(decode_sequence),
        complex_content: el
            .find_child(tags::COMPLEX_CONTENT)
            .map(|cc| ComplexContent {
                extension: cc.find_child(tags::EXTENSION).map(decode_extension),
            }),
        simple_content: el.find_child(tags::SIMPLE_CONTENT).map(|sc| SimpleContent {
            extension: sc.find_child(tags::EXTENSION).map(decode_extension),
        }),
        attributes: el.find_children(tags::ATTRIBUTE).map(decode_attribute).collect(),
        choice: el.find_child(tags::CHOICE).map(decode_choice),
    }
}

fn decode_simple_type(el: &XmlElement) -> SimpleType {
    SimpleType {
        name: el.attribute_or_empty(attrs::NAME),
        annotation: el.find_child(tags::ANNOTATION).map(decode_annotation),
        restriction: el.find_child(tags::RESTRICTION).map(decode_restriction),
    }
}

fn decode_restriction(el: &XmlElement) -> Restriction {
    let facet = |tag: &str| {
        el.find_child(tag)
            .map(|f| f.attribute_or_empty(attrs::VALUE))
    };

    Restriction {
        base: el.attribute_or_empty(attrs::BASE),
        enumerations: el
            .find_children(tags::ENUMERATION)
            .map(|e| Enumeration {
                value: e.attribute_or_empty(attrs::VALUE),
            })
            .collect(),
        pattern: facet(tags::PATTERN).map(|value| Pattern { value }),
        min_inclusive: facet(tags::MIN_INCLUSIVE).map(|value| MinInclusive { value }),
        max_inclusive: facet(tags::MAX_INCLUSIVE).map(|value| MaxInclusive { value }),
    }
}

fn decode_sequence(el: &XmlElement) -> Sequence {
    Sequence {
        name: el.attribute_or_empty(attrs::NAME),
        min_occurs: el.attribute_or_empty(attrs::MIN_OCCURS),
        max_occurs: el.attribute_or_empty(attrs::MAX_OCCURS),
        elements: el.find_children(tags::ELEMENT).map(decode_element).collect(),
        choice: el
            .find_child(tags::CHOICE)
            .map(|c| Box::new(decode_choice(c))),
    }
}

fn decode_choice(el: &XmlElement) -> Choice {
    Choice {
        name: el.attribute_or_empty(attrs::NAME),
        min_occurs: el.attribute_or_empty(attrs::MIN_OCCURS),
        max_occurs: el.attribute_or_empty(attrs::MAX_OCCURS),
        elements: el.find_children(tags::ELEMENT).map(decode_element).collect(),
        sequence: el
            .find_child(tags::SEQUENCE)
            .map(|s| Box::new(decode_sequence(s))),
    }
}

fn decode_element(el: &XmlElement) -> Element {
    Element {
        name: el.attribute_or_empty(attrs::NAME),
        type_name: el.attribute_or_empty(attrs::TYPE),
        reference: el.attribute_or_empty(attrs::REF),
        min_occurs: el.attribute_or_empty(attrs::MIN_OCCURS),
        max_occurs: el.attribute_or_empty(attrs::MAX_OCCURS),
        complex_type: el
            .find_child(tags::COMPLEX_TYPE)
            .map(|ct| Box::new(decode_complex_type(ct))),
        simple_type: el
            .find_child(tags::SIMPLE_TYPE)
            .map(|st| Box::new(decode_simple_type(st))),
        annotation: el.find_child(tags::ANNOTATION).map(decode_annotation),
    }
}

fn decode_attribute(el: &XmlElement) -> Attribute {
    Attribute {
        name: el.attribute_or_empty(attrs::NAME),
        type_name: el.attribute_or_empty(attrs::TYPE),
        usage: el.attribute_or_empty(attrs::USE),
        reference: el.attribute_or_empty(attrs::REF),
        simple_type: el
            .find_child(tags::SIMPLE_TYPE)
            .map(|st| Box::new(decode_simple_type(st))),
        annotation: el.find_child(tags::ANNOTATION).map(decode_annotation),
    }
}

fn decode_extension(el: &XmlElement) -> Extension {
    Extension {
        id: el.attribute_or_empty(attrs::ID),
        base: el.attribute_or_empty(attrs::BASE),
        sequence: el.find_child(tags::SEQUENCE).map(decode_sequence),
        attributes: el.find_children(tags::ATTRIBUTE).map(decode_attribute).collect(),
    }
}

fn decode_annotation(el: &XmlElement) -> Annotation {
    Annotation {
        documentation: el
            .find_child(tags::DOCUMENTATION)
            .and_then(|d| d.text.as_deref())
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PERSON_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:people">
  <xs:import namespace="urn:common" schemaLocation="common.xsd"/>
  <xs:complexType name="Person">
    <xs:annotation><xs:documentation>A person</xs:documentation></xs:annotation>
    <xs:sequence>
      <xs:element name="name" type="xs:string" minOccurs="1" maxOccurs="1"/>
      <xs:element name="age" type="xs:int" minOccurs="0" maxOccurs="1"/>
    </xs:sequence>
    <xs:attribute name="id" type="xs:string" use="required"/>
  </xs:complexType>
  <xs:simpleType name="Colour">
    <xs:restriction base="xs:string">
      <xs:enumeration value="red"/>
      <xs:enumeration value="green"/>
      <xs:pattern value="[a-z]+"/>
    </xs:restriction>
  </xs:simpleType>
</xs:schema>"#;

    #[test]
    fn test_decode_person() {
        let schema: Schema = PERSON_XSD.parse().unwrap();

        assert_eq!(schema.prefix, "xs");
        assert_eq!(schema.target_namespace, "urn:people");
        assert_eq!(
            schema.imports,
            vec![Import {
                namespace: "urn:common".into(),
                schema_location: "common.xsd".into(),
            }]
        );

        let person = &schema.complex_types[0];
        assert_eq!(person.name, "Person");
        assert_eq!(
            person.annotation.as_ref().map(|a| a.documentation.as_str()),
            Some("A person")
        );
        let seq = person.sequence.as_ref().unwrap();
        assert_eq!(seq.elements.len(), 2);
        assert_eq!(seq.elements[1].name, "age");
        assert_eq!(seq.elements[1].min_occurs, "0");
        assert_eq!(person.attributes[0].usage, "required");
    }

    #[test]
    fn test_decode_restriction_facets() {
        let schema: Schema = PERSON_XSD.parse().unwrap();
        let restriction = schema.simple_types[0].restriction.as_ref().unwrap();

        assert_eq!(restriction.base, "xs:string");
        let values: Vec<&str> = restriction
            .enumerations
            .iter()
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(values, vec!["red", "green"]);
        assert_eq!(restriction.pattern.as_ref().unwrap().value, "[a-z]+");
        assert!(restriction.min_inclusive.is_none());
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let xsd = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
            <xsd:notation name="gif" public="image/gif"/>
            <xsd:complexType name="T">
                <xsd:all><xsd:element name="x"/></xsd:all>
                <xsd:anyAttribute/>
            </xsd:complexType>
        </xsd:schema>"#;
        let schema: Schema = xsd.parse().unwrap();

        assert_eq!(schema.prefix, "xsd");
        assert_eq!(schema.complex_types.len(), 1);
        assert!(schema.complex_types[0].sequence.is_none());
        assert!(schema.complex_types[0].attributes.is_empty());
    }

    #[test]
    fn test_wrong_root_is_decode_error() {
        let err = Schema::from_bytes(b"<definitions/>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_malformed_xml_is_decode_error() {
        let err = Schema::from_bytes(b"<xs:schema><xs:element></xs:schema>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_limits_apply() {
        let limits = Limits {
            max_size: 16,
            ..Limits::default()
        };
        let err = Schema::from_bytes_with_limits(PERSON_XSD.as_bytes(), &limits).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }
}
