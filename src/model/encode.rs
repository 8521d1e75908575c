//! Writing the schema model back to XSD text
//!
//! Only fields captured by the model are written, and empty attributes are
//! omitted, so decoding the output reproduces an equal [`Schema`].

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::*;
use crate::error::{Error, Result};

impl Schema {
    /// Serialize the schema tree as indented XSD text
    pub fn to_xml(&self) -> Result<String> {
        let mut encoder = Encoder::new(&self.prefix);
        encoder.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        encoder.schema(self)?;
        String::from_utf8(encoder.writer.into_inner())
            .map_err(|e| Error::Encode(format!("writer produced invalid UTF-8: {}", e)))
    }
}

struct Encoder {
    writer: Writer<Vec<u8>>,
    prefix: String,
}

impl Encoder {
    fn new(prefix: &str) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            prefix: prefix.to_string(),
        }
    }

    fn qualified(&self, local: &str) -> String {
        if self.prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", self.prefix, local)
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Encode(e.to_string()))
    }

    /// Write one element; `body` writes the children unless `empty`
    fn node<F>(&mut self, local: &str, attrs: &[(&str, &str)], empty: bool, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let name = self.qualified(local);
        let mut start = BytesStart::new(name.as_str());
        for (key, value) in attrs.iter().filter(|(_, v)| !v.is_empty()) {
            start.push_attribute((*key, *value));
        }

        if empty {
            return self.write(Event::Empty(start));
        }
        self.write(Event::Start(start))?;
        body(self)?;
        self.write(Event::End(BytesEnd::new(name.as_str())))
    }

    fn schema(&mut self, schema: &Schema) -> Result<()> {
        let mut declarations: Vec<(String, &str)> = Vec::new();
        if let Some(ns) = schema.namespaces.get_default_namespace() {
            declarations.push(("xmlns".to_string(), ns));
        }
        for (prefix, ns) in schema.namespaces.iter() {
            declarations.push((format!("xmlns:{}", prefix), ns));
        }

        let mut attrs: Vec<(&str, &str)> = declarations
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        attrs.push(("targetNamespace", schema.target_namespace.as_str()));

        let empty = schema.imports.is_empty()
            && schema.complex_types.is_empty()
            && schema.simple_types.is_empty()
            && schema.elements.is_empty();

        self.node("schema", &attrs, empty, |enc| {
            for import in &schema.imports {
                enc.node(
                    "import",
                    &[
                        ("namespace", import.namespace.as_str()),
                        ("schemaLocation", import.schema_location.as_str()),
                    ],
                    true,
                    |_| Ok(()),
                )?;
            }
            for ct in &schema.complex_types {
                enc.complex_type(ct)?;
            }
            for st in &schema.simple_types {
                enc.simple_type(st)?;
            }
            for e in &schema.elements {
                enc.element(e)?;
            }
            Ok(())
        })
    }

    fn complex_type(&mut self, ct: &ComplexType) -> Result<()> {
        let empty = ct.annotation.is_none()
            && ct.sequence.is_none()
            && ct.complex_content.is_none()
            && ct.simple_content.is_none()
            && ct.attributes.is_empty()
            && ct.choice.is_none();

        self.node("complexType", &[("name", ct.name.as_str())], empty, |enc| {
            if let Some(a) = &ct.annotation {
                enc.annotation(a)?;
            }
            if let Some(s) = &ct.sequence {
                enc.sequence(s)?;
            }
            if let Some(cc) = &ct.complex_content {
                enc.content("complexContent", cc.extension.as_ref())?;
            }
            if let Some(sc) = &ct.simple_content {
                enc.content("simpleContent", sc.extension.as_ref())?;
            }
            for a in &ct.attributes {
                enc.attribute(a)?;
            }
            if let Some(c) = &ct.choice {
                enc.choice(c)?;
            }
            Ok(())
        })
    }

    fn simple_type(&mut self, st: &SimpleType) -> Result<()> {
        let empty = st.annotation.is_none() && st.restriction.is_none();
        self.node("simpleType", &[("name", st.name.as_str())], empty, |enc| {
            if let Some(a) = &st.annotation {
                enc.annotation(a)?;
            }
            if let Some(r) = &st.restriction {
                enc.restriction(r)?;
            }
            Ok(())
        })
    }

    fn restriction(&mut self, r: &Restriction) -> Result<()> {
        let empty = r.enumerations.is_empty()
            && r.pattern.is_none()
            && r.min_inclusive.is_none()
            && r.max_inclusive.is_none();

        self.node("restriction", &[("base", r.base.as_str())], empty, |enc| {
            for e in &r.enumerations {
                enc.facet("enumeration", &e.value)?;
            }
            if let Some(p) = &r.pattern {
                enc.facet("pattern", &p.value)?;
            }
            if let Some(m) = &r.min_inclusive {
                enc.facet("minInclusive", &m.value)?;
            }
            if let Some(m) = &r.max_inclusive {
                enc.facet("maxInclusive", &m.value)?;
            }
            Ok(())
        })
    }

    fn facet(&mut self, local: &str, value: &str) -> Result<()> {
        self.node(local, &[("value", value)], true, |_| Ok(()))
    }

    fn sequence(&mut self, s: &Sequence) -> Result<()> {
        let attrs = [
            ("name", s.name.as_str()),
            ("minOccurs", s.min_occurs.as_str()),
            ("maxOccurs", s.max_occurs.as_str()),
        ];
        let empty = s.elements.is_empty() && s.choice.is_none();
        self.node("sequence", &attrs, empty, |enc| {
            for e in &s.elements {
                enc.element(e)?;
            }
            if let Some(c) = &s.choice {
                enc.choice(c)?;
            }
            Ok(())
        })
    }

    fn choice(&mut self, c: &Choice) -> Result<()> {
        let attrs = [
            ("name", c.name.as_str()),
            ("minOccurs", c.min_occurs.as_str()),
            ("maxOccurs", c.max_occurs.as_str()),
        ];
        let empty = c.elements.is_empty() && c.sequence.is_none();
        self.node("choice", &attrs, empty, |enc| {
            for e in &c.elements {
                enc.element(e)?;
            }
            if let Some(s) = &c.sequence {
                enc.sequence(s)?;
            }
            Ok(())
        })
    }

    fn element(&mut self, e: &Element) -> Result<()> {
        let attrs = [
            ("name", e.name.as_str()),
            ("type", e.type_name.as_str()),
            ("ref", e.reference.as_str()),
            ("minOccurs", e.min_occurs.as_str()),
            ("maxOccurs", e.max_occurs.as_str()),
        ];
        let empty = e.annotation.is_none() && e.complex_type.is_none() && e.simple_type.is_none();
        self.node("element", &attrs, empty, |enc| {
            if let Some(a) = &e.annotation {
                enc.annotation(a)?;
            }
            if let Some(ct) = &e.complex_type {
                enc.complex_type(ct)?;
            }
            if let Some(st) = &e.simple_type {
                enc.simple_type(st)?;
            }
            Ok(())
        })
    }

    fn attribute(&mut self, a: &Attribute) -> Result<()> {
        let attrs = [
            ("name", a.name.as_str()),
            ("type", a.type_name.as_str()),
            ("use", a.usage.as_str()),
            ("ref", a.reference.as_str()),
        ];
        let empty = a.annotation.is_none() && a.simple_type.is_none();
        self.node("attribute", &attrs, empty, |enc| {
            if let Some(ann) = &a.annotation {
                enc.annotation(ann)?;
            }
            if let Some(st) = &a.simple_type {
                enc.simple_type(st)?;
            }
            Ok(())
        })
    }

    fn content(&mut self, local: &str, extension: Option<&Extension>) -> Result<()> {
        self.node(local, &[], extension.is_none(), |enc| match extension {
            Some(ex) => enc.extension(ex),
            None => Ok(()),
        })
    }

    fn extension(&mut self, ex: &Extension) -> Result<()> {
        let attrs = [("id", ex.id.as_str()), ("base", ex.base.as_str())];
        let empty = ex.sequence.is_none() && ex.attributes.is_empty();
        self.node("extension", &attrs, empty, |enc| {
            if let Some(s) = &ex.sequence {
                enc.sequence(s)?;
            }
            for a in &ex.attributes {
                enc.attribute(a)?;
            }
            Ok(())
        })
    }

    fn annotation(&mut self, a: &Annotation) -> Result<()> {
        self.node("annotation", &[], false, |enc| {
            let empty = a.documentation.is_empty();
            enc.node("documentation", &[], empty, |enc| {
                enc.write(Event::Text(BytesText::new(&a.documentation)))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_uses_schema_prefix() {
        let mut schema = Schema {
            prefix: "xsd".into(),
            ..Default::default()
        };
        schema
            .namespaces
            .add_prefix("xsd", crate::namespaces::XSD_NAMESPACE);
        schema.elements.push(Element {
            name: "root".into(),
            type_name: "xsd:string".into(),
            ..Default::default()
        });

        let xml = schema.to_xml().unwrap();
        assert!(xml.contains("<xsd:schema xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">"));
        assert!(xml.contains("<xsd:element name=\"root\" type=\"xsd:string\"/>"));
        assert!(!xml.contains("minOccurs"));
    }

    #[test]
    fn test_encode_escapes_text() {
        let schema = Schema {
            prefix: "xs".into(),
            complex_types: vec![ComplexType {
                name: "T".into(),
                annotation: Some(Annotation {
                    documentation: "a < b & c".into(),
                }),
                ..Default::default()
            }],
            ..Default::default()
        };

        let xml = schema.to_xml().unwrap();
        assert!(xml.contains("a &lt; b &amp; c"));

        let decoded = Schema::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn test_round_trip_nested() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:t">
  <xs:complexType name="Order">
    <xs:complexContent>
      <xs:extension base="tns:Base" id="ext1">
        <xs:sequence>
          <xs:element name="line" maxOccurs="unbounded">
            <xs:complexType>
              <xs:choice minOccurs="0">
                <xs:element ref="tns:sku"/>
                <xs:sequence><xs:element name="code" type="xs:token"/></xs:sequence>
              </xs:choice>
            </xs:complexType>
          </xs:element>
        </xs:sequence>
        <xs:attribute name="status">
          <xs:simpleType>
            <xs:restriction base="xs:integer">
              <xs:minInclusive value="0"/>
              <xs:maxInclusive value="9"/>
            </xs:restriction>
          </xs:simpleType>
        </xs:attribute>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
</xs:schema>"#;
        let original = Schema::from_bytes(xsd.as_bytes()).unwrap();
        let encoded = original.to_xml().unwrap();
        let decoded = Schema::from_bytes(encoded.as_bytes()).unwrap();

        assert_eq!(decoded, original);
    }
}
