//! Generic XML element tree
//!
//! This module turns raw bytes into a plain element tree with `quick-xml`.
//! The schema model is decoded from this tree in a second step, which keeps
//! well-formedness checking separate from XSD shape matching.

use crate::error::{DecodeError, Error, Result};
use crate::limits::Limits;
use crate::namespaces::NamespaceContext;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Prefix of the element name, if any
    pub prefix: Option<String>,
    /// Local part of the element name
    pub local_name: String,
    /// Attributes keyed by local name, in document order
    pub attributes: IndexMap<String, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local_name: local_name.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Get an attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Get an attribute value, or the empty string when absent
    pub fn attribute_or_empty(&self, name: &str) -> String {
        self.get_attribute(name).unwrap_or_default().to_string()
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append text content
    pub fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Find child elements by local name
    pub fn find_children<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |e| e.local_name() == local_name)
    }

    /// First child element with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.local_name() == local_name)
    }
}

/// XML Document representation
#[derive(Debug)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes, enforcing the given limits
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut root: Option<Element> = None;
        let mut element_stack: Vec<Element> = Vec::new();
        let mut element_count = 0usize;
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    element_count += 1;
                    limits.check_elements(element_count)?;
                    limits.check_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, position)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    let current = element_stack.pop().ok_or_else(|| {
                        DecodeError::new("end tag without matching start tag")
                            .with_position(position)
                    })?;
                    Self::attach(current, &mut element_stack, &mut root, position)?;
                }
                Ok(Event::Empty(e)) => {
                    element_count += 1;
                    limits.check_elements(element_count)?;
                    limits.check_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, position)?;
                    Self::attach(element, &mut element_stack, &mut root, position)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| {
                        DecodeError::new(format!("failed to unescape text: {}", e))
                            .with_position(position)
                    })?;
                    Self::add_text(&text, &mut element_stack, position)?;
                }
                Ok(Event::CData(e)) => {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes).map_err(|e| {
                        DecodeError::new(format!("invalid UTF-8 in CDATA: {}", e))
                            .with_position(position)
                    })?;
                    Self::add_text(text, &mut element_stack, position)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(DecodeError::new(format!("malformed XML: {}", e))
                        .with_position(reader.buffer_position() as u64)
                        .into())
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
            buf.clear();
        }

        if let Some(open) = element_stack.last() {
            return Err(DecodeError::new(format!(
                "unexpected end of input inside <{}>",
                open.local_name
            ))
            .with_position(reader.buffer_position() as u64)
            .into());
        }

        let root = root.ok_or_else(|| DecodeError::new("document has no root element"))?;
        Ok(Document { root })
    }

    fn attach(
        element: Element,
        element_stack: &mut [Element],
        root: &mut Option<Element>,
        position: u64,
    ) -> Result<()> {
        if let Some(parent) = element_stack.last_mut() {
            parent.add_child(element);
            Ok(())
        } else if root.is_some() {
            Err(DecodeError::new("more than one root element")
                .with_position(position)
                .into())
        } else {
            *root = Some(element);
            Ok(())
        }
    }

    fn add_text(text: &str, element_stack: &mut [Element], position: u64) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        match element_stack.last_mut() {
            Some(current) => {
                current.push_text(text);
                Ok(())
            }
            None => Err(Error::Decode(
                DecodeError::new("text outside the root element").with_position(position),
            )),
        }
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart, position: u64) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref()).map_err(|e| {
            DecodeError::new(format!("invalid element name: {}", e)).with_position(position)
        })?;

        let mut element = match name.split_once(':') {
            Some((prefix, local)) => {
                let mut element = Element::new(local);
                element.prefix = Some(prefix.to_string());
                element
            }
            None => Element::new(name),
        };

        for attr_result in start.attributes() {
            let attr = attr_result.map_err(|e| {
                DecodeError::new(format!("failed to parse attribute: {}", e))
                    .with_position(position)
            })?;

            let attr_name = std::str::from_utf8(attr.key.as_ref()).map_err(|e| {
                DecodeError::new(format!("invalid attribute name: {}", e)).with_position(position)
            })?;

            let attr_value = attr
                .unescape_value()
                .map_err(|e| {
                    DecodeError::new(format!("failed to unescape attribute value: {}", e))
                        .with_position(position)
                })?
                .to_string();

            if attr_name == "xmlns" {
                element.namespaces.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                element.namespaces.add_prefix(prefix, attr_value);
            } else {
                let local = attr_name
                    .split_once(':')
                    .map(|(_, local)| local)
                    .unwrap_or(attr_name);
                element.attributes.insert(local.to_string(), attr_value);
            }
        }

        Ok(element)
    }
}
