//! Schema tree to message flattening
//!
//! A single visitor walks the tree with the open message as context and
//! records everything it meets into a name→message map. Inline anonymous
//! types become messages named after the field that holds them; facets and
//! annotations refine the most recent field.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{Message, MessageItem, TargetFormat, TypeMapping, TypeTable};
use crate::error::{Error, Result, StructuralError};
use crate::model::{Attribute, Describe, Element, Node, Schema};
use crate::namespaces::NamespaceContext;
use crate::traversal::walk_with_context;

/// Flatten a schema into messages ordered by package, root-ness and
/// first appearance.
pub fn flatten(schema: &Schema, format: TargetFormat) -> Result<Vec<Message>> {
    let mut flattener = Flattener::new(format, &schema.namespaces);
    walk_with_context(schema, |node, parent: Option<&Option<Cursor>>| {
        flattener.visit(node, parent.and_then(Option::as_ref))
    })?;
    Ok(flattener.finish())
}

impl Schema {
    /// Flatten this schema, see [`flatten`]
    pub fn messages(&self, format: TargetFormat) -> Result<Vec<Message>> {
        flatten(self, format)
    }
}

/// The message open at a point of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    /// Position of the message in the map
    index: usize,
    /// Opened by a top-level element that has not produced a field yet.
    /// Its inline type and annotation describe the message itself.
    pending: bool,
}

impl Cursor {
    fn at(index: usize) -> Self {
        Self {
            index,
            pending: false,
        }
    }
}

/// Resolved type of a field, applied once the map is no longer borrowed
struct Resolution {
    type_name: String,
    mapping: Option<TypeMapping>,
}

impl Resolution {
    fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            mapping: None,
        }
    }

    fn apply(self, item: &mut MessageItem) {
        item.type_name = self.type_name;
        if let Some(mapping) = self.mapping {
            if let Some(format) = mapping.format {
                item.format = format.to_string();
            }
            if let Some(min) = mapping.min_inclusive {
                item.min_inclusive = min.to_string();
            }
            if let Some(max) = mapping.max_inclusive {
                item.max_inclusive = max.to_string();
            }
        }
    }
}

struct Flattener<'s> {
    table: TypeTable,
    namespaces: &'s NamespaceContext,
    messages: IndexMap<String, Message>,
}

impl<'s> Flattener<'s> {
    fn new(format: TargetFormat, namespaces: &'s NamespaceContext) -> Self {
        Self {
            table: TypeTable::new(format),
            namespaces,
            messages: IndexMap::new(),
        }
    }

    fn visit(&mut self, node: Node<'_>, current: Option<&Cursor>) -> Result<Option<Cursor>> {
        trace!(kind = node.kind(), node = %node.describe(), "visit");
        let current = current.copied();

        match node {
            Node::Schema(_)
            | Node::Import(_)
            | Node::Sequence(_)
            | Node::Choice(_)
            | Node::ComplexContent(_)
            | Node::SimpleContent(_) => Ok(current),

            Node::ComplexType(ct) => {
                if ct.name.is_empty() {
                    self.anonymous_type(node, current)
                } else {
                    Ok(Some(self.named_type(&ct.name, current)))
                }
            }

            Node::SimpleType(st) => {
                if st.name.is_empty() {
                    self.anonymous_type(node, current)
                } else {
                    Ok(Some(self.named_type(&st.name, current)))
                }
            }

            Node::Element(e) => self.element(e, current),

            Node::Attribute(a) => {
                let cursor = require_message(node, current)?;
                let item = self.attribute_item(a);
                self.messages[cursor.index].items.push(item);
                Ok(Some(Cursor::at(cursor.index)))
            }

            Node::Extension(ex) => {
                let cursor = require_message(node, current)?;
                let mut item = MessageItem::new(self.messages[cursor.index].name.clone());
                self.resolve(&ex.base, &item.name).apply(&mut item);
                self.messages[cursor.index].items.push(item);
                Ok(Some(Cursor::at(cursor.index)))
            }

            Node::Restriction(r) => {
                let cursor = require_message(node, current)?;
                let message = &self.messages[cursor.index];
                let existing = message.items.last().map(|item| item.name.clone());
                // A restriction with nothing to refine stands for the message itself
                let name = existing.clone().unwrap_or_else(|| message.name.clone());
                let resolution = self.resolve(&r.base, &name);

                let items = &mut self.messages[cursor.index].items;
                if existing.is_none() {
                    items.push(MessageItem::new(name));
                }
                if let Some(item) = items.last_mut() {
                    resolution.apply(item);
                }
                Ok(Some(Cursor::at(cursor.index)))
            }

            Node::Pattern(p) => {
                let item = self.last_item(node, current)?;
                item.format = p.value.clone();
                Ok(current)
            }

            Node::MinInclusive(m) => {
                let item = self.last_item(node, current)?;
                item.min_inclusive = m.value.clone();
                Ok(current)
            }

            Node::MaxInclusive(m) => {
                let item = self.last_item(node, current)?;
                item.max_inclusive = m.value.clone();
                Ok(current)
            }

            Node::Enumeration(e) => {
                let cursor = require_message(node, current)?;
                // No field yet: the value has nowhere to go and is dropped
                if let Some(item) = self.messages[cursor.index].items.last_mut() {
                    item.values.push(e.value.clone());
                }
                Ok(current)
            }

            Node::Annotation(a) => {
                let cursor = require_message(node, current)?;
                let message = &mut self.messages[cursor.index];
                match message.items.last_mut() {
                    Some(item) if !cursor.pending => item.description = a.documentation.clone(),
                    _ => message.description = a.documentation.clone(),
                }
                Ok(current)
            }
        }
    }

    /// Open (or reuse) a message for a named type
    fn named_type(&mut self, name: &str, current: Option<Cursor>) -> Cursor {
        Cursor::at(self.open(name, current.is_none()))
    }

    /// An inline type fills a message named after the field it belongs to
    fn anonymous_type(&mut self, node: Node<'_>, current: Option<Cursor>) -> Result<Option<Cursor>> {
        let cursor = require_message(node, current)?;
        if cursor.pending {
            return Ok(Some(Cursor::at(cursor.index)));
        }
        let name = match self.messages[cursor.index].items.last() {
            Some(item) => item.name.clone(),
            None => return Err(structural(node, "anonymous type but no current message item")),
        };
        Ok(Some(Cursor::at(self.open(&name, false))))
    }

    fn element(&mut self, e: &Element, current: Option<Cursor>) -> Result<Option<Cursor>> {
        let Some(cursor) = current else {
            // Top-level element: it names a message of its own
            let name = if e.name.is_empty() { &e.reference } else { &e.name };
            let existed = self.messages.contains_key(name.as_str());
            let index = self.open(name, !name.is_empty());
            if existed {
                // A reused message with fields keeps its own documentation
                let pending = self.messages[index].items.is_empty();
                return Ok(Some(Cursor { index, pending }));
            }
            if e.type_name.is_empty() {
                return Ok(Some(Cursor {
                    index,
                    pending: true,
                }));
            }
            let item = self.element_item(e);
            self.messages[index].items.push(item);
            return Ok(Some(Cursor::at(index)));
        };

        let item = self.element_item(e);
        self.messages[cursor.index].items.push(item);
        Ok(Some(Cursor::at(cursor.index)))
    }

    fn element_item(&mut self, e: &Element) -> MessageItem {
        let mut item = MessageItem {
            name: e.name.clone(),
            repeated: e.is_repeated(),
            mandatory_optional: e.presence(),
            min_occurs: e.min_occurs.clone(),
            max_occurs: e.max_occurs.clone(),
            ..Default::default()
        };
        if e.reference.is_empty() {
            self.resolve(&e.type_name, &item.name).apply(&mut item);
        } else {
            item.name = e.reference.clone();
            item.type_name = e.reference.clone();
        }
        item
    }

    fn attribute_item(&mut self, a: &Attribute) -> MessageItem {
        let mut item = MessageItem {
            name: a.name.clone(),
            repeated: a.is_repeated(),
            mandatory_optional: a.presence(),
            ..Default::default()
        };
        if a.reference.is_empty() {
            self.resolve(&a.type_name, &item.name).apply(&mut item);
        } else {
            item.name = a.reference.clone();
            item.type_name = a.reference.clone();
        }
        item
    }

    /// Last field of the open message, required by facet nodes
    fn last_item(&mut self, node: Node<'_>, current: Option<Cursor>) -> Result<&mut MessageItem> {
        let cursor = require_message(node, current)?;
        self.messages[cursor.index]
            .items
            .last_mut()
            .ok_or_else(|| structural(node, &format!("{} but no current message item", node.kind())))
    }

    /// Index of the message under `key`, inserting it on first sight
    fn open(&mut self, key: &str, is_root: bool) -> usize {
        if let Some(index) = self.messages.get_index_of(key) {
            return index;
        }
        debug!(message = key, is_root, "opening message");
        let message = Message {
            name: key.to_string(),
            is_root,
            ..Default::default()
        };
        self.messages.insert_full(key.to_string(), message).0
    }

    /// Translate a raw type reference.
    ///
    /// Empty means the field names its own type. XSD primitives go through
    /// the table; a miss there is treated like any other qualified name
    /// unless the table is the identity one. `prefix:Name` becomes
    /// `prefix.Name` with a placeholder message. Anything else is a local
    /// message name.
    fn resolve(&mut self, raw: &str, own_name: &str) -> Resolution {
        if raw.is_empty() {
            return Resolution::named(own_name);
        }

        let (prefix, local) = raw.split_once(':').unwrap_or(("", raw));
        if self.namespaces.is_xsd_prefix(prefix) {
            if let Some(mapping) = self.table.get(local) {
                return Resolution {
                    type_name: mapping.type_name.to_string(),
                    mapping: Some(*mapping),
                };
            }
            // The identity table translates nothing
            if self.table.is_empty() {
                return Resolution::named(raw);
            }
        }

        if prefix.is_empty() {
            return Resolution::named(raw);
        }

        let qualified = raw.replace(':', ".");
        if !local.contains(':') && !self.messages.contains_key(&qualified) {
            debug!(message = %qualified, "registering placeholder message");
            let placeholder = Message {
                package: prefix.to_string(),
                name: local.to_string(),
                ..Default::default()
            };
            self.messages.insert(qualified.clone(), placeholder);
        }
        Resolution::named(qualified)
    }

    fn finish(self) -> Vec<Message> {
        let mut ordered: Vec<Message> = self.messages.into_values().collect();
        // Stable: equal keys keep first-seen order
        ordered.sort_by(|a, b| {
            a.package
                .cmp(&b.package)
                .then_with(|| b.is_root.cmp(&a.is_root))
        });
        ordered
    }
}

fn require_message(node: Node<'_>, current: Option<Cursor>) -> Result<Cursor> {
    current.ok_or_else(|| structural(node, &format!("{} but no current message", node.kind())))
}

fn structural(node: Node<'_>, reason: &str) -> Error {
    StructuralError::new(node.kind(), node.describe(), reason).into()
}
