//! Depth-first traversal of the schema tree
//!
//! Nodes are visited pre-order in a fixed child order per node kind. The
//! contextual walk threads a value from each node to its direct children:
//! whatever the visitor returns for a node is what each of that node's
//! children receives as their parent context. Siblings see the same value
//! and nothing flows back up or across.

use std::convert::Infallible;

use crate::model::{
    Annotation, Attribute, Choice, ComplexContent, ComplexType, Describe, Element, Enumeration,
    Extension, Import, MaxInclusive, MinInclusive, Node, Pattern, Restriction, Schema,
    Sequence, SimpleContent, SimpleType,
};

/// A node that can walk itself and its descendants
pub trait Traverse {
    /// Visit `self` with `parent`, then every child with the returned context.
    ///
    /// Stops at the first error returned by `f`.
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>;
}

/// Walk the tree, threading a context value from parents to children.
///
/// The root is visited with `None`; every other node gets `Some` of the
/// value its parent's visit returned.
pub fn walk_with_context<'a, C, E, F>(schema: &'a Schema, mut f: F) -> Result<(), E>
where
    F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
{
    schema.traverse(None, &mut f)
}

/// Walk the tree without context; the visitor cannot fail
pub fn walk<'a, F>(schema: &'a Schema, mut f: F)
where
    F: FnMut(Node<'a>),
{
    let result: Result<(), Infallible> = walk_with_context(schema, |node, _: Option<&()>| {
        f(node);
        Ok(())
    });
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// `describe()` of every node in traversal order
pub fn describe_all(schema: &Schema) -> Vec<String> {
    let mut lines = Vec::new();
    walk(schema, |node| lines.push(node.describe()));
    lines
}

/// Indented tree listing, one `<depth>) <describe>` line per node
pub fn tree_view(schema: &Schema) -> String {
    let mut lines = Vec::new();
    let result: Result<(), Infallible> = walk_with_context(schema, |node, parent: Option<&usize>| {
        let depth = parent.map_or(0, |d| d + 1);
        lines.push(format!("{}{}) {}", "  ".repeat(depth), depth, node.describe()));
        Ok(depth)
    });
    match result {
        Ok(()) => lines.join("\n"),
        Err(never) => match never {},
    }
}

macro_rules! visit {
    ($f:ident, $ctx:expr, $child:expr) => {
        $child.traverse(Some(&$ctx), $f)?
    };
}

impl Traverse for Schema {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Schema(self), parent)?;
        for import in &self.imports {
            visit!(f, ctx, import);
        }
        for ct in &self.complex_types {
            visit!(f, ctx, ct);
        }
        for st in &self.simple_types {
            visit!(f, ctx, st);
        }
        for e in &self.elements {
            visit!(f, ctx, e);
        }
        Ok(())
    }
}

impl Traverse for ComplexType {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::ComplexType(self), parent)?;
        if let Some(a) = &self.annotation {
            visit!(f, ctx, a);
        }
        if let Some(s) = &self.sequence {
            visit!(f, ctx, s);
        }
        if let Some(cc) = &self.complex_content {
            visit!(f, ctx, cc);
        }
        if let Some(sc) = &self.simple_content {
            visit!(f, ctx, sc);
        }
        for a in &self.attributes {
            visit!(f, ctx, a);
        }
        if let Some(c) = &self.choice {
            visit!(f, ctx, c);
        }
        Ok(())
    }
}

impl Traverse for SimpleType {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::SimpleType(self), parent)?;
        if let Some(a) = &self.annotation {
            visit!(f, ctx, a);
        }
        if let Some(r) = &self.restriction {
            visit!(f, ctx, r);
        }
        Ok(())
    }
}

impl Traverse for Restriction {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Restriction(self), parent)?;
        for e in &self.enumerations {
            visit!(f, ctx, e);
        }
        if let Some(p) = &self.pattern {
            visit!(f, ctx, p);
        }
        if let Some(m) = &self.min_inclusive {
            visit!(f, ctx, m);
        }
        if let Some(m) = &self.max_inclusive {
            visit!(f, ctx, m);
        }
        Ok(())
    }
}

impl Traverse for Sequence {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Sequence(self), parent)?;
        for e in &self.elements {
            visit!(f, ctx, e);
        }
        if let Some(c) = &self.choice {
            visit!(f, ctx, c);
        }
        Ok(())
    }
}

impl Traverse for Choice {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Choice(self), parent)?;
        for e in &self.elements {
            visit!(f, ctx, e);
        }
        if let Some(s) = &self.sequence {
            visit!(f, ctx, s);
        }
        Ok(())
    }
}

impl Traverse for Element {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Element(self), parent)?;
        if let Some(ct) = &self.complex_type {
            visit!(f, ctx, ct);
        }
        if let Some(st) = &self.simple_type {
            visit!(f, ctx, st);
        }
        if let Some(a) = &self.annotation {
            visit!(f, ctx, a);
        }
        Ok(())
    }
}

impl Traverse for Attribute {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Attribute(self), parent)?;
        if let Some(st) = &self.simple_type {
            visit!(f, ctx, st);
        }
        if let Some(a) = &self.annotation {
            visit!(f, ctx, a);
        }
        Ok(())
    }
}

impl Traverse for ComplexContent {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::ComplexContent(self), parent)?;
        if let Some(ex) = &self.extension {
            visit!(f, ctx, ex);
        }
        Ok(())
    }
}

impl Traverse for SimpleContent {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::SimpleContent(self), parent)?;
        if let Some(ex) = &self.extension {
            visit!(f, ctx, ex);
        }
        Ok(())
    }
}

impl Traverse for Extension {
    fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
    {
        let ctx = f(Node::Extension(self), parent)?;
        if let Some(s) = &self.sequence {
            visit!(f, ctx, s);
        }
        for a in &self.attributes {
            visit!(f, ctx, a);
        }
        Ok(())
    }
}

/// Leaf nodes: visited, context discarded
macro_rules! leaf {
    ($($ty:ident),*) => {
        $(
            impl Traverse for $ty {
                fn traverse<'a, C, E, F>(&'a self, parent: Option<&C>, f: &mut F) -> Result<(), E>
                where
                    F: FnMut(Node<'a>, Option<&C>) -> Result<C, E>,
                {
                    f(Node::$ty(self), parent).map(|_| ())
                }
            }
        )*
    };
}

leaf!(Import, Enumeration, Pattern, MinInclusive, MaxInclusive, Annotation);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const XSD: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:import namespace="urn:x" schemaLocation="x.xsd"/>
  <xs:complexType name="A">
    <xs:choice><xs:element name="c1"/></xs:choice>
    <xs:attribute name="at"/>
    <xs:sequence minOccurs="1" maxOccurs="unbounded">
      <xs:element name="s1" type="xs:string"/>
      <xs:element name="s2">
        <xs:simpleType>
          <xs:restriction base="xs:int">
            <xs:maxInclusive value="9"/>
            <xs:enumeration value="1"/>
          </xs:restriction>
        </xs:simpleType>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
  <xs:simpleType name="B"/>
  <xs:element name="root" type="A"/>
</xs:schema>"#;

    fn schema() -> Schema {
        XSD.parse().unwrap()
    }

    #[test]
    fn test_describe_all_follows_grammar_order() {
        let lines = describe_all(&schema());
        assert_eq!(
            lines,
            vec![
                "Schema",
                "Import: Namespace:urn:x, Location:x.xsd",
                "ComplexType: A",
                "Sequence:  1:N",
                "Element: s1 (xs:string) ",
                "Element: s2 () ",
                "SimpleType: ",
                "Restriction: xs:int",
                "Enumeration: 1",
                "MaxInclusive: 9",
                "Attribute: at",
                "Choice:  ",
                "Element: c1 () ",
                "SimpleType: B",
                "Element: root (A) ",
            ]
        );
    }

    #[test]
    fn test_tree_view_indents_by_depth() {
        let view = tree_view(&schema());
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines[0], "0) Schema");
        assert_eq!(lines[2], "  1) ComplexType: A");
        assert_eq!(lines[3], "    2) Sequence:  1:N");
        assert_eq!(lines[7], "          5) Restriction: xs:int");
    }

    #[test]
    fn test_siblings_share_parent_context() {
        let schema = schema();
        let mut seen = Vec::new();
        let result: Result<(), ()> = walk_with_context(&schema, |node, parent: Option<&String>| {
            let label = node.describe();
            if let Node::Element(e) = node {
                seen.push((e.name.clone(), parent.cloned()));
            }
            Ok(label)
        });
        assert!(result.is_ok());

        assert_eq!(
            seen,
            vec![
                ("s1".to_string(), Some("Sequence:  1:N".to_string())),
                ("s2".to_string(), Some("Sequence:  1:N".to_string())),
                ("c1".to_string(), Some("Choice:  ".to_string())),
                ("root".to_string(), Some("Schema".to_string())),
            ]
        );
    }

    #[test]
    fn test_error_stops_walk() {
        let schema = schema();
        let mut visited = 0;
        let result = walk_with_context(&schema, |node, _: Option<&()>| {
            visited += 1;
            match node {
                Node::Attribute(a) => Err(a.name.clone()),
                _ => Ok(()),
            }
        });

        assert_eq!(result, Err("at".to_string()));
        // Everything up to and including the attribute, nothing after it
        assert_eq!(visited, 11);
    }

    #[test]
    fn test_empty_schema_visits_root_only() {
        let lines = describe_all(&Schema::default());
        assert_eq!(lines, vec!["Schema"]);
    }
}
