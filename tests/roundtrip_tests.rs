//! Decode/encode round-trip and traversal tests over fixture schemas

use std::collections::BTreeMap;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xsdmsg::model::{ComplexType, Element, Sequence};
use xsdmsg::namespaces::XSD_NAMESPACE;
use xsdmsg::{describe_all, tree_view, walk, Node, Schema, TargetFormat};

fn fixture_text(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[test]
fn test_fixtures_round_trip() {
    for name in ["person.xsd", "order.xsd", "envelope.xsd"] {
        let original: Schema = fixture_text(name).parse().unwrap();
        let encoded = original.to_xml().unwrap();
        let decoded: Schema = encoded.parse().unwrap();
        assert_eq!(decoded, original, "{}", name);
    }
}

#[test]
fn test_order_decoded_fields() {
    let schema: Schema = fixture_text("order.xsd").parse().unwrap();

    assert_eq!(schema.prefix, "xs");
    assert_eq!(schema.target_namespace, "urn:example:orders");
    assert_eq!(schema.imports.len(), 1);
    assert_eq!(schema.imports[0].schema_location, "other.xsd");
    assert_eq!(schema.namespaces.get_namespace("ns"), Some("urn:example:other"));

    let order = &schema.complex_types[0];
    assert_eq!(order.name, "Order");
    assert_eq!(order.attributes[0].usage, "required");
    let sequence = order.sequence.as_ref().unwrap();
    assert_eq!(sequence.elements.len(), 4);
    assert!(sequence.elements[1].complex_type.is_some());
    assert_eq!(
        sequence.elements[3]
            .simple_type
            .as_ref()
            .and_then(|st| st.restriction.as_ref())
            .map(|r| r.enumerations.len()),
        Some(2)
    );
}

#[test]
fn test_person_tree_view() {
    let schema: Schema = fixture_text("person.xsd").parse().unwrap();

    let expected = [
        "0) Schema",
        "  1) ComplexType: Person",
        "    2) Sequence:  ",
        "      3) Element: name (xs:string) 1:1",
        "      3) Element: age (xs:int) 0:1",
    ]
    .join("\n");
    assert_eq!(tree_view(&schema), expected);
}

#[test]
fn test_describe_all_visits_every_node() {
    let schema: Schema = fixture_text("envelope.xsd").parse().unwrap();

    let mut kinds = Vec::new();
    walk(&schema, |node: Node<'_>| kinds.push(node.kind()));
    assert_eq!(kinds.len(), describe_all(&schema).len());
    assert_eq!(
        kinds,
        vec![
            "schema",
            "complexType",
            "simpleContent",
            "extension",
            "attribute",
            "attribute",
            "element",
            "complexType",
            "sequence",
            "element",
            "element",
            "attribute",
            "simpleType",
            "restriction",
            "minInclusive",
            "maxInclusive",
            "annotation",
        ]
    );
}

#[test]
fn test_malformed_input_is_decode_error() {
    let err = "<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\"><xs:element>"
        .parse::<Schema>()
        .unwrap_err();
    assert!(matches!(err, xsdmsg::Error::Decode(_)), "{}", err);

    let err = "<root/>".parse::<Schema>().unwrap_err();
    assert!(err.to_string().contains("schema"));
}

const MIN_OCCURS: &[&str] = &["", "0", "1"];
const MAX_OCCURS: &[&str] = &["", "1", "3", "unbounded"];
const XSD_TYPES: &[&str] = &[
    "xs:string",
    "xs:int",
    "xs:long",
    "xs:boolean",
    "xs:dateTime",
    "xs:double",
];

fn element_strategy() -> impl Strategy<Value = Element> {
    (
        "[a-z]{1,6}",
        prop::sample::select(XSD_TYPES),
        prop::sample::select(MIN_OCCURS),
        prop::sample::select(MAX_OCCURS),
    )
        .prop_map(|(name, type_name, min, max)| Element {
            name,
            type_name: type_name.to_string(),
            min_occurs: min.to_string(),
            max_occurs: max.to_string(),
            ..Default::default()
        })
}

fn schema_strategy() -> impl Strategy<Value = Schema> {
    prop::collection::btree_map(
        "[A-Z][a-z]{0,6}",
        prop::collection::vec(element_strategy(), 0..5),
        0..5,
    )
    .prop_map(|types: BTreeMap<String, Vec<Element>>| {
        let mut schema = Schema {
            prefix: "xs".into(),
            ..Default::default()
        };
        schema.namespaces.add_prefix("xs", XSD_NAMESPACE);
        schema.complex_types = types
            .into_iter()
            .map(|(name, elements)| ComplexType {
                name,
                sequence: Some(Sequence {
                    elements,
                    ..Default::default()
                }),
                ..Default::default()
            })
            .collect();
        schema
    })
}

proptest! {
    #[test]
    fn prop_encode_decode_round_trip(schema in schema_strategy()) {
        let decoded: Schema = schema.to_xml().unwrap().parse().unwrap();
        prop_assert_eq!(decoded, schema);
    }

    #[test]
    fn prop_one_item_per_element(schema in schema_strategy()) {
        let messages = schema.messages(TargetFormat::Protobuf).unwrap();
        prop_assert_eq!(messages.len(), schema.complex_types.len());

        for (message, ct) in messages.iter().zip(&schema.complex_types) {
            prop_assert_eq!(&message.name, &ct.name);
            prop_assert!(message.is_root);

            let elements = &ct.sequence.as_ref().unwrap().elements;
            prop_assert_eq!(message.items.len(), elements.len());
            for (item, element) in message.items.iter().zip(elements) {
                prop_assert_eq!(item.repeated, element.max_occurs == "unbounded" || element.max_occurs == "3");
                prop_assert!(!item.type_name.starts_with("xs:"));
            }
        }
    }
}
