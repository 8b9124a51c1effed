//! Property-based tests for the resource mapping engine.
//!
//! The central guarantee: no property value ever silently disappears
//! through a mapping. Every leaf value in the input is present in the
//! output, either under its mapped target path or verbatim under its
//! original path.

use panconfig::ir::{Properties, Value};
use panconfig::mapping::{MappingEngine, PropertyMapping, ResourceTypeMapping};
use proptest::prelude::*;

/// Keys drawn from a small alphabet so rules sometimes hit, sometimes
/// miss. Mapped targets use an uppercase namespace that the generator
/// below can never produce, so moves cannot collide with input keys.
fn arb_key() -> impl Strategy<Value = String> {
    "[a-f]{1,3}"
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1_000i64..1_000).prop_map(|n| Value::Number(n as f64)),
        "[a-z0-9]{0,8}".prop_map(Value::String),
    ]
}

/// Flat or one-level-nested property maps.
fn arb_properties() -> impl Strategy<Value = Properties> {
    let value = prop_oneof![
        3 => arb_scalar(),
        1 => prop::collection::btree_map(arb_key(), arb_scalar(), 1..4).prop_map(Value::Map),
    ];
    prop::collection::btree_map(arb_key(), value, 0..8)
}

fn mapped_engine() -> MappingEngine {
    let mut engine = MappingEngine::new();
    engine.register_mapping(
        "terraform",
        "cloudformation",
        ResourceTypeMapping::new("widget", "Vendor::Widget")
            .with_property(PropertyMapping::renamed("a", "A").expect("path"))
            .with_property(PropertyMapping::renamed("b", "Nested.B").expect("path"))
            .with_property(PropertyMapping::renamed("c.a", "C").expect("path")),
    );
    engine
}

/// Collects every leaf value in a property tree, sorted for multiset
/// comparison.
fn leaf_values(properties: &Properties) -> Vec<String> {
    fn walk(value: &Value, leaves: &mut Vec<String>) {
        match value {
            Value::Map(map) => {
                for child in map.values() {
                    walk(child, leaves);
                }
            }
            Value::List(items) => {
                for item in items {
                    walk(item, leaves);
                }
            }
            leaf => leaves.push(format!("{:?}", leaf)),
        }
    }

    let mut leaves = Vec::new();
    for value in properties.values() {
        walk(value, &mut leaves);
    }
    leaves.sort();
    leaves
}

proptest! {
    #[test]
    fn unregistered_type_is_identity(properties in arb_properties()) {
        let engine = mapped_engine();
        let output = engine.map_properties(
            "terraform",
            "cloudformation",
            "unknown_type",
            properties.clone(),
        );
        prop_assert_eq!(output, properties);
    }

    #[test]
    fn no_leaf_value_disappears(properties in arb_properties()) {
        let engine = mapped_engine();
        let before = leaf_values(&properties);

        let output = engine.map_properties(
            "terraform",
            "cloudformation",
            "widget",
            properties,
        );

        prop_assert_eq!(leaf_values(&output), before);
    }

    #[test]
    fn unmapped_keys_survive_verbatim(properties in arb_properties()) {
        let engine = mapped_engine();
        let expected: Vec<(String, Value)> = properties
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "a" | "b" | "c"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let output = engine.map_properties(
            "terraform",
            "cloudformation",
            "widget",
            properties,
        );

        for (key, value) in expected {
            prop_assert_eq!(output.get(&key), Some(&value));
        }
    }

    #[test]
    fn mapping_twice_equals_mapping_once(properties in arb_properties()) {
        let engine = mapped_engine();

        let once = engine.map_properties(
            "terraform",
            "cloudformation",
            "widget",
            properties,
        );
        let twice = engine.map_properties(
            "terraform",
            "cloudformation",
            "widget",
            once.clone(),
        );

        prop_assert_eq!(twice, once);
    }
}
