//! Cross-module checks of the naming conventions and output placement.

use rawdog_core::config::OutputConfig;
use rawdog_core::model::{Entity, Field, TypeKind, TypeSignature};
use rawdog_core::relations::infer_relations;
use rawdog_core::zero_value::zero_value_for;
use rawdog_core::{output, policy};
use std::path::Path;

fn tagged(name: &str, ty: &str, column: &str) -> Field {
    Field {
        name: name.to_string(),
        signature: TypeSignature::value(ty),
        tag: format!("db:\"{column}\""),
        column: column.to_string(),
    }
}

#[test]
fn test_order_customer_relation() {
    let order = Entity {
        name: "Order".to_string(),
        fields: vec![
            tagged("ID", "int", "order_id"),
            tagged("Customer", "int", "order_customer_id"),
            tagged("Total", "float64", "order_total"),
        ],
        is_augmented: false,
    };
    let relations = infer_relations(&order, "order");
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].joined_entity_name, "customer");
    assert_eq!(relations[0].accessor_name, "Customer");
    assert_eq!(relations[0].column_name, "order_customer_id");
}

#[test]
fn test_zero_values_by_kind() {
    let cases = [
        (TypeKind::Value, "string", "\"\""),
        (TypeKind::Value, "bool", "false"),
        (TypeKind::Value, "error", "nil"),
        (TypeKind::Value, "int64", "int64(0)"),
        (TypeKind::Value, "float32", "float32(0)"),
        (TypeKind::Value, "store.Widget", "store.Widget{}"),
        (TypeKind::QualifiedValue, "sql.NullString", "sql.NullString{}"),
        (TypeKind::Pointer, "*store.Widget", "nil"),
        (TypeKind::Sequence, "[]store.Widget", "nil"),
        (TypeKind::OpenType, "interface{}", "nil"),
    ];
    for (kind, rendered, expected) in cases {
        assert_eq!(zero_value_for(kind, rendered), expected, "{rendered}");
    }
}

#[test]
fn test_every_primitive_has_a_literal_zero_value() {
    for &name in policy::PRIMITIVES {
        let zero = zero_value_for(TypeKind::Value, name);
        assert!(!zero.ends_with("{}"), "{name} -> {zero}");
    }
}

#[test]
fn test_output_names_from_input_base() {
    let config = OutputConfig::default();
    let input = Path::new("models/account.go");
    assert_eq!(
        output::queries_path(Path::new("out"), input, &config).unwrap(),
        Path::new("out/account_generatedQueries.go")
    );
    assert_eq!(
        output::tests_path(Path::new("out"), input, &config).unwrap(),
        Path::new("out/account_generated_test.go")
    );
    assert!(output::is_generated(
        Path::new("out/account_generated_test.go"),
        &config
    ));
    assert!(!output::is_generated(input, &config));
}

#[test]
fn test_write_atomic_replaces_whole_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("out.go");
    output::write_atomic(&path, "first version, longer text\n").unwrap();
    output::write_atomic(&path, "second\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_signature_serializes_with_snake_case_kinds() {
    let sig = TypeSignature::pointer(TypeSignature::qualified(
        &TypeSignature::value("sql"),
        "Result",
    ));
    let json = serde_json::to_value(&sig).unwrap();
    assert_eq!(json["kind"], "pointer");
    assert_eq!(json["rendered"], "*sql.Result");
    assert_eq!(json["inner"]["kind"], "qualified_value");
    assert!(json["inner"].get("inner").is_none());
}
