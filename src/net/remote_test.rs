use serde_json::json;

use super::*;

// =============================================================================
// Resource addressing
// =============================================================================

#[test]
fn rest_resource_defaults() {
    let resource = Resource::rest("exams");
    assert_eq!(resource.dialect, Dialect::Rest);
    assert_eq!(resource.envelope, Envelope::Bare);
    assert_eq!(resource.batch, Batch::PerItem);
    assert!(!resource.requires_scope());
    assert!(resource.is_addressable());
}

#[test]
fn table_resource_defaults_to_array_batch() {
    let resource = Resource::table("coupons");
    assert_eq!(resource.dialect, Dialect::Postgrest);
    assert_eq!(resource.batch, Batch::Array);
}

#[test]
fn placeholder_path_needs_scope() {
    let resource = Resource::rest("exams/{scope}/sections");
    assert!(resource.requires_scope());
    assert!(!resource.is_addressable());
    assert!(matches!(resource.collection_path(), Err(ApiError::InvalidUrl(_))));
}

#[test]
fn scoped_placeholder_path_substitutes() {
    let resource = Resource::rest("exams/{scope}/sections").scoped("ex-1");
    assert_eq!(resource.collection_path().unwrap(), "exams/ex-1/sections");
    assert_eq!(resource.record_path(&RecordId::from("s-9")).unwrap(), "exams/ex-1/sections/s-9");
}

#[test]
fn record_path_appends_numeric_id() {
    let resource = Resource::rest("students");
    assert_eq!(resource.record_path(&RecordId::Int(7)).unwrap(), "students/7");
}

#[test]
fn keyed_table_builds_eq_filter() {
    let resource = Resource::table("product_variants").keyed_by("productId").scoped("12");
    assert_eq!(
        resource.scope_filter().unwrap(),
        Some(("productId".to_owned(), "eq.12".to_owned()))
    );
    assert_eq!(resource.collection_path().unwrap(), "product_variants");
}

#[test]
fn keyed_table_without_scope_errors() {
    let resource = Resource::table("order_items").keyed_by("cartId");
    assert!(resource.requires_scope());
    assert!(resource.scope_filter().is_err());
}

// =============================================================================
// unwrap_rows
// =============================================================================

#[test]
fn unwrap_rows_bare_array() {
    let rows = unwrap_rows(json!([{"id": 1}, {"id": 2}]), Envelope::Bare).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn unwrap_rows_data_envelope() {
    let rows = unwrap_rows(json!({"data": [{"id": "a"}], "total": 1}), Envelope::Data).unwrap();
    assert_eq!(rows, vec![json!({"id": "a"})]);
}

#[test]
fn unwrap_rows_data_envelope_missing_field_errors() {
    let err = unwrap_rows(json!({"items": []}), Envelope::Data).unwrap_err();
    assert_eq!(err, ApiError::Decode("missing `data` field".into()));
}

#[test]
fn unwrap_rows_null_is_empty() {
    assert!(unwrap_rows(Value::Null, Envelope::Bare).unwrap().is_empty());
}

#[test]
fn unwrap_rows_rejects_objects() {
    let err = unwrap_rows(json!({"id": 1}), Envelope::Bare).unwrap_err();
    assert_eq!(err.to_string(), "response decode failed: expected a list, got an object");
}
