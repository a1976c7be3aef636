use std::collections::HashSet;
use std::sync::Arc;

use super::*;
use crate::net::memory::{MemoryRemote, Op};

// =============================================================
// Student import
// =============================================================

#[test]
fn student_lines_parse_and_trim() {
    let students = parse_student_lines("  Ali ,111,1\n\nSara, 222 ,2\n").unwrap();
    assert_eq!(
        students,
        vec![
            NewStudent { name: "Ali".into(), national_id: 111, nominal_id: 1 },
            NewStudent { name: "Sara".into(), national_id: 222, nominal_id: 2 },
        ]
    );
}

#[test]
fn malformed_number_rejects_whole_import() {
    let err = parse_student_lines("Ali,111,1\nSara,abc,2").unwrap_err();
    assert_eq!(err, BulkError::InvalidNumber { line: 2, field: "national_id", value: "abc".into() });
    assert_eq!(err.to_string(), "line 2: national_id 'abc' is not a number");
}

#[test]
fn short_line_reports_line_number() {
    assert_eq!(parse_student_lines("\nAli,111").unwrap_err(), BulkError::MissingField { line: 2 });
}

#[test]
fn blank_name_rejected() {
    assert_eq!(parse_student_lines(" ,1,2").unwrap_err(), BulkError::EmptyName { line: 1 });
}

#[test]
fn blank_import_is_empty_error() {
    assert_eq!(parse_student_lines("\n  \n").unwrap_err(), BulkError::Empty);
}

#[tokio::test]
async fn import_sends_one_bulk_call() {
    let remote = Arc::new(MemoryRemote::new());
    let view = ListView::<Student>::new(remote.clone());

    assert_eq!(import_students(&view, "Ali,1,2\nSara,3,4").await.unwrap(), 2);
    assert_eq!(remote.count(Op::Insert), 1);
    assert_eq!(remote.rows("students").len(), 2);
}

#[tokio::test]
async fn bad_import_sends_nothing() {
    let remote = Arc::new(MemoryRemote::new());
    let view = ListView::<Student>::new(remote.clone());

    assert!(import_students(&view, "Ali,x,2").await.is_err());
    assert!(remote.calls().is_empty());
}

// =============================================================
// Coupons
// =============================================================

fn template(code: &str) -> CouponTemplate {
    CouponTemplate { code: code.into(), amount: 10.0, max_discount: 5.0, min_purchase: 20.0, is_percentage: true }
}

#[test]
fn unique_code_has_prefix_and_hex_suffix() {
    let code = unique_code("SUMMER");
    let suffix = code.strip_prefix("SUMMER-").unwrap();
    assert_eq!(suffix.len(), 4);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn coupon_batch_copies_template() {
    let batch = coupon_batch(&template(" EID "), 5).unwrap();
    assert_eq!(batch.len(), 5);
    assert!(batch.iter().all(|c| c.code.starts_with("EID-") && c.is_percentage && c.amount == 10.0));
    let codes: HashSet<_> = batch.iter().map(|c| c.code.as_str()).collect();
    assert!(codes.len() >= 4, "codes should be effectively unique: {codes:?}");
}

#[test]
fn coupon_batch_validates_input() {
    assert_eq!(coupon_batch(&template("  "), 3).unwrap_err(), BulkError::EmptyCode);
    assert_eq!(coupon_batch(&template("X"), 0).unwrap_err(), BulkError::ZeroQuantity);
}

#[tokio::test]
async fn coupons_insert_one_request_each() {
    let remote = Arc::new(MemoryRemote::new());
    let view = ListView::<Coupon>::new(remote.clone());

    let codes = create_coupons(&view, &template("VIP"), 3).await.unwrap();

    assert_eq!(codes.len(), 3);
    assert_eq!(remote.rows("coupons").len(), 3);
    assert_eq!(remote.rows("coupons")[0]["maxDiscount"], 5.0);
}

// =============================================================
// Variants
// =============================================================

#[test]
fn presets_cover_sizes_36_to_45() {
    for preset in [SizePreset::Shoes, SizePreset::Apparel] {
        let variants = variant_preset(9, preset, 12);
        let sizes: Vec<_> = variants.iter().map(|v| v.size.as_str()).collect();
        assert_eq!(sizes.len(), 10);
        assert_eq!(sizes.first(), Some(&"36"));
        assert_eq!(sizes.last(), Some(&"45"));
        assert!(variants.iter().all(|v| v.product_id == 9 && v.stock_quantity == 12));
    }
}

#[test]
fn preset_parses_names() {
    assert_eq!("Shoes".parse::<SizePreset>().unwrap(), SizePreset::Shoes);
    assert!("hats".parse::<SizePreset>().is_err());
}

#[tokio::test]
async fn preset_inserts_under_product_scope() {
    let remote = Arc::new(MemoryRemote::new());
    let view = ListView::<ProductVariant>::new(remote.clone());
    view.set_scope("9").await.unwrap();

    assert_eq!(apply_preset(&view, 9, SizePreset::Apparel, 3).await.unwrap(), 10);
    assert_eq!(view.records().await.len(), 10);
}

// =============================================================
// Sections
// =============================================================

#[test]
fn section_rows_serialize_type_key() {
    let rows = section_rows(&[ExamSectionType::CubeRotationTest]);
    assert_eq!(serde_json::to_value(&rows).unwrap(), serde_json::json!([{"type": "cube_rotation_test"}]));
}

#[tokio::test]
async fn empty_section_selection_is_noop() {
    let remote = Arc::new(MemoryRemote::new());
    let view = ListView::<ExamSection>::new(remote.clone());
    view.set_scope("e1").await.unwrap();
    let before = remote.calls().len();

    assert_eq!(add_sections(&view, &[]).await.unwrap(), 0);
    assert_eq!(remote.calls().len(), before);
}

#[tokio::test]
async fn sections_added_in_one_call() {
    let remote = Arc::new(MemoryRemote::new());
    let view = ListView::<ExamSection>::new(remote.clone());
    view.set_scope("e1").await.unwrap();

    let added = add_sections(&view, &[ExamSectionType::DiceFoldingTest, ExamSectionType::FocusedAttention])
        .await
        .unwrap();

    assert_eq!(added, 2);
    assert_eq!(remote.count(Op::Insert), 1);
    assert_eq!(remote.rows("exams/e1/sections").len(), 2);
}
