use serde_json::json;

use super::*;

fn detail() -> ResultsDetail {
    serde_json::from_value(json!({
        "sectionTypes": ["cube_rotation_test", "brand_new_test"],
        "attempts": [
            {
                "student": {"name": "Ali", "nationalId": 9_981_234_567_i64},
                "score": 72.5,
                "sectionContributions": [40.0, 32.5]
            },
            {
                "student": {"name": "Sara", "nationalId": "X-77"},
                "score": 48
            }
        ]
    }))
    .unwrap()
}

// =============================================================
// Projection
// =============================================================

#[test]
fn project_uses_localized_headers() {
    let students = vec![Student { id: "s1".into(), name: "Ali".into(), national_id: 111, nominal_id: 7 }];

    let en = project(&students, Locale::En);
    assert_eq!(en.name, "Students");
    assert_eq!(en.headers, vec!["Name", "National ID", "Nominal ID"]);
    assert_eq!(en.rows, vec![vec![Cell::text("Ali"), Cell::Number(111.0), Cell::Number(7.0)]]);

    let ar = project(&students, Locale::Ar);
    assert_eq!(ar.headers[0], "الاسم");
    assert_eq!(ar.rows, en.rows);
}

#[test]
fn every_row_matches_header_width() {
    let join: JoinResponse = serde_json::from_value(json!({
        "id": 1, "name": "Lina", "email": "l@x.io", "major": "CS",
        "created_at": "2024-03-09T12:00:00Z"
    }))
    .unwrap();
    let sheet = project(&[join], Locale::En);
    assert_eq!(sheet.rows[0].len(), sheet.headers.len());
    assert_eq!(sheet.rows[0][6], Cell::text("09/03/2024"));
    assert_eq!(sheet.rows[0][10], Cell::Empty);
}

#[test]
fn coupon_without_status_exports_available() {
    let coupon: Coupon = serde_json::from_value(json!({
        "id": 3, "amount": 10, "maxDiscount": 5, "minPurchase": 20,
        "isPercentage": false, "code": "EID-1a2b"
    }))
    .unwrap();
    let row = coupon.row();
    assert_eq!(row.len(), Coupon::headers(Locale::En).len());
    assert_eq!(row[5], Cell::text("AVAILABLE"));
    assert_eq!(row[6], Cell::Empty);
}

// =============================================================
// Results document
// =============================================================

#[test]
fn results_sheet_headers_use_arabic_section_labels() {
    let sheet = results_sheet(&detail());
    assert_eq!(&sheet.headers[..3], &["الاسم", "الرقم الوطني", "الدرجة"]);
    assert_eq!(sheet.headers[3], ExamSectionType::CubeRotationTest.label_ar());
    assert_eq!(sheet.headers[4], "brand_new_test");
}

#[test]
fn results_sheet_rows_carry_section_contributions() {
    let sheet = results_sheet(&detail());
    assert_eq!(sheet.rows[0], vec![
        Cell::text("Ali"),
        Cell::Number(9_981_234_567.0),
        Cell::Number(72.5),
        Cell::Number(40.0),
        Cell::Number(32.5),
    ]);
    assert_eq!(sheet.rows[1], vec![Cell::text("Sara"), Cell::text("X-77"), Cell::Number(48.0)]);
}

#[test]
fn results_file_name_includes_exam() {
    assert_eq!(results_file_name("abc"), "exam-results-abc.xlsx");
}

// =============================================================
// Workbook
// =============================================================

#[test]
fn xlsx_bytes_are_a_zip_archive() {
    let bytes = to_xlsx_bytes(&results_sheet(&detail())).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn write_xlsx_creates_file() {
    let path = std::env::temp_dir().join(format!("export-{}.xlsx", uuid::Uuid::new_v4()));
    let sheet = Sheet { name: "Orders".into(), headers: vec!["ID".into()], rows: vec![vec![Cell::Number(1.0)]] };

    write_xlsx(&sheet, &path).unwrap();

    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    std::fs::remove_file(&path).unwrap();
}
