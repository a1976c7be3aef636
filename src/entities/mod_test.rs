use serde_json::json;

use super::*;

#[test]
fn record_id_deserializes_both_wire_forms() {
    assert_eq!(serde_json::from_value::<RecordId>(json!(12)).unwrap(), RecordId::Int(12));
    assert_eq!(
        serde_json::from_value::<RecordId>(json!("8f1c")).unwrap(),
        RecordId::Text("8f1c".into())
    );
}

#[test]
fn record_id_from_str_prefers_integers() {
    assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Int(42));
    assert_eq!(" abc ".parse::<RecordId>().unwrap(), RecordId::Text("abc".into()));
}

#[test]
fn record_id_displays_raw_value() {
    assert_eq!(RecordId::Int(7).to_string(), "7");
    assert_eq!(RecordId::from("x-1").to_string(), "x-1");
}

#[test]
fn parse_timestamp_accepts_microsecond_rfc3339() {
    let ts = parse_timestamp("2024-05-01T09:30:00.123456+00:00").unwrap();
    assert_eq!(ts.date().to_string(), "2024-05-01");
}

#[test]
fn parse_timestamp_reads_offsetless_as_utc() {
    let ts = parse_timestamp("2024-05-01T23:59:59").unwrap();
    assert_eq!(ts.offset(), time::UtcOffset::UTC);
    assert_eq!(ts.hour(), 23);
}

#[test]
fn parse_timestamp_rejects_garbage() {
    assert!(parse_timestamp("").is_none());
    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn format_dmy_pads_day_and_month() {
    assert_eq!(format_dmy("2024-03-07T10:00:00Z"), "07/03/2024");
    assert_eq!(format_dmy("not a date"), "");
}
