use serde_json::json;

use crate::reports::{PayloadError, decode_payload};

#[test]
fn test_decodes_columns_and_rows() {
    let table = decode_payload(json!({
        "columns": ["b", "a"],
        "rows": [{ "a": 1, "b": "x" }]
    }))
    .unwrap();
    assert_eq!(table.columns, vec!["b", "a"]);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_decodes_data_envelope() {
    let table = decode_payload(json!({
        "data": { "rows": [{ "name": "Alice", "hours": 8.5 }] }
    }))
    .unwrap();
    assert_eq!(table.columns, vec!["name", "hours"]);
    assert_eq!(table.rows[0]["hours"], json!(8.5));
}

#[test]
fn test_decodes_bare_array() {
    let table = decode_payload(json!([
        { "id": 1, "status": "Active" },
        { "id": 2, "status": null }
    ]))
    .unwrap();
    assert_eq!(table.columns, vec!["id", "status"]);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_empty_rows_have_no_columns() {
    let table = decode_payload(json!({ "rows": [] })).unwrap();
    assert!(table.is_empty());
    assert!(table.columns.is_empty());
}

#[test]
fn test_rejects_unknown_shapes() {
    assert_eq!(decode_payload(json!("rows")), Err(PayloadError::UnrecognizedShape));
    assert_eq!(decode_payload(json!({ "items": [] })), Err(PayloadError::UnrecognizedShape));
    assert_eq!(decode_payload(json!({ "columns": "a", "rows": [] })), Err(PayloadError::InvalidColumns));
    assert_eq!(decode_payload(json!({ "columns": [1], "rows": [] })), Err(PayloadError::InvalidColumns));
}

#[test]
fn test_rejects_bad_rows_with_index() {
    assert_eq!(
        decode_payload(json!([{ "a": 1 }, 42])),
        Err(PayloadError::RowNotObject { index: 1 })
    );
    assert_eq!(
        decode_payload(json!({ "rows": [{ "a": 1 }, { "a": 2 }, { "a": { "nested": true } }] })),
        Err(PayloadError::NestedValue { index: 2, field: "a".to_string() })
    );
}
