use crate::*;
use serde_json::json;

#[test]
fn json_array_import_infers_types_from_first_row() {
    let table = Table::from_json_str(
        r#"[
            {"region": "North", "sales": 120, "active": true},
            {"region": "South", "sales": "n/a", "active": false}
        ]"#,
    )
    .unwrap();
    assert_eq!(table.columns, vec!["region", "sales", "active"]);
    assert_eq!(table.data.len(), 2);
    assert_eq!(table.data_types["region"], FieldType::String);
    assert_eq!(table.data_types["sales"], FieldType::Number);
    assert_eq!(table.data_types["active"], FieldType::Boolean);
}

#[test]
fn json_object_import_uses_first_array_property() {
    let table = Table::from_json_str(
        r#"{"meta": {"v": 1}, "rows": [{"a": 1}, {"a": 2}], "other": [{"b": 1}]}"#,
    )
    .unwrap();
    assert_eq!(table.columns, vec!["a"]);
    assert_eq!(table.data.len(), 2);
}

#[test]
fn json_object_without_rows_becomes_single_record() {
    let table = Table::from_json_str(r#"{"name": "solo", "score": 3}"#).unwrap();
    assert_eq!(table.data.len(), 1);
    assert_eq!(table.columns, vec!["name", "score"]);
}

#[test]
fn json_scalar_document_is_rejected() {
    let err = Table::from_json_str("42").unwrap_err();
    assert!(matches!(err, Error::DatasetImport { ref format, .. } if format == "json"));
    assert!(matches!(Table::from_json_str("{oops"), Err(Error::Json(_))));
}

#[test]
fn csv_import_types_cells_dynamically() {
    let csv = "city,temp,rainy,when,note\n\
               Oslo,4.5,true,2024-01-02T03:04:05Z,cold\n\
               Rome,,FALSE,2024-01-03T00:00:00,\n";
    let table = Table::from_csv_str(csv).unwrap();
    assert_eq!(table.columns, vec!["city", "temp", "rainy", "when", "note"]);
    assert_eq!(table.data.len(), 2);
    assert_eq!(table.data_types["city"], FieldType::String);
    assert_eq!(table.data_types["temp"], FieldType::Number);
    assert_eq!(table.data_types["rainy"], FieldType::Boolean);
    assert_eq!(table.data_types["when"], FieldType::Date);

    let rome = &table.data[1];
    assert_eq!(rome.get("temp"), None);
    assert_eq!(rome.get("note"), None);
    assert_eq!(rome.get("rainy"), Some(&Scalar::Bool(false)));
    assert_eq!(
        rome.get("when").map(Scalar::field_type),
        Some(FieldType::Date)
    );
}

#[test]
fn csv_keeps_non_decimal_tokens_as_text() {
    let table = Table::from_csv_str("v\ninf\n0x10\n1e3\n").unwrap();
    assert_eq!(table.data[0].get("v"), Some(&Scalar::from("inf")));
    assert_eq!(table.data[1].get("v"), Some(&Scalar::from("0x10")));
    assert_eq!(table.data[2].get("v"), Some(&Scalar::Number(1000.0)));
}

#[test]
fn empty_table_has_no_types() {
    let table = Table::from_json_str("[]").unwrap();
    assert!(table.columns.is_empty());
    assert!(table.data_types.is_empty());
}

#[test]
fn default_dimensions_prefer_categorical_x_and_numeric_y() {
    let table = Table::from_json_value(json!([
        {"value": 3, "label": "a", "other": "b"}
    ]))
    .unwrap();
    let dims = table.default_dimensions();
    assert_eq!(dims.x.as_deref(), Some("label"));
    assert_eq!(dims.y.as_deref(), Some("value"));
}

#[test]
fn default_dimensions_fall_back_to_column_order() {
    let table = Table::from_json_value(json!([{"a": "x", "b": "y"}])).unwrap();
    let dims = table.default_dimensions();
    assert_eq!(dims.x.as_deref(), Some("a"));
    assert_eq!(dims.y.as_deref(), Some("b"));

    let table = Table::from_json_value(json!([{"n": 1}])).unwrap();
    let dims = table.default_dimensions();
    assert_eq!(dims.x.as_deref(), Some("n"));
    assert_eq!(dims.y.as_deref(), Some("n"));

    assert_eq!(
        default_dimensions(&[], &Default::default()),
        DefaultDimensions::default()
    );
}

#[test]
fn dataset_wraps_table_with_identity() {
    let ds = Dataset::from_json_str("Sales", "user-1", r#"[{"k": "a", "v": 1}]"#)
        .unwrap()
        .with_description("quarterly");
    assert_eq!(ds.name, "Sales");
    assert_eq!(ds.owner_id, "user-1");
    assert!(!ds.id.is_empty());
    assert!(ds.shared_with.is_empty());
    assert_eq!(ds.description.as_deref(), Some("quarterly"));
    let v = serde_json::to_value(&ds).unwrap();
    assert_eq!(v["dataTypes"], json!({"k": "string", "v": "number"}));
    assert_eq!(v["ownerId"], json!("user-1"));
}
