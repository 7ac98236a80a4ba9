use serde_json::Value;
use thiserror::Error;

use crate::reports::{ReportTable, Row, infer_columns};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Unrecognized report payload: expected {{columns?, rows}}, {{data: {{...}}}} or an array of rows")]
    UnrecognizedShape,

    #[error("Column list must contain only strings")]
    InvalidColumns,

    #[error("Row {index} is not an object")]
    RowNotObject { index: usize },

    #[error("Row {index} field '{field}' holds a nested value")]
    NestedValue { index: usize, field: String },
}

/// Decodes a preview response body.
///
/// Accepts `{columns?, rows}`, `{data: {columns?, rows}}` or a bare array of
/// rows. Columns missing from the payload are inferred from the first row.
pub fn decode_payload(body: Value) -> Result<ReportTable, PayloadError> {
    match body {
        Value::Array(rows) => decode_rows(None, rows),
        Value::Object(mut object) => {
            if let Some(Value::Object(data)) = object.remove("data") {
                return decode_table_object(data);
            }
            decode_table_object(object)
        }
        _ => Err(PayloadError::UnrecognizedShape),
    }
}

fn decode_table_object(mut object: serde_json::Map<String, Value>) -> Result<ReportTable, PayloadError> {
    let Some(Value::Array(rows)) = object.remove("rows") else {
        return Err(PayloadError::UnrecognizedShape);
    };
    let columns = match object.remove("columns") {
        None | Some(Value::Null) => None,
        Some(Value::Array(columns)) => Some(
            columns
                .into_iter()
                .map(|c| match c {
                    Value::String(s) => Ok(s),
                    _ => Err(PayloadError::InvalidColumns),
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(_) => return Err(PayloadError::InvalidColumns),
    };
    decode_rows(columns, rows)
}

fn decode_rows(columns: Option<Vec<String>>, rows: Vec<Value>) -> Result<ReportTable, PayloadError> {
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(index, value)| validate_row(index, value))
        .collect::<Result<Vec<_>, _>>()?;
    let columns = columns.unwrap_or_else(|| infer_columns(&rows));
    Ok(ReportTable { columns, rows })
}

fn validate_row(index: usize, value: Value) -> Result<Row, PayloadError> {
    let Value::Object(row) = value else {
        return Err(PayloadError::RowNotObject { index });
    };
    if let Some((field, _)) = row.iter().find(|(_, v)| v.is_array() || v.is_object()) {
        return Err(PayloadError::NestedValue { index, field: field.clone() });
    }
    Ok(row)
}
