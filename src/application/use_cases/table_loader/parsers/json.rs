use serde_json::Value;
use std::collections::HashSet;

use super::super::TableLoader;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Column, Table};

impl TableLoader {
    pub(in crate::application::use_cases::table_loader) fn parse_json(
        &self,
        bytes: &[u8],
    ) -> Result<Table> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::FormatError(format!("invalid JSON: {}", e)))?;

        match value {
            Value::Array(rows) => table_from_records(rows),
            Value::Object(map) => table_from_column_arrays(map),
            _ => Err(AppError::FormatError(
                "JSON must be an array of row objects or an object of column arrays".to_string(),
            )),
        }
    }
}

/// Record-oriented shape: `[{"a": 1, "b": "x"}, ...]`. Columns are the union
/// of object keys in first-seen order; absent keys become missing cells.
fn table_from_records(rows: Vec<Value>) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records: Vec<serde_json::Map<String, Value>> = Vec::with_capacity(rows.len());

    for row in rows {
        let Value::Object(map) = row else {
            return Err(AppError::FormatError(
                "JSON array must contain row objects".to_string(),
            ));
        };
        for key in map.keys() {
            if seen.insert(key.clone()) {
                names.push(key.clone());
            }
        }
        records.push(map);
    }

    if names.is_empty() {
        return Err(AppError::FormatError("JSON contains no columns".to_string()));
    }

    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column {
            name,
            values: Vec::with_capacity(records.len()),
        })
        .collect();

    for record in &records {
        for column in columns.iter_mut() {
            let cell = record
                .get(&column.name)
                .map(cell_from_value)
                .unwrap_or(CellValue::Missing);
            column.values.push(cell);
        }
    }

    Table::new(columns)
}

/// Column-oriented shape: `{"a": [1, 2], "b": ["x", "y"]}`.
fn table_from_column_arrays(map: serde_json::Map<String, Value>) -> Result<Table> {
    if map.is_empty() {
        return Err(AppError::FormatError("JSON contains no columns".to_string()));
    }

    let mut columns = Vec::with_capacity(map.len());
    let mut expected_rows: Option<usize> = None;

    for (name, value) in map {
        let Value::Array(cells) = value else {
            return Err(AppError::FormatError(format!(
                "column '{}' is not an array",
                name
            )));
        };
        match expected_rows {
            Some(expected) if cells.len() != expected => {
                return Err(AppError::FormatError(
                    "column arrays have unequal lengths".to_string(),
                ));
            }
            None => expected_rows = Some(cells.len()),
            _ => {}
        }
        columns.push(Column {
            name,
            values: cells.iter().map(cell_from_value).collect(),
        });
    }

    Table::new(columns)
}

fn cell_from_value(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Missing,
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Missing),
        Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}
