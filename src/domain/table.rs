use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::error::{AppError, Result};

/// Closed set of supported upload formats, keyed off the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Txt,
    Json,
    Docx,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_lowercase().as_str() {
            "csv" => Some(SourceFormat::Csv),
            "txt" => Some(SourceFormat::Txt),
            "json" => Some(SourceFormat::Json),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Txt => "txt",
            SourceFormat::Json => "json",
            SourceFormat::Docx => "docx",
        }
    }
}

/// A single cell. Values stay heterogeneous until the analyzer coerces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    /// Best-effort numeric view. Unparseable text, non-finite values ("NaN",
    /// "inf") and missing cells all yield None, keeping them out of the
    /// valid subset the analyzer aggregates over.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n).filter(|f| f.is_finite()),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            CellValue::Missing => None,
        }
    }

    /// Plain-text rendering used for chart labels.
    pub fn as_label(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Missing => String::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// An in-memory rectangular dataset: ordered named columns, ordered rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, enforcing the rectangular invariant.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let rows = first.values.len();
            if columns.iter().any(|c| c.values.len() != rows) {
                return Err(AppError::Internal(
                    "columns have unequal row counts".to_string(),
                ));
            }
        }
        Ok(Self { columns })
    }

    /// Build from a header row plus row-oriented text cells. Short rows pad
    /// with missing cells; extra cells beyond the header width are dropped.
    pub fn from_text_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if header.is_empty() {
            return Err(AppError::FormatError("input has no header row".to_string()));
        }

        let names = dedup_column_names(header);
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in &rows {
            for (idx, column) in columns.iter_mut().enumerate() {
                match row.get(idx) {
                    Some(cell) => column.values.push(CellValue::Text(cell.clone())),
                    None => column.values.push(CellValue::Missing),
                }
            }
        }

        Table::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }
}

/// Duplicate header names get a positional suffix so lookups stay unambiguous.
fn dedup_column_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let out = if *count == 0 {
                name.clone()
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("CSV"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_extension("docx"), Some(SourceFormat::Docx));
        assert_eq!(SourceFormat::from_extension("xlsx"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::Text(" 10 ".to_string()).as_number(), Some(10.0));
        assert_eq!(CellValue::Text("bad".to_string()).as_number(), None);
        assert_eq!(CellValue::Missing.as_number(), None);
    }

    #[test]
    fn test_non_finite_cells_are_not_numeric() {
        assert_eq!(CellValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("nan".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("inf".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("-inf".to_string()).as_number(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).as_number(), None);
    }

    #[test]
    fn test_cell_as_label() {
        assert_eq!(CellValue::Text("hello".to_string()).as_label(), "hello");
        assert_eq!(CellValue::Number(10.0).as_label(), "10");
        assert_eq!(CellValue::Number(1.5).as_label(), "1.5");
        assert_eq!(CellValue::Missing.as_label(), "");
    }

    #[test]
    fn test_from_text_rows_pads_short_rows() {
        let table = Table::from_text_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["3".to_string()],
            ],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        let b = table.column("b").unwrap();
        assert_eq!(b.values[1], CellValue::Missing);
    }

    #[test]
    fn test_from_text_rows_requires_header() {
        let err = Table::from_text_rows(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::FormatError(_)));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let table = Table::from_text_rows(
            vec!["a".to_string(), "a".to_string(), "a".to_string()],
            vec![vec!["1".to_string(), "2".to_string(), "3".to_string()]],
        )
        .unwrap();

        assert_eq!(table.column_names(), vec!["a", "a.1", "a.2"]);
        assert_eq!(
            table.column("a.2").unwrap().values[0],
            CellValue::Text("3".to_string())
        );
    }

    #[test]
    fn test_rectangular_invariant() {
        let err = Table::new(vec![
            Column {
                name: "a".to_string(),
                values: vec![CellValue::Missing],
            },
            Column {
                name: "b".to_string(),
                values: Vec::new(),
            },
        ])
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
