use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::analysis::{AnalysisResult, ChartData, SummaryStats};
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Table};

/// Computes summary statistics and a chart series for an x/y column pair.
///
/// Coercion is best-effort: a y cell that fails to parse becomes a missing
/// value rather than an error. Only whole-column failures surface.
pub struct ColumnAnalyzer;

impl ColumnAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, table: &Table, x_col: &str, y_col: &str) -> Result<AnalysisResult> {
        let (Some(x), Some(y)) = (table.column(x_col), table.column(y_col)) else {
            return Err(AppError::AnalysisError("invalid columns".to_string()));
        };

        let values: Vec<Option<f64>> = y.values.iter().map(|cell| cell.as_number()).collect();
        if values.iter().all(|v| v.is_none()) {
            return Err(AppError::AnalysisError(format!(
                "column '{}' is not numeric",
                y_col
            )));
        }

        // All-or-nothing date detection: one unparseable x cell means every
        // label falls back to plain text.
        let labels = date_labels(&x.values)
            .unwrap_or_else(|| x.values.iter().map(|cell| cell.as_label()).collect());

        let valid: Vec<f64> = values.iter().copied().flatten().collect();
        let average = valid.iter().sum::<f64>() / valid.len() as f64;
        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let stats = SummaryStats {
            average,
            min,
            max,
            // Row count before coercion, so callers see how many rows the
            // table has rather than how many cells parsed.
            data_points: table.row_count(),
        };

        let chart_values: Vec<f64> = values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();

        Ok(AnalysisResult {
            stats,
            chart_data: ChartData {
                labels,
                values: chart_values,
            },
            x_label: x_col.to_string(),
            y_label: y_col.to_string(),
        })
    }
}

impl Default for ColumnAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// ISO `YYYY-MM-DD` labels when the entire x column parses as dates,
/// otherwise None.
fn date_labels(cells: &[CellValue]) -> Option<Vec<String>> {
    cells
        .iter()
        .map(|cell| {
            let text = cell.as_text()?;
            parse_date(text).map(|d| d.format("%Y-%m-%d").to_string())
        })
        .collect()
}

/// Try a few common date and datetime formats, in a fixed order. Day-first
/// is tried before month-first, so an ambiguous date like `06/02/2023`
/// always reads as February 6; month-first parsers would pick June 2.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::table_loader::TableLoader;
    use crate::domain::table::SourceFormat;

    fn load_csv(content: &str) -> Table {
        TableLoader::new()
            .load(content.as_bytes(), SourceFormat::Csv)
            .unwrap()
    }

    #[test]
    fn test_mixed_numeric_column() {
        let table = load_csv("date,sales\n2023-01-01,10\n2023-01-02,bad\n2023-01-03,30\n");
        let result = ColumnAnalyzer::new().analyze(&table, "date", "sales").unwrap();

        assert_eq!(
            result.chart_data.labels,
            vec!["2023-01-01", "2023-01-02", "2023-01-03"]
        );
        assert_eq!(result.chart_data.values[0], 10.0);
        assert!(result.chart_data.values[1].is_nan());
        assert_eq!(result.chart_data.values[2], 30.0);

        // stats exclude the bad cell, data_points does not
        assert_eq!(result.stats.average, 20.0);
        assert_eq!(result.stats.min, 10.0);
        assert_eq!(result.stats.max, 30.0);
        assert_eq!(result.stats.data_points, 3);

        assert_eq!(result.x_label, "date");
        assert_eq!(result.y_label, "sales");
    }

    #[test]
    fn test_load_analyze_round_trip_counts_rows() {
        let table = load_csv("a,b\n1,2\n3,4\n5,6\n7,8\n");
        let result = ColumnAnalyzer::new().analyze(&table, "a", "b").unwrap();
        assert_eq!(result.stats.data_points, 4);
        assert_eq!(result.chart_data.labels.len(), 4);
        assert_eq!(result.chart_data.values.len(), 4);
    }

    #[test]
    fn test_invalid_columns() {
        let table = load_csv("a,b\n1,2\n");
        let err = ColumnAnalyzer::new()
            .analyze(&table, "a", "nope")
            .unwrap_err();
        assert!(matches!(err, AppError::AnalysisError(_)));
        assert!(err.to_string().contains("invalid columns"));
    }

    #[test]
    fn test_fully_non_numeric_y_is_rejected() {
        let table = load_csv("name,label\nAlice,x\nBob,y\n");
        let err = ColumnAnalyzer::new()
            .analyze(&table, "name", "label")
            .unwrap_err();
        assert!(matches!(err, AppError::AnalysisError(_)));
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_nan_text_is_excluded_from_stats() {
        let table = load_csv("x,y\na,10\nb,NaN\nc,30\n");
        let result = ColumnAnalyzer::new().analyze(&table, "x", "y").unwrap();

        assert_eq!(result.stats.average, 20.0);
        assert_eq!(result.stats.min, 10.0);
        assert_eq!(result.stats.max, 30.0);
        assert_eq!(result.stats.data_points, 3);
        assert!(result.chart_data.values[1].is_nan());
    }

    #[test]
    fn test_all_nan_text_column_is_rejected() {
        let table = load_csv("x,y\na,NaN\nb,NaN\n");
        let err = ColumnAnalyzer::new().analyze(&table, "x", "y").unwrap_err();
        assert!(matches!(err, AppError::AnalysisError(_)));
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_empty_table_y_is_rejected() {
        let table = load_csv("a,b\n");
        let err = ColumnAnalyzer::new().analyze(&table, "a", "b").unwrap_err();
        assert!(matches!(err, AppError::AnalysisError(_)));
    }

    #[test]
    fn test_one_bad_date_falls_back_to_text_labels() {
        let table = load_csv("when,v\n2023-01-01,1\nnot-a-date,2\n");
        let result = ColumnAnalyzer::new().analyze(&table, "when", "v").unwrap();
        assert_eq!(result.chart_data.labels, vec!["2023-01-01", "not-a-date"]);
    }

    #[test]
    fn test_date_formats_normalize_to_iso() {
        let table = load_csv("when,v\n2023/01/05,1\n06-02-2023,2\n2023-03-07 13:45:00,3\n");
        let result = ColumnAnalyzer::new().analyze(&table, "when", "v").unwrap();
        assert_eq!(
            result.chart_data.labels,
            vec!["2023-01-05", "2023-02-06", "2023-03-07"]
        );
    }

    #[test]
    fn test_numeric_x_column_uses_text_labels() {
        let table = load_csv("bucket,v\n1,10\n2,20\n");
        let result = ColumnAnalyzer::new().analyze(&table, "bucket", "v").unwrap();
        assert_eq!(result.chart_data.labels, vec!["1", "2"]);
    }

    #[test]
    fn test_labels_and_values_always_parallel() {
        let table = load_csv("x,y\na,1\nb,\nc,3\n");
        let result = ColumnAnalyzer::new().analyze(&table, "x", "y").unwrap();
        assert_eq!(result.chart_data.labels.len(), table.row_count());
        assert_eq!(result.chart_data.values.len(), table.row_count());
    }

    #[test]
    fn test_parse_date_rejects_noise() {
        assert!(parse_date("").is_none());
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("2023-13-40").is_none());
        assert_eq!(
            parse_date("15/01/2023"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
    }
}
