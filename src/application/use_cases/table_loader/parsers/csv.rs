use csv::{ReaderBuilder, Trim};

use super::super::TableLoader;
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

impl TableLoader {
    pub(in crate::application::use_cases::table_loader) fn parse_csv(
        &self,
        bytes: &[u8],
    ) -> Result<Table> {
        let content = decode_text(bytes)?;
        parse_delimited(&content)
    }
}

/// Decode upload bytes to text. BOM sniffing handles UTF-8/UTF-16 marked
/// files; anything else must be valid UTF-8.
pub(super) fn decode_text(bytes: &[u8]) -> Result<String> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        return Err(AppError::FormatError(
            "file is not valid UTF-8 text".to_string(),
        ));
    }
    Ok(text.into_owned())
}

/// Comma-delimited grammar shared by the csv and txt entry points. The first
/// record is the header row.
pub(super) fn parse_delimited(content: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::FormatError(format!("failed to read header row: {}", e)))?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::FormatError("input has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AppError::FormatError(format!("failed to parse row {}: {}", index + 1, e)))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Table::from_text_rows(headers.iter().map(|h| h.to_string()).collect(), rows)
}
