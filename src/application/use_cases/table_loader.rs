use crate::domain::error::{AppError, Result};
use crate::domain::table::{SourceFormat, Table};

mod parsers;

/// Loads uploaded bytes into an in-memory table, dispatching on the declared
/// source format.
pub struct TableLoader;

impl TableLoader {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a file extension to a loader format. Unrecognized or missing
    /// extensions are a format error, mirroring the upload contract.
    pub fn format_for_extension(ext: &str) -> Result<SourceFormat> {
        SourceFormat::from_extension(ext)
            .ok_or_else(|| AppError::FormatError(format!("unsupported format: '{}'", ext)))
    }

    pub fn load(&self, bytes: &[u8], format: SourceFormat) -> Result<Table> {
        match format {
            SourceFormat::Csv => self.parse_csv(bytes),
            SourceFormat::Txt => self.parse_txt(bytes),
            SourceFormat::Json => self.parse_json(bytes),
            SourceFormat::Docx => self.parse_docx(bytes),
        }
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}
