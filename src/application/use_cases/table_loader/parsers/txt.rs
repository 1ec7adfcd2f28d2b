use super::super::TableLoader;
use crate::domain::error::Result;
use crate::domain::table::Table;

impl TableLoader {
    // Plain-text uploads share the comma-delimited grammar but enter through
    // their own decode path.
    pub(in crate::application::use_cases::table_loader) fn parse_txt(
        &self,
        bytes: &[u8],
    ) -> Result<Table> {
        let content = super::csv::decode_text(bytes)?;
        super::csv::parse_delimited(&content)
    }
}
