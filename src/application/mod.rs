pub mod use_cases;

pub use use_cases::column_analyzer::ColumnAnalyzer;
pub use use_cases::table_loader::TableLoader;
