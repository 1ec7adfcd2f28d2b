pub mod column_analyzer;
pub mod table_loader;
