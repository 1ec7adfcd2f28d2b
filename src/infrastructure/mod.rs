pub mod config;
pub mod table_store;
