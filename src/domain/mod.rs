pub mod analysis;
pub mod error;
pub mod table;
