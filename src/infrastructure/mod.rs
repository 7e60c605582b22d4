pub mod csv;
pub mod quotes;
