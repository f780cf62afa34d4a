pub mod models;
pub mod queries;
pub mod source;
pub mod sqlite;

pub use source::{RowBatch, RowSource};
pub use sqlite::Database;
