//! FreakyFashion Store: SQLite persistence for products, categories and their links.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
