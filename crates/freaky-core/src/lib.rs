//! FreakyFashion Core: configuration, errors, and catalog primitives shared by every crate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod sku;
pub mod slug;

pub use catalog::Category;
pub use config::{DataPaths, FreakyConfig};
pub use error::{Error, Result};
pub use sku::{normalize_sku, validate_sku};
pub use slug::slugify;
