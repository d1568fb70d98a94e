//! Shared application state.

use freaky_core::FreakyConfig;
use freaky_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: FreakyConfig,
    pub store: SqliteStore,
}

impl AppState {
    pub fn new(config: FreakyConfig, store: SqliteStore) -> Self {
        Self { config, store }
    }
}
