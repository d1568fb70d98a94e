//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Image used for categories created without one.
pub const DEFAULT_CATEGORY_IMAGE: &str = "/images/freakyfashion-placeholder.png";

/// Paths to the FreakyFashion data directory and its files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database file (`data/freakyfashion.db`).
    pub database: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            database: root.join("freakyfashion.db"),
            root,
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreakyConfig {
    /// HTTP server port.
    pub port: u16,
    pub data_paths: DataPaths,
    /// Fallback image for categories.
    pub placeholder_image: String,
}

impl FreakyConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            placeholder_image: DEFAULT_CATEGORY_IMAGE.to_string(),
        })
    }
}
