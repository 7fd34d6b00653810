//! Data directory configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sub-directory of `data_root` holding the link store.
pub const STORE_DIR: &str = "db";

/// Sub-directory of `data_root` holding shareable files.
pub const FILES_DIR: &str = "files";

/// Where Seclink keeps its runtime data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
}

impl StorageConfig {
    /// Directory of the persistent link store.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_root).join(STORE_DIR)
    }

    /// Root directory of the files that may be shared.
    pub fn files_path(&self) -> PathBuf {
        PathBuf::from(&self.data_root).join(FILES_DIR)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}
