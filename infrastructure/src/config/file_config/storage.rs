//! Filesystem locations from TOML (`[storage]`, `[catalog]`, `[logging]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw `[storage]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding one JSON document per session
    pub dir: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

/// Raw `[catalog]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// JSON array of products
    pub path: PathBuf,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("mapeamento.json"),
        }
    }
}

/// Raw `[logging]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily rotated operation logs
    pub dir: Option<PathBuf>,
    /// JSONL transcript file
    pub conversation_log: Option<PathBuf>,
}
