//! Configuration file loading for negotia
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NEGOTIA_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./negotia.toml` or `./.negotia.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/negotia/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    AgentBackend, ConfigValidationError, FileAgentConfig, FileCatalogConfig, FileConfig,
    FileHostedConfig, FileLocalConfig, FileLoggingConfig, FileOutputConfig, FilePollingConfig,
    FileReplConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
