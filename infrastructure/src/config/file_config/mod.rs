//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::validate`] checks the
//! cross-field rules before anything is built from them.

mod agent;
mod output;
mod polling;
mod repl;
mod storage;

pub use agent::{AgentBackend, FileAgentConfig, FileHostedConfig, FileLocalConfig};
pub use output::FileOutputConfig;
pub use polling::FilePollingConfig;
pub use repl::FileReplConfig;
pub use storage::{FileCatalogConfig, FileLoggingConfig, FileStorageConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value that cannot be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("polling.multiplier must be >= 1.0 (got {0})")]
    InvalidMultiplier(f64),

    #[error("polling.max_wait_seconds must be greater than 0")]
    ZeroMaxWait,

    #[error("hosted.assistant_id is required when agent.backend = \"hosted\"")]
    MissingAssistantId,

    #[error("local.model is required when agent.backend = \"local\"")]
    MissingLocalModel,

    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Which agent backend to use
    pub agent: FileAgentConfig,
    /// Hosted assistant settings
    pub hosted: FileHostedConfig,
    /// Local streaming model settings
    pub local: FileLocalConfig,
    /// Run polling settings (hosted backend)
    pub polling: FilePollingConfig,
    /// Session storage settings
    pub storage: FileStorageConfig,
    /// Product catalog settings
    pub catalog: FileCatalogConfig,
    /// Log file and transcript settings
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.polling.multiplier.is_nan() || self.polling.multiplier < 1.0 {
            errors.push(ConfigValidationError::InvalidMultiplier(
                self.polling.multiplier,
            ));
        }
        if self.polling.max_wait_seconds == 0 {
            errors.push(ConfigValidationError::ZeroMaxWait);
        }

        match self.agent.backend {
            AgentBackend::Hosted => {
                if self.hosted.assistant_id.trim().is_empty() {
                    errors.push(ConfigValidationError::MissingAssistantId);
                }
            }
            AgentBackend::Local => {
                if self.local.model.trim().is_empty() {
                    errors.push(ConfigValidationError::MissingLocalModel);
                }
            }
        }

        if self.storage.dir.as_os_str().is_empty() {
            errors.push(ConfigValidationError::EmptyPath { field: "storage.dir" });
        }
        if self.catalog.path.as_os_str().is_empty() {
            errors.push(ConfigValidationError::EmptyPath {
                field: "catalog.path",
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agent]
backend = "local"

[hosted]
assistant_id = "asst_abc"
api_key_env = "MY_KEY"

[local]
url = "http://gpu-box:11434/api/generate"
model = "llama3:8b"
temperature = 0.2
max_tokens = 256

[polling]
initial_delay_ms = 100
max_wait_seconds = 30

[storage]
dir = "/var/lib/negotia"

[catalog]
path = "produtos.json"

[logging]
conversation_log = "transcript.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.backend, AgentBackend::Local);
        assert_eq!(config.hosted.assistant_id, "asst_abc");
        assert_eq!(config.hosted.api_key_env, "MY_KEY");
        assert_eq!(config.local.model, "llama3:8b");
        assert_eq!(config.local.max_tokens, 256);
        assert_eq!(config.polling.initial_delay_ms, 100);
        assert_eq!(config.polling.max_delay_ms, 4000);
        assert_eq!(config.storage.dir, PathBuf::from("/var/lib/negotia"));
        assert_eq!(config.catalog.path, PathBuf::from("produtos.json"));
        assert_eq!(
            config.logging.conversation_log,
            Some(PathBuf::from("transcript.jsonl"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.agent.backend, AgentBackend::Hosted);
        assert_eq!(config.hosted.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.local.model, "llama3:latest");
        assert_eq!(config.storage.dir, PathBuf::from("data"));
        assert_eq!(config.catalog.path, PathBuf::from("mapeamento.json"));
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn test_default_hosted_needs_assistant_id() {
        let errors = FileConfig::default().validate();
        assert_eq!(errors, vec![ConfigValidationError::MissingAssistantId]);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = FileConfig::default();
        config.agent.backend = AgentBackend::Local;
        config.local.model = " ".to_string();
        config.polling.multiplier = 0.5;
        config.polling.max_wait_seconds = 0;

        let errors = config.validate();
        assert!(errors.contains(&ConfigValidationError::InvalidMultiplier(0.5)));
        assert!(errors.contains(&ConfigValidationError::ZeroMaxWait));
        assert!(errors.contains(&ConfigValidationError::MissingLocalModel));
        assert!(!errors.contains(&ConfigValidationError::MissingAssistantId));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[agent]\nbackend = \"cloud\"\n");
        assert!(result.is_err());
    }
}
