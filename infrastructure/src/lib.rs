//! Infrastructure layer for negotia
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the hosted-assistant and local-model agent gateways, the
//! JSON file session store, the product catalog loader, the JSONL transcript
//! logger and configuration file loading.

pub mod assistants;
pub mod catalog;
pub mod config;
pub mod local;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use assistants::{
    client::AssistantsClient, error::AssistantsError, gateway::HostedAssistantGateway,
};
pub use catalog::{CatalogLoadError, load_catalog};
pub use config::{
    AgentBackend, ConfigLoader, ConfigValidationError, FileConfig, FileHostedConfig,
    FileLocalConfig, FilePollingConfig,
};
pub use local::{gateway::LocalModelGateway, prompt::render_prompt};
pub use logging::JsonlConversationLogger;
pub use storage::JsonSessionStore;
