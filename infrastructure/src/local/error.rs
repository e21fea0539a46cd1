//! Error types for the local model adapter

use negotia_application::AgentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalModelError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Stream read failed: {0}")]
    Stream(String),
}

impl From<LocalModelError> for AgentError {
    fn from(e: LocalModelError) -> Self {
        AgentError::CallFailed(e.to_string())
    }
}
