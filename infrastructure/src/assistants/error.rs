//! Error types for the hosted assistant adapter

use negotia_application::AgentError;
use thiserror::Error;

/// Result type alias for assistant API operations
pub type Result<T> = std::result::Result<T, AssistantsError>;

/// Errors that can occur when talking to the assistant API
#[derive(Error, Debug)]
pub enum AssistantsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Missing API credential (environment variable {0})")]
    MissingCredential(String),

    #[error("No thread for this conversation")]
    MissingThread,
}

impl From<AssistantsError> for AgentError {
    fn from(e: AssistantsError) -> Self {
        AgentError::CallFailed(e.to_string())
    }
}
