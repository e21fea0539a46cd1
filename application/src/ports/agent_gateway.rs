//! Agent Gateway port
//!
//! Defines the interface for turning a conversation into one raw agent reply.
//! Two adapters exist in the infrastructure layer: a hosted assistant that
//! keeps conversation state in a remote thread, and a stateless local model
//! that is sent the whole rendered history every call.

use async_trait::async_trait;
use negotia_domain::Turn;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors surfaced by an agent backend.
///
/// Every variant except [`AgentError::NoContent`] means "the agent call
/// failed"; `NoContent` means the call succeeded without producing a reply.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent call failed: {0}")]
    CallFailed(String),

    #[error("Agent run {run_id} ended with status '{status}'")]
    RunFailed { run_id: String, status: String },

    #[error("Agent did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Agent call cancelled")]
    Cancelled,

    #[error("Agent returned no content")]
    NoContent,
}

impl AgentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }
}

/// One request for a reply.
#[derive(Debug, Clone, Copy)]
pub struct AgentRequest<'a> {
    /// Remote thread of the negotiation, for thread-based backends.
    pub thread_id: Option<&'a str>,
    /// The user message just submitted.
    pub message: &'a str,
    /// Full visible history, ending with `message`.
    pub history: &'a [Turn],
}

/// Gateway to the language-model agent
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Whether replies depend on a remote thread created by [`start_thread`](Self::start_thread).
    fn uses_threads(&self) -> bool {
        false
    }

    /// Open a remote thread for a new negotiation.
    ///
    /// Stateless backends return `Ok(None)`.
    async fn start_thread(&self) -> Result<Option<String>, AgentError> {
        Ok(None)
    }

    /// Produce one raw reply (annotation tag included).
    ///
    /// Blocks until the backend finishes, `cancel` fires, or the adapter's
    /// own deadline passes.
    async fn generate_response(
        &self,
        request: AgentRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(!AgentError::NoContent.is_cancelled());
        assert!(AgentError::Cancelled.is_cancelled());
        assert!(!AgentError::CallFailed("x".into()).is_cancelled());
    }

    #[test]
    fn test_error_display() {
        let e = AgentError::RunFailed {
            run_id: "run_1".into(),
            status: "failed".into(),
        };
        assert_eq!(e.to_string(), "Agent run run_1 ended with status 'failed'");
    }
}
