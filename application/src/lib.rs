//! Application layer for negotia
//!
//! This crate contains the negotiation use case, port definitions and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::PollingParams;
pub use ports::{
    agent_gateway::{AgentError, AgentGateway, AgentRequest},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    session_repository::{SessionRepository, StorageError},
};
pub use use_cases::negotiation::{
    NegotiationController, NegotiationError, NegotiationPhase, NegotiationState, TurnOutcome,
    TurnReply,
};
