//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording negotiation events
//! (user turns, raw agent replies, annotation results, saves and loads) to a
//! machine-readable transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, this port carries the transcript.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "user_turn", "agent_reply", "session_saved").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible: a transcript failure must never
/// interrupt a negotiation.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
