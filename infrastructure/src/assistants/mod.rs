//! Hosted assistant adapter
//!
//! Implements [`AgentGateway`](negotia_application::AgentGateway) on top of an
//! Assistants-style HTTP API: conversation state lives in a remote thread, and
//! every reply is produced by a run that is polled to completion.

pub mod client;
pub mod error;
pub mod gateway;
pub mod protocol;
