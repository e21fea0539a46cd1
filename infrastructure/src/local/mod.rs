//! Local streaming model adapter
//!
//! Implements [`AgentGateway`](negotia_application::AgentGateway) for a model
//! served over HTTP that streams newline-delimited JSON chunks. The backend is
//! stateless: every call renders the full visible history into one prompt.

pub mod error;
pub mod gateway;
pub mod prompt;
pub mod protocol;
