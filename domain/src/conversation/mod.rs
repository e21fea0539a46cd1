//! Conversation domain.
//!
//! - [`turn::Turn`]: one timestamped message said by the client or the agent
//! - [`memory::ShortMemory`]: the ordered turn log of the active negotiation
//! - [`utterance::Utterance`]: validated, non-blank user input

pub mod memory;
pub mod turn;
pub mod utterance;
