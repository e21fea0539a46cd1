//! Interactive negotiation shell
//!
//! Provides a readline-based shell around the negotiation controller.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
