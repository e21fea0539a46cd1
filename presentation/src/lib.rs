//! Presentation layer for negotia
//!
//! This crate contains the CLI definition, the interactive negotiation shell,
//! console output formatting and the progress spinner.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{BackendArg, Cli};
pub use output::console::ConsoleFormatter;
pub use progress::spinner::TurnSpinner;
