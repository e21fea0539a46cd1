//! Application-level configuration.
//!
//! - [`PollingParams`]: backoff and deadline for waiting on a hosted agent run

pub mod polling_params;

pub use polling_params::PollingParams;
