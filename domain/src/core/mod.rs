//! Core domain concepts shared across all subdomains.
//!
//! - [`time`]: ISO-8601 timestamps and session filename stamps

pub mod time;
