//! Negotiation domain.
//!
//! - [`client::ClientInfo`]: who is being negotiated with
//! - [`product_log::ProductLogEntry`]: one attributed use of a catalog product
//! - [`record::SessionRecord`]: the persisted shape of a negotiation
//! - [`usage::ProductUsage`]: per-product usage counts
//! - [`visible::VisibleTurn`]: a turn paired with the product it used

pub mod client;
pub mod product_log;
pub mod record;
pub mod usage;
pub mod visible;
