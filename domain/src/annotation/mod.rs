//! Annotation protocol.
//!
//! The agent ends a reply with a tag naming the catalog products it relied on:
//!
//! ```text
//! Podemos oferecer 20% de desconto à vista. [LOG: produto_id=3,7]
//! ```
//!
//! - [`parser`]: splits the visible reply from the tag and reads the id list
//! - [`extraction`]: resolves ids against the catalog into product log entries
//!
//! Parsing is lenient: unknown and non-numeric ids are dropped, and a malformed
//! tag never prevents the visible reply from being delivered.

pub mod extraction;
pub mod parser;
