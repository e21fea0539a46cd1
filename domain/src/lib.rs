//! Domain layer for negotia
//!
//! This crate contains the conversation model, the product catalog and the
//! annotation protocol that separates the human-visible part of an agent reply
//! from its trailing product-usage tag. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Turn / ShortMemory**: the ordered, timestamped log of what has been said
//! - **Annotation tag**: `[LOG: produto_id=3,7]` appended by the agent to name
//!   the products a reply relied on
//! - **Session record**: the persisted shape of one negotiation

pub mod annotation;
pub mod catalog;
pub mod conversation;
pub mod core;
pub mod negotiation;
pub mod util;

// Re-export commonly used types
pub use annotation::{
    extraction::{Extraction, ExtractionOutcome, extract_product_usage},
    parser::{Annotation, AnnotationError, LOG_MARKER, NONE_SENTINEL, ParsedReply, parse_reply},
};
pub use catalog::{CatalogError, Product, ProductCatalog};
pub use conversation::{
    memory::ShortMemory,
    turn::{Role, Turn},
    utterance::Utterance,
};
pub use core::time::{now_iso, session_stamp};
pub use negotiation::{
    client::ClientInfo,
    product_log::ProductLogEntry,
    record::{SessionRecord, SessionSummary},
    usage::ProductUsage,
    visible::{VisibleTurn, attribute_products},
};
