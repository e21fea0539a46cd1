//! Product usage log entries

use crate::catalog::Product;
use crate::core::time::now_iso;
use serde::{Deserialize, Serialize};

/// One use of a catalog product by an agent reply.
///
/// `content` is the cleaned reply the product was attributed to; it is how a
/// historical reply is matched back to the products behind it. Entries are
/// never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLogEntry {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "contexto_uso")]
    pub usage_context: String,
    pub content: String,
    pub timestamp: String,
}

impl ProductLogEntry {
    /// Entry for `product` used by `content`, stamped now.
    pub fn from_product(product: &Product, content: &str) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            usage_context: product.usage_context.clone(),
            content: content.to_string(),
            timestamp: now_iso(),
        }
    }
}
