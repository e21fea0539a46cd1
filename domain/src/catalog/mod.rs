//! Static product catalog.
//!
//! Loaded once at start-up and never mutated; looked up by product id when an
//! annotation tag names the products a reply used.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Catalog construction errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate product id in catalog: {0}")]
    DuplicateId(i64),
}

/// A catalog entry (Value Object)
///
/// Display fields beyond `id`, `nome` and `contexto_uso` are kept verbatim in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "contexto_uso")]
    pub usage_context: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, usage_context: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            usage_context: usage_context.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Ordered, id-indexed product catalog
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<i64, usize>,
}

impl ProductCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.insert(product.id, pos).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a catalog from a JSON array of product records.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    pub fn find(&self, id: i64) -> Option<&Product> {
        self.index.get(&id).map(|&pos| &self.products[pos])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
