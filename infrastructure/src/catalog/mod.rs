//! Product catalog loading.

use negotia_domain::{CatalogError, ProductCatalog};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Read the product catalog from a JSON array file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<ProductCatalog, CatalogLoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = ProductCatalog::from_json_str(&content)?;
    info!(path = %path.display(), products = catalog.len(), "Product catalog loaded");
    Ok(catalog)
}
