//! Resolution of annotation ids against the product catalog.

use super::parser::{Annotation, AnnotationError, parse_reply};
use crate::catalog::ProductCatalog;
use crate::negotiation::product_log::ProductLogEntry;

/// Result of running the annotation protocol on one raw reply
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Visible reply to append to history.
    pub cleaned_reply: String,
    /// Raw tag payload, kept for diagnostics.
    pub payload: Option<String>,
    pub outcome: ExtractionOutcome,
}

/// Per-turn log-extraction result
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The reply carried no tag.
    Untagged,
    /// The tag was read. `entries` holds one entry per known id (in tag order,
    /// duplicates kept); `unknown_ids` lists the ids with no catalog match.
    Tagged {
        entries: Vec<ProductLogEntry>,
        unknown_ids: Vec<i64>,
    },
    /// Error sentinel: the tag could not be read, nothing was logged.
    Failed(AnnotationError),
}

impl Extraction {
    /// Product log entries produced by this reply.
    pub fn entries(&self) -> &[ProductLogEntry] {
        match &self.outcome {
            ExtractionOutcome::Tagged { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn into_entries(self) -> Vec<ProductLogEntry> {
        match self.outcome {
            ExtractionOutcome::Tagged { entries, .. } => entries,
            _ => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Failed(_))
    }
}

/// Run the annotation protocol on `raw` against `catalog`.
///
/// Every matched product yields one [`ProductLogEntry`] stamped now and
/// carrying the cleaned reply as its `content`.
pub fn extract_product_usage(raw: &str, catalog: &ProductCatalog) -> Extraction {
    let parsed = parse_reply(raw);

    let outcome = match parsed.annotation {
        Ok(Annotation::Absent) => ExtractionOutcome::Untagged,
        Ok(Annotation::NoProducts) => ExtractionOutcome::Tagged {
            entries: Vec::new(),
            unknown_ids: Vec::new(),
        },
        Ok(Annotation::Products(ids)) => {
            let mut entries = Vec::with_capacity(ids.len());
            let mut unknown_ids = Vec::new();
            for id in ids {
                match catalog.find(id) {
                    Some(product) => {
                        entries.push(ProductLogEntry::from_product(product, &parsed.cleaned))
                    }
                    None => unknown_ids.push(id),
                }
            }
            ExtractionOutcome::Tagged {
                entries,
                unknown_ids,
            }
        }
        Err(e) => ExtractionOutcome::Failed(e),
    };

    Extraction {
        cleaned_reply: parsed.cleaned,
        payload: parsed.payload,
        outcome,
    }
}
