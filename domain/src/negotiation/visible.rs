//! Visible history with product attribution

use super::product_log::ProductLogEntry;
use crate::conversation::turn::Turn;

/// A turn as shown to the user, with the product its reply used (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleTurn {
    pub turn: Turn,
    pub product: Option<ProductLogEntry>,
}

/// Pair each assistant turn with the first log entry whose content equals it.
pub fn attribute_products(history: &[Turn], log: &[ProductLogEntry]) -> Vec<VisibleTurn> {
    history
        .iter()
        .map(|turn| {
            let product = if turn.is_assistant() {
                log.iter().find(|e| e.content == turn.content()).cloned()
            } else {
                None
            };
            VisibleTurn {
                turn: turn.clone(),
                product,
            }
        })
        .collect()
}
