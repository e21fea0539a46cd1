//! Product usage statistics

use super::product_log::ProductLogEntry;
use std::collections::BTreeMap;

/// How often one product was used in a negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUsage {
    pub id: i64,
    pub name: String,
    pub count: usize,
    pub last_used: String,
}

impl ProductUsage {
    /// Group `log` by product id, most used first (ties by ascending id).
    pub fn summarize(log: &[ProductLogEntry]) -> Vec<ProductUsage> {
        let mut by_id: BTreeMap<i64, ProductUsage> = BTreeMap::new();
        for entry in log {
            let usage = by_id.entry(entry.id).or_insert_with(|| ProductUsage {
                id: entry.id,
                name: entry.name.clone(),
                count: 0,
                last_used: entry.timestamp.clone(),
            });
            usage.count += 1;
            if entry.timestamp > usage.last_used {
                usage.last_used = entry.timestamp.clone();
            }
        }

        let mut stats: Vec<ProductUsage> = by_id.into_values().collect();
        // Stable sort keeps ascending id order among equal counts.
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }

    /// The `n` most used products.
    pub fn top(log: &[ProductLogEntry], n: usize) -> Vec<ProductUsage> {
        let mut stats = Self::summarize(log);
        stats.truncate(n);
        stats
    }
}
