//! Persisted session record

use super::client::ClientInfo;
use super::product_log::ProductLogEntry;
use crate::conversation::turn::Turn;
use serde::{Deserialize, Serialize};

/// The unit of persistence: one negotiation as stored on disk.
///
/// Missing fields deserialize to their defaults so that older or partial
/// documents still list. `updated_at` is only present after the first update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default)]
    pub products_log: Vec<ProductLogEntry>,
    #[serde(default)]
    pub assistant_thread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SessionRecord {
    pub fn client(&self) -> ClientInfo {
        ClientInfo::new(&self.client_name, &self.client_phone)
    }

    /// Search rule used when listing sessions.
    ///
    /// Names match case-insensitively, phones match literally. An empty term
    /// matches everything.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        self.client_name
            .to_lowercase()
            .contains(&term.to_lowercase())
            || self.client_phone.contains(term)
    }
}

/// A listed session: the record plus the filename that identifies it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub filename: String,
    pub record: SessionRecord,
}

impl SessionSummary {
    /// `"<name> - <phone> | <date>"`, as shown in session pickers.
    pub fn label(&self) -> String {
        let date: String = self.record.created_at.chars().take(10).collect();
        format!(
            "{} - {} | {}",
            self.record.client_name, self.record.client_phone, date
        )
    }
}
