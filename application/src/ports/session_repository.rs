//! Session repository port
//!
//! Persistence of negotiation records keyed by generated filenames.

use negotia_domain::{SessionRecord, SessionSummary};
use thiserror::Error;

/// Errors from session persistence
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Session not found: {filename}")]
    NotFound { filename: String },

    #[error("Failed to parse session {filename}: {message}")]
    Parse { filename: String, message: String },

    #[error("Failed to write session {filename}: {source}")]
    Write {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid session filename: {0}")]
    InvalidFilename(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document store for session records.
///
/// The filename returned by [`save_session`](Self::save_session) is the
/// record's identity. Concurrent writers of the same filename are not
/// supported: the last write wins.
pub trait SessionRepository: Send + Sync {
    /// Write a new record under a freshly generated filename and return it.
    fn save_session(&self, record: &SessionRecord) -> Result<String, StorageError>;

    /// Overwrite an existing record, stamping `updated_at`.
    ///
    /// Returns the document as written. Fails with
    /// [`StorageError::NotFound`] if `filename` does not exist.
    fn update_session(
        &self,
        filename: &str,
        record: &SessionRecord,
    ) -> Result<SessionRecord, StorageError>;

    /// Read one record.
    fn load_session(&self, filename: &str) -> Result<SessionRecord, StorageError>;

    /// All readable records, filtered by `search_term` and sorted by
    /// `created_at` descending. Unreadable documents are skipped.
    fn list_sessions(&self, search_term: Option<&str>)
    -> Result<Vec<SessionSummary>, StorageError>;
}
