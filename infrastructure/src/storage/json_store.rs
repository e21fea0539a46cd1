//! JSON file session store.
//!
//! One pretty-printed document per session, named
//! `session_<YYYYmmdd_HHMMSS>.json`, inside a single directory. Writes go to a
//! temporary file that is renamed over the target so a crash never leaves a
//! half-written session behind.

use negotia_application::{SessionRepository, StorageError};
use negotia_domain::{SessionRecord, SessionSummary, now_iso, session_stamp};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PREFIX: &str = "session_";
const EXTENSION: &str = ".json";

/// [`SessionRepository`] over a directory of JSON documents
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    dir: PathBuf,
}

impl JsonSessionStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, StorageError> {
        let valid = filename.ends_with(EXTENSION)
            && filename.len() > EXTENSION.len()
            && !filename.contains(['/', '\\'])
            && !filename.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }

    /// First free `session_<stamp>[_n].json` name.
    fn fresh_filename(&self) -> String {
        let stamp = session_stamp();
        let mut filename = format!("{}{}{}", PREFIX, stamp, EXTENSION);
        let mut n = 2;
        while self.dir.join(&filename).exists() {
            filename = format!("{}{}_{}{}", PREFIX, stamp, n, EXTENSION);
            n += 1;
        }
        filename
    }

    fn write(&self, filename: &str, record: &SessionRecord) -> Result<(), StorageError> {
        let path = self.path_for(filename)?;
        let json = serde_json::to_string_pretty(record).map_err(|e| StorageError::Parse {
            filename: filename.to_string(),
            message: e.to_string(),
        })?;

        let write_err = |source| StorageError::Write {
            filename: filename.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let tmp = self.dir.join(format!(".{}.tmp", filename));
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;
        Ok(())
    }

    fn read(&self, filename: &str) -> Result<SessionRecord, StorageError> {
        let path = self.path_for(filename)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    filename: filename.to_string(),
                });
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        serde_json::from_str(&content).map_err(|e| StorageError::Parse {
            filename: filename.to_string(),
            message: e.to_string(),
        })
    }
}

impl SessionRepository for JsonSessionStore {
    fn save_session(&self, record: &SessionRecord) -> Result<String, StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            filename: self.dir.display().to_string(),
            source,
        })?;
        let filename = self.fresh_filename();
        self.write(&filename, record)?;
        info!(filename = %filename, "Session saved");
        Ok(filename)
    }

    fn update_session(
        &self,
        filename: &str,
        record: &SessionRecord,
    ) -> Result<SessionRecord, StorageError> {
        if !self.path_for(filename)?.is_file() {
            return Err(StorageError::NotFound {
                filename: filename.to_string(),
            });
        }

        let mut updated = record.clone();
        updated.updated_at = Some(now_iso());
        self.write(filename, &updated)?;
        debug!(filename, turns = updated.history.len(), "Session updated");
        Ok(updated)
    }

    fn load_session(&self, filename: &str) -> Result<SessionRecord, StorageError> {
        let record = self.read(filename)?;
        debug!(filename, turns = record.history.len(), "Session read");
        Ok(record)
    }

    fn list_sessions(
        &self,
        search_term: Option<&str>,
    ) -> Result<Vec<SessionSummary>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let term = search_term.unwrap_or("");
        let mut sessions = Vec::new();

        for entry in entries {
            let entry = entry?;
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !filename.ends_with(EXTENSION) || filename.starts_with('.') {
                continue;
            }

            match self.read(&filename) {
                Ok(record) if record.matches(term) => {
                    sessions.push(SessionSummary { filename, record });
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable session {}: {}", filename, e),
            }
        }

        sessions.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(sessions)
    }
}
