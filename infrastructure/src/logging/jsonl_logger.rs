//! JSONL transcript writer.
//!
//! Each [`ConversationEvent`] becomes one JSON object per line: the payload
//! fields plus `type` and `timestamp`. The file is opened in append mode so
//! transcripts of successive runs accumulate.

use negotia_application::{ConversationEvent, ConversationLogger};
use negotia_domain::now_iso;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Transcript logger writing one JSON object per line.
///
/// Every line is flushed as it is written. The first write failure is a
/// `tracing` warning; later ones are only logged at debug level.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    write_failed: AtomicBool,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            write_failed: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent) -> Value {
        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert("timestamp".to_string(), Value::from(now_iso()));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            if self.write_failed.swap(true, Ordering::Relaxed) {
                debug!("Transcript write failed again: {}", e);
            } else {
                warn!("Could not write transcript {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("transcript.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(
            "user_turn",
            json!({"content": "Quero parcelar"}),
        ));
        logger.log(ConversationEvent::new(
            "annotation",
            json!({"status": "tagged", "product_ids": [7, 9], "unknown_ids": []}),
        ));
        drop(logger);

        let events = lines(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "user_turn");
        assert_eq!(events[0]["content"], "Quero parcelar");
        assert!(events[0]["timestamp"].is_string());
        assert_eq!(events[1]["type"], "annotation");
        assert_eq!(events[1]["product_ids"], json!([7, 9]));
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.jsonl");

        let first = JsonlConversationLogger::open(&path).unwrap();
        first.log(ConversationEvent::new("negotiation_started", Value::Null));
        drop(first);

        let second = JsonlConversationLogger::open(&path).unwrap();
        second.log(ConversationEvent::new(
            "session_saved",
            json!({"filename": "session_20240501_100000.json"}),
        ));
        drop(second);

        let events = lines(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "negotiation_started");
        assert_eq!(events[1]["filename"], "session_20240501_100000.json");
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new("agent_reply", json!("Olá!")));
        drop(logger);

        let events = lines(&path);
        assert_eq!(events[0]["type"], "agent_reply");
        assert_eq!(events[0]["data"], "Olá!");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_is_latched() {
        let logger = JsonlConversationLogger::open("/dev/full").unwrap();
        assert!(!logger.write_failed.load(Ordering::Relaxed));

        logger.log(ConversationEvent::new("user_turn", json!({"content": "Oi"})));
        assert!(logger.write_failed.load(Ordering::Relaxed));

        logger.log(ConversationEvent::new("user_turn", json!({"content": "Oi de novo"})));
        assert!(logger.write_failed.load(Ordering::Relaxed));
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        assert!(JsonlConversationLogger::open(blocker.join("t.jsonl")).is_err());
    }
}
