//! Event log sinks

use chrono::Local;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use trackhook_log::DailyFile;

/// Destination for handler output.
///
/// Recording never fails the caller; sinks deal with their own errors.
pub trait EventLog: Send + Sync {
    /// Append one entry
    fn record(&self, message: &str, data: &Value);
}

/// A recorded event log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEntry {
    pub time: String,
    pub message: String,
    pub data: Value,
}

impl EventEntry {
    pub fn new(message: &str, data: &Value) -> Self {
        Self {
            time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            message: message.to_string(),
            data: data.clone(),
        }
    }
}

/// Writes entries to daily `events_YYYY-MM-DD.log` files as JSON lines
#[derive(Debug, Clone)]
pub struct FileEventLog {
    file: DailyFile,
}

impl FileEventLog {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            file: DailyFile::new(directory, "events"),
        }
    }

    /// File written to today
    pub fn current_path(&self) -> PathBuf {
        self.file.current_path()
    }
}

impl EventLog for FileEventLog {
    fn record(&self, message: &str, data: &Value) {
        tracing::info!(target: "trackhook::events", "{}", message);

        if let Err(e) = self.file.append_json(&EventEntry::new(message, data)) {
            tracing::error!(
                path = %self.file.current_path().display(),
                error = %e,
                "failed to write event log entry"
            );
        }
    }
}

/// Keeps entries in memory
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    entries: Mutex<Vec<EventEntry>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries
    pub fn entries(&self) -> Vec<EventEntry> {
        self.entries.lock().clone()
    }

    /// Messages only, in order
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl EventLog for MemoryEventLog {
    fn record(&self, message: &str, data: &Value) {
        tracing::debug!(target: "trackhook::events", "{}", message);
        self.entries.lock().push(EventEntry::new(message, data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_log() {
        let log = MemoryEventLog::new();
        assert!(log.is_empty());

        log.record("V2 Tracking created: 123", &json!({"tracking_number": "123"}));
        log.record("V2 Tracking deleted: 123", &json!({}));

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.messages(),
            vec!["V2 Tracking created: 123", "V2 Tracking deleted: 123"]
        );
        assert_eq!(log.entries()[0].data["tracking_number"], "123");

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_file_log_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::new(dir.path().join("logs"));

        log.record("first", &json!({"n": 1}));
        log.record("second", &json!({"n": 2}));

        let path = log.current_path();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("events_")
        );

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["message"], "first");
        assert_eq!(lines[1]["data"]["n"], 2);
    }
}
