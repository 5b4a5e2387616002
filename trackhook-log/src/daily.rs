//! Daily append-only log files.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A family of log files named `<prefix>_<YYYY-MM-DD>.log` inside one directory.
///
/// Every write opens the current day's file in append mode, writes one
/// complete entry with a single `write_all`, and closes it again. No file
/// handle is held between writes, so concurrent writers never interleave
/// partial entries.
#[derive(Debug, Clone)]
pub struct DailyFile {
    directory: PathBuf,
    prefix: String,
}

impl DailyFile {
    /// Create a daily file family. Nothing is touched on disk until the first write.
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Directory holding the files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file for a given day.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory
            .join(format!("{}_{}.log", self.prefix, date.format("%Y-%m-%d")))
    }

    /// Path of today's file (local time).
    pub fn current_path(&self) -> PathBuf {
        self.path_for(Local::now().date_naive())
    }

    /// Append one line of text to today's file.
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;

        let mut entry = String::with_capacity(line.len() + 1);
        entry.push_str(line.trim_end_matches('\n'));
        entry.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_path())?;
        file.write_all(entry.as_bytes())
    }

    /// Append a value serialized as a single JSON line.
    pub fn append_json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let line = serde_json::to_string(value).map_err(io::Error::other)?;
        self.append_line(&line)
    }
}
