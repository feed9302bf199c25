#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSON logging shared across the Aegis response stack.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Log severity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

/// Structured log record emitted by engine components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Component emitting the record (e.g. `engine.allocator`).
    pub component: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Arbitrary JSON payload for counts and run metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    /// Creates a record with the provided info.
    #[must_use]
    pub fn new(component: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            component: component.into(),
            level,
            message: message.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Attaches a JSON field to the record.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// Destination for structured records.
pub trait LogSink: Send + Sync {
    /// Writes one record to the sink.
    fn write(&self, record: &LogRecord) -> Result<()>;
}

/// Thread-safe JSON-lines logger with append-only semantics.
#[derive(Debug)]
pub struct JsonLogger {
    path: PathBuf,
    min_level: LogLevel,
    writer: Mutex<File>,
}

impl JsonLogger {
    /// Creates or opens a logger at the desired path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_min_level(path, LogLevel::Debug)
    }

    /// Creates a logger that drops records below `min_level`.
    pub fn with_min_level(path: impl AsRef<Path>, min_level: LogLevel) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self {
            path,
            min_level,
            writer: Mutex::new(file),
        })
    }

    /// Returns the underlying file path (useful for tests).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for JsonLogger {
    fn write(&self, record: &LogRecord) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// In-memory sink retaining the most recent records, for tests and
/// diagnostics endpoints.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    capacity: usize,
}

impl MemorySink {
    /// Creates a sink retaining at most `capacity` records (0 = unbounded).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Snapshot of retained records.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut records = self.records.lock();
        records.push(record.clone());
        if self.capacity > 0 && records.len() > self.capacity {
            let overflow = records.len() - self.capacity;
            records.drain(..overflow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_json_lines() {
        let dir = tempdir().unwrap();
        let logger = JsonLogger::new(dir.path().join("engine.log")).unwrap();
        logger
            .write(&LogRecord::new("engine", LogLevel::Info, "run complete"))
            .unwrap();
        let content = fs::read_to_string(logger.path()).unwrap();
        assert!(content.contains("\"message\":\"run complete\""));
    }

    #[test]
    fn filters_below_min_level() {
        let dir = tempdir().unwrap();
        let logger =
            JsonLogger::with_min_level(dir.path().join("engine.log"), LogLevel::Warn).unwrap();
        logger
            .write(&LogRecord::new("engine", LogLevel::Debug, "noise"))
            .unwrap();
        let content = fs::read_to_string(logger.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn memory_sink_caps_retention() {
        let sink = MemorySink::new(2);
        for idx in 0..4 {
            sink.write(&LogRecord::new("engine", LogLevel::Info, format!("r{idx}")))
                .unwrap();
        }
        let records = sink.snapshot();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "r2");
    }

    #[test]
    fn record_fields_round_trip() {
        let record = LogRecord::new("engine.intake", LogLevel::Warn, "records rejected")
            .with_field("rejected", serde_json::json!(3));
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: LogRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.fields["rejected"], serde_json::json!(3));
    }
}
