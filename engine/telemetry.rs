use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord, LogSink};

/// Builder for the engine's telemetry handle.
pub struct EngineTelemetryBuilder {
    component: String,
    log_path: Option<PathBuf>,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl EngineTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            log_path: None,
            sinks: Vec::new(),
        }
    }

    /// Adds a JSON-lines file sink at the given path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Adds an arbitrary sink (e.g. a `MemorySink` in tests).
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Builds the telemetry handle.
    pub fn build(mut self) -> Result<EngineTelemetry> {
        if let Some(path) = self.log_path.take() {
            self.sinks.push(Arc::new(JsonLogger::new(path)?));
        }
        Ok(EngineTelemetry {
            inner: Arc::new(TelemetryInner {
                component: self.component,
                sinks: self.sinks,
            }),
        })
    }
}

/// Telemetry handle shared across engine components. Cheap to clone; all
/// sinks receive every record.
#[derive(Clone)]
pub struct EngineTelemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    component: String,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl fmt::Debug for EngineTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineTelemetry")
            .field("component", &self.inner.component)
            .field("sinks", &self.inner.sinks.len())
            .finish()
    }
}

impl EngineTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(component: impl Into<String>) -> EngineTelemetryBuilder {
        EngineTelemetryBuilder::new(component)
    }

    /// Logs a message with structured fields to every sink.
    pub fn log(&self, level: LogLevel, message: &str, fields: Value) -> Result<()> {
        let mut record = LogRecord::new(&self.inner.component, level, message);
        if let Value::Object(map) = fields {
            record.fields = map;
        }
        for sink in &self.inner.sinks {
            sink.write(&record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_logging::MemorySink;
    use tempfile::tempdir;

    #[test]
    fn file_sink_receives_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.log");
        let telemetry = EngineTelemetry::builder("engine.runtime")
            .log_path(&path)
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "allocation run complete", json!({"incidents": 3}))
            .unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("allocation run complete"));
        assert!(content.contains("\"incidents\":3"));
    }

    #[test]
    fn every_sink_sees_each_record() {
        let sink = Arc::new(MemorySink::new(8));
        let telemetry = EngineTelemetry::builder("engine.runtime")
            .sink(sink.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Warn, "records rejected", json!({"rejected": 2}))
            .unwrap();
        let records = sink.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].component, "engine.runtime");
    }
}
