use std::{
    collections::VecDeque,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord, LogSink};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use uuid::Uuid;

/// Event published when an analysis, assessment or study completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubtEvent {
    /// Unique identifier.
    pub id: String,
    /// Module producing the event.
    pub source: String,
    /// Dotted event type, e.g. `doubt.analysis.completed`.
    pub event_type: String,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Arbitrary JSON payload.
    #[serde(default)]
    pub payload: Value,
}

/// Destination for doubt events.
#[async_trait]
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Publishes one event.
    async fn publish(&self, event: DoubtEvent) -> Result<()>;
}

/// Bounded in-memory backlog of events.
#[derive(Debug, Clone)]
pub struct MemoryEventBus {
    capacity: usize,
    backlog: Arc<Mutex<VecDeque<DoubtEvent>>>,
}

impl MemoryEventBus {
    /// Creates a bus keeping at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            backlog: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    /// Events currently retained, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DoubtEvent> {
        self.backlog.lock().iter().cloned().collect()
    }
}

#[async_trait]
impl EventPublisher for MemoryEventBus {
    async fn publish(&self, event: DoubtEvent) -> Result<()> {
        let mut backlog = self.backlog.lock();
        if backlog.len() == self.capacity {
            backlog.pop_front();
        }
        backlog.push_back(event);
        Ok(())
    }
}

/// Appends events as JSON lines to a file.
#[derive(Debug, Clone)]
pub struct FileEventPublisher {
    path: PathBuf,
}

impl FileEventPublisher {
    /// Creates the parent directory if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating event dir {}", parent.display()))?;
        }
        Ok(Self { path })
    }
}

#[async_trait]
impl EventPublisher for FileEventPublisher {
    async fn publish(&self, event: DoubtEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening event log {}", self.path.display()))?;
        let mut data = serde_json::to_vec(&event)?;
        data.push(b'\n');
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Builder for doubt telemetry sinks.
pub struct DoubtTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    log_sink: Option<Arc<dyn LogSink>>,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl DoubtTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            log_sink: None,
            event_publisher: None,
        }
    }

    /// Logs to a JSON-lines file. Ignored when a sink is set.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Logs to an existing sink.
    #[must_use]
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Sets the event publisher.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Builds the telemetry handle, opening the log file if one was requested.
    pub fn build(self) -> Result<DoubtTelemetry> {
        let logger = match (self.log_sink, self.log_path) {
            (Some(sink), _) => Some(sink),
            (None, Some(path)) => Some(Arc::new(JsonLogger::new(path)?) as Arc<dyn LogSink>),
            (None, None) => None,
        };
        Ok(DoubtTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
                publisher: self.event_publisher,
            }),
        })
    }
}

/// Telemetry handle shared by runtime clones.
#[derive(Clone)]
pub struct DoubtTelemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    module: String,
    logger: Option<Arc<dyn LogSink>>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl fmt::Debug for DoubtTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubtTelemetry")
            .field("module", &self.inner.module)
            .field("logging", &self.inner.logger.is_some())
            .field("events", &self.inner.publisher.is_some())
            .finish()
    }
}

impl DoubtTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> DoubtTelemetryBuilder {
        DoubtTelemetryBuilder::new(module)
    }

    /// Logs structured metadata.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record = LogRecord::new(&self.inner.module, level, message).with_metadata(metadata);
            logger.write(&record)?;
        }
        Ok(())
    }

    /// Publishes an event if a publisher is configured.
    pub async fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        if let Some(publisher) = &self.inner.publisher {
            publisher
                .publish(DoubtEvent {
                    id: format!("evt-{}", Uuid::new_v4()),
                    source: self.inner.module.clone(),
                    event_type: event_type.into(),
                    timestamp: Utc::now(),
                    payload,
                })
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_logging::MemoryLogger;
    use tempfile::tempdir;

    #[tokio::test]
    async fn telemetry_writes_log_and_event() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("doubt.log");
        let bus = Arc::new(MemoryEventBus::new(16));
        let telemetry = DoubtTelemetry::builder("doubt")
            .log_path(&path)
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "doubt.analysis.started", json!({ "depth": 3 }))
            .unwrap();
        telemetry
            .event("doubt.analysis.completed", json!({ "levels": 2 }))
            .await
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("doubt.analysis.started"));
        let events = bus.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, "doubt");
        assert!(events[0].id.starts_with("evt-"));
    }

    #[tokio::test]
    async fn sink_takes_precedence_and_bus_is_bounded() {
        let sink = Arc::new(MemoryLogger::new());
        let bus = Arc::new(MemoryEventBus::new(2));
        let telemetry = DoubtTelemetry::builder("doubt")
            .log_sink(sink.clone())
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        telemetry.log(LogLevel::Warn, "doubt.analysis.rejected", json!({})).unwrap();
        for n in 0..3 {
            telemetry.event("tick", json!({ "n": n })).await.unwrap();
        }
        assert_eq!(sink.messages(), vec!["doubt.analysis.rejected"]);
        let events = bus.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload["n"], 1);
    }

    #[tokio::test]
    async fn file_publisher_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events/doubt.jsonl");
        let publisher = FileEventPublisher::new(&path).unwrap();
        let telemetry = DoubtTelemetry::builder("doubt")
            .event_publisher(Arc::new(publisher))
            .build()
            .unwrap();
        telemetry.event("doubt.study.completed", json!({})).await.unwrap();
        telemetry.event("doubt.analysis.completed", json!({})).await.unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("doubt.study.completed"));
    }

    #[test]
    fn silent_telemetry_is_a_no_op() {
        let telemetry = DoubtTelemetry::builder("doubt").build().unwrap();
        telemetry.log(LogLevel::Info, "ignored", Value::Null).unwrap();
    }
}
