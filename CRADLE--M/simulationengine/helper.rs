use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde_json::{Map, Value};
use shared_event_bus::{EventPublisher, EventRecord};
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use tokio::runtime::{Handle, Runtime};

/// Builder for [`SimulationTelemetry`].
pub struct SimulationTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    event_publisher: Option<Arc<dyn EventPublisher>>,
    context: Map<String, Value>,
}

impl SimulationTelemetryBuilder {
    /// Starts a builder for records tagged with `module`.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Debug,
            event_publisher: None,
            context: Map::new(),
        }
    }

    /// JSON-lines log file.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Drops log records below `level`.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Observer event sink.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Field stamped on every log record and event payload (run id, seed).
    #[must_use]
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Opens the log file, if any.
    pub fn build(self) -> Result<SimulationTelemetry> {
        let logger = match self.log_path {
            Some(path) => Some(JsonLogger::with_min_level(path, self.min_level)?),
            None => None,
        };
        Ok(SimulationTelemetry {
            inner: Arc::new(Sinks {
                module: self.module,
                context: self.context,
                logger,
                publisher: self.event_publisher,
            }),
        })
    }
}

struct Sinks {
    module: String,
    context: Map<String, Value>,
    logger: Option<JsonLogger>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

/// Cheap-to-clone handle the engine logs and publishes through. The
/// simulation itself is synchronous; publishing bridges onto tokio.
#[derive(Clone)]
pub struct SimulationTelemetry {
    inner: Arc<Sinks>,
}

impl fmt::Debug for SimulationTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationTelemetry")
            .field("module", &self.inner.module)
            .field("logs", &self.inner.logger.is_some())
            .field("events", &self.inner.publisher.is_some())
            .finish()
    }
}

impl SimulationTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> SimulationTelemetryBuilder {
        SimulationTelemetryBuilder::new(module)
    }

    /// Module label.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.inner.module
    }

    fn with_context(&self, value: Value) -> Map<String, Value> {
        let mut merged = self.inner.context.clone();
        match value {
            Value::Object(fields) => merged.extend(fields),
            Value::Null => {}
            other => {
                merged.insert("value".into(), other);
            }
        }
        merged
    }

    /// Writes a log record. No-op without a log path.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        let Some(logger) = &self.inner.logger else {
            return Ok(());
        };
        let mut record = LogRecord::new(&self.inner.module, level, message);
        record.metadata = self.with_context(metadata);
        logger.log(&record)?;
        Ok(())
    }

    /// Publishes an observer event. No-op without a publisher.
    pub fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        let Some(publisher) = &self.inner.publisher else {
            return Ok(());
        };
        let record = EventRecord::new(
            &self.inner.module,
            event_type,
            Value::Object(self.with_context(payload)),
        );
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(publisher);
            handle.spawn(async move {
                let _ = publisher.publish(record).await;
            });
            Ok(())
        } else {
            Runtime::new()?.block_on(publisher.publish(record))
        }
    }
}

/// Random seed for runs that did not pick one.
#[must_use]
pub fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

/// Reproducible RNG for a seed.
#[must_use]
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_event_bus::MemoryEventBus;
    use shared_logging::read_records;
    use tempfile::tempdir;

    #[test]
    fn level_filter_and_context_apply() {
        let tmp = tempdir().unwrap();
        let bus = Arc::new(MemoryEventBus::new(4));
        let log_path = tmp.path().join("sim.log");
        let telemetry = SimulationTelemetry::builder("simulation")
            .log_path(&log_path)
            .min_level(LogLevel::Info)
            .event_publisher(bus.clone())
            .context("run_id", "run-1")
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Debug, "simulation.step", json!({ "event": 0 }))
            .unwrap();
        telemetry
            .log(LogLevel::Info, "simulation.birth", json!({ "seed": 1 }))
            .unwrap();
        telemetry
            .event("simulation.day.completed", json!({ "day": 0 }))
            .unwrap();

        let records = read_records(&log_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "simulation.birth");
        assert_eq!(records[0].metadata["run_id"], "run-1");
        assert_eq!(records[0].metadata["seed"], 1);

        let events = bus.of_type("simulation.day.completed");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["run_id"], "run-1");
        assert_eq!(events[0].source, "simulation");
    }

    #[test]
    fn sinks_are_optional() {
        let telemetry = SimulationTelemetry::builder("quiet").build().unwrap();
        telemetry.log(LogLevel::Error, "nothing", Value::Null).unwrap();
        telemetry.event("nothing", json!(3)).unwrap();
        assert_eq!(telemetry.module(), "quiet");
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: u32 = seeded_rng(9).gen();
        let b: u32 = seeded_rng(9).gen();
        assert_eq!(a, b);
    }
}
