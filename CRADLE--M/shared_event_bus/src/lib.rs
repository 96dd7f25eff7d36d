#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Observer event bus: the simulation announces what happened, observers listen.

use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::broadcast};
use uuid::Uuid;

/// One observer event, serialized as a JSON line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    /// `evt-<uuid>`.
    pub id: String,
    /// Component that emitted it.
    pub source: String,
    /// Dotted type, e.g. `simulation.sleep.completed`.
    pub event_type: String,
    /// RFC3339.
    pub timestamp: String,
    /// Free-form payload.
    #[serde(default)]
    pub payload: Value,
}

impl EventRecord {
    /// Stamps a fresh id and the current time.
    #[must_use]
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            id: format!("evt-{}", Uuid::new_v4()),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now().to_rfc3339(),
            payload,
        }
    }

    /// Whether the type equals `prefix` or sits below it (`simulation.day`
    /// matches `simulation.day.completed`).
    #[must_use]
    pub fn is_under(&self, prefix: &str) -> bool {
        self.event_type == prefix
            || self
                .event_type
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// Sink for observer events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one event.
    async fn publish(&self, event: EventRecord) -> Result<()>;
}

/// Live feed of observer events.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Receiver yielding every event published after the call.
    async fn subscribe(&self) -> Result<broadcast::Receiver<EventRecord>>;
}

/// Broadcast bus that also keeps the last `capacity` events for observers
/// that attach late.
#[derive(Debug, Clone)]
pub struct MemoryEventBus {
    sender: broadcast::Sender<EventRecord>,
    backlog: Arc<Mutex<VecDeque<EventRecord>>>,
    capacity: usize,
}

impl MemoryEventBus {
    /// Bus keeping at least one event.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            backlog: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Retained events, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.backlog.lock().iter().cloned().collect()
    }

    /// Retained events of exactly one type, oldest first.
    #[must_use]
    pub fn of_type(&self, event_type: &str) -> Vec<EventRecord> {
        self.backlog
            .lock()
            .iter()
            .filter(|event| event.event_type == event_type)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventPublisher for MemoryEventBus {
    async fn publish(&self, event: EventRecord) -> Result<()> {
        {
            let mut backlog = self.backlog.lock();
            if backlog.len() == self.capacity {
                backlog.pop_front();
            }
            backlog.push_back(event.clone());
        }
        // Nobody listening is fine; the backlog has it.
        let _ = self.sender.send(event);
        Ok(())
    }
}

#[async_trait]
impl EventSubscriber for MemoryEventBus {
    async fn subscribe(&self) -> Result<broadcast::Receiver<EventRecord>> {
        Ok(self.sender.subscribe())
    }
}

/// Appends events to a JSON-lines file.
#[derive(Debug, Clone)]
pub struct FileEventPublisher {
    path: PathBuf,
}

impl FileEventPublisher {
    /// Creates parent directories; the file itself is opened per event.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating event log directory {}", parent.display()))?;
        }
        Ok(Self { path })
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventPublisher for FileEventPublisher {
    async fn publish(&self, event: EventRecord) -> Result<()> {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Reads an event log written by [`FileEventPublisher`]. A missing file is
/// an empty log; blank lines are skipped.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading event log {}", path.display()))?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(no, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: bad event line", path.display(), no + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn subscribers_see_new_events() {
        let bus = MemoryEventBus::new(8);
        let mut rx = bus.subscribe().await.unwrap();
        bus.publish(EventRecord::new("engine", "simulation.step", json!({ "event": 2 })))
            .await
            .unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "simulation.step");
        assert_eq!(event.payload["event"], 2);
        assert!(event.id.starts_with("evt-"));
    }

    #[tokio::test]
    async fn backlog_keeps_latest() {
        let bus = MemoryEventBus::new(2);
        for kind in ["simulation.birth", "simulation.wake", "simulation.sleep"] {
            bus.publish(EventRecord::new("engine", kind, Value::Null))
                .await
                .unwrap();
        }
        let kept: Vec<String> = bus.snapshot().into_iter().map(|e| e.event_type).collect();
        assert_eq!(kept, ["simulation.wake", "simulation.sleep"]);
        assert!(bus.of_type("simulation.birth").is_empty());
    }

    #[tokio::test]
    async fn file_log_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/events.jsonl");
        let publisher = FileEventPublisher::new(&path).unwrap();
        for day in 0..3 {
            publisher
                .publish(EventRecord::new(
                    "engine",
                    "simulation.day.completed",
                    json!({ "day": day }),
                ))
                .await
                .unwrap();
        }
        let events = read_events(publisher.path()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].payload["day"], 2);
        assert!(read_events(dir.path().join("missing.jsonl")).unwrap().is_empty());
    }

    #[test]
    fn prefix_matching_respects_segments() {
        let event = EventRecord::new("engine", "simulation.day.completed", Value::Null);
        assert!(event.is_under("simulation.day"));
        assert!(event.is_under("simulation.day.completed"));
        assert!(!event.is_under("simulation.da"));
        assert!(!event.is_under("simulation.sleep"));
    }
}
