//! Raw records the mind keeps: sensory packets, observation traces and its
//! own activity timeline.

use cradle_world::EventKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sensory content lifted from the objective timeline by the world bridge.
/// No meaning, no language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensoryPacket {
    /// Place where it was sensed.
    pub place: String,
    /// Modality -> values.
    pub sensory: IndexMap<String, Vec<String>>,
    /// Observer tags of the source entry.
    pub tags: Vec<String>,
    /// World clock time.
    pub time: f32,
    /// Day.
    pub day: u32,
}

/// One observation written to the trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "trace", rename_all = "snake_case")]
pub enum TraceEntry {
    /// Event refused by the coherence check.
    Blocked {
        /// Day.
        day: u32,
        /// Event index.
        event: usize,
        /// Claimed place.
        place: String,
        /// Coherence score.
        score: f32,
        /// `kind:value` issues.
        issues: Vec<String>,
    },
    /// Event accepted and ingested.
    Experience {
        /// Day.
        day: u32,
        /// Event index.
        event: usize,
        /// Place.
        place: String,
        /// Event kind.
        kind: EventKind,
    },
    /// Someone outside the family was seen.
    Social {
        /// Day.
        day: u32,
        /// Event index.
        event: usize,
        /// Place.
        place: String,
        /// Who was seen.
        saw: String,
        /// Who else was there.
        with: Vec<String>,
        /// Animals present.
        pets: Vec<String>,
        /// What was happening.
        action: String,
        /// Object involved.
        object: Option<String>,
    },
}

/// Entry in the mind's own activity timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    /// Activity label: `ingest`, `trace_write`, `body`, `sleep_start`...
    pub kind: String,
    /// Day.
    pub day: u32,
    /// Free-form detail.
    pub detail: Value,
}
