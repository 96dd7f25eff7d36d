#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Cradle Mind – the infant's body and pre-verbal mind. It only ever learns
//! from what it experiences: counters, familiarity, reflexes and replay.

/// Physiological needs.
pub mod body;
/// Co-occurrence familiarity of sensory patterns.
pub mod familiarity;
/// Response permission gate.
pub mod gate;
/// Token exposure and association edges.
pub mod lexicon;
/// Packets, traces and activity records.
pub mod memory;
/// Anchor-based recall.
pub mod pathing;
/// Subjective map of places.
pub mod perception;
/// Local reflexes and action routing.
pub mod reflex;
/// Sleep consolidation.
pub mod sleep;
/// Body schema.
pub mod somatic;

/// Mind runtime.
#[path = "../main.rs"]
pub mod runtime;

pub use body::{BiologicalState, BodySnapshot};
pub use familiarity::FamiliarityMemory;
pub use gate::{GateResult, GateState, ResponseGate};
pub use lexicon::{AssociationGraph, Edge, Lexicon};
pub use memory::{ActivityEntry, SensoryPacket, TraceEntry};
pub use pathing::traverse;
pub use perception::{PerceivedWorldState, PlaceMemory};
pub use reflex::{ActionDecision, ActionKind, ActionRouter, LocalBody};
pub use runtime::{IngestOutcome, Mind, MindConfig, MindSnapshot, MindSummary, FAMILY};
pub use sleep::{ReplayCoherence, SleepEngine, SleepInternalLog, SleepReport};
pub use somatic::SomaticMap;
