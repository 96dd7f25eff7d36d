#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Cradle Simulation – schedules the infant's days, feeds experiences to the
//! mind, and keeps the world and the mind in step through wake and sleep.

/// Telemetry for the simulation.
#[path = "../helper.rs"]
pub mod helper;

/// Day counter and phases.
#[path = "../day_cycle.rs"]
pub mod day_cycle;

/// Daily event schedule.
#[path = "../schedule.rs"]
pub mod schedule;

/// Experience sources.
#[path = "../source.rs"]
pub mod source;

/// Seeded newborn routine.
#[path = "../routine.rs"]
pub mod routine;

/// Scripted caregiver days.
#[path = "../caregiver.rs"]
pub mod caregiver;

/// Ambient world events.
#[path = "../ambient.rs"]
pub mod ambient;

/// World timeline to sensory packets.
#[path = "../bridge.rs"]
pub mod bridge;

/// Life phases.
#[path = "../experience.rs"]
pub mod experience;

/// Future path registry.
#[path = "../future_paths.rs"]
pub mod future_paths;

/// Curriculum bots and approved-day building.
#[path = "../curriculum.rs"]
pub mod curriculum;

/// Sandbox configuration.
#[path = "../config.rs"]
pub mod config;

/// Run reports and snapshots.
#[path = "../report.rs"]
pub mod report;

/// Engine runtime.
#[path = "../main.rs"]
pub mod runtime;

pub use ambient::WorldEventGenerator;
pub use bridge::WorldBridge;
pub use caregiver::CaregiverFlow;
pub use config::{SandboxConfig, TelemetryConfig};
pub use day_cycle::{DayCycle, DayPhase, DayType};
pub use experience::{LifePhase, PhaseController};
pub use future_paths::{
    FuturePath, FuturePathRegistry, PathKind, PathProposal, PathStatus, UnlockContext, UnlockRule,
};
pub use helper::{SimulationTelemetry, SimulationTelemetryBuilder};
pub use report::{DayReport, EngineSnapshot, RunReport, StepOutcome};
pub use routine::{NewbornConfig, NewbornRoutine};
pub use runtime::{SimulationEngine, SimulationEngineBuilder};
pub use schedule::{Schedule, ScheduleError, ScheduleState, ScheduleStatus, ScheduledMovement};
pub use source::{ExperienceSource, SourceKind};
