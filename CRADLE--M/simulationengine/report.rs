use cradle_mind::{BodySnapshot, MindSummary, SleepReport};
use cradle_world::{CoherenceIssue, EventKind, WorldSnapshot};
use serde::{Deserialize, Serialize};

use crate::{day_cycle::DayCycle, experience::LifePhase, schedule::ScheduleStatus};

/// Result of feeding one scheduled event through the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepOutcome {
    /// Day.
    pub day: u32,
    /// Position in the day.
    pub index: usize,
    /// Kind of event.
    pub kind: EventKind,
    /// Where it happened.
    pub place: String,
    /// Whether the mind accepted it (and the world applied it).
    pub accepted: bool,
    /// Coherence score.
    pub coherence: f32,
    /// Issues found.
    pub issues: Vec<CoherenceIssue>,
    /// Body after the event.
    pub body: BodySnapshot,
    /// Ambient packets delivered after the event.
    pub packets: usize,
}

/// Summary of one simulated day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayReport {
    /// Day.
    pub day: u32,
    /// Source that built the day.
    pub source: String,
    /// Events loaded.
    pub events: usize,
    /// Events accepted.
    pub accepted: usize,
    /// Events blocked.
    pub blocked: usize,
    /// Ambient packets delivered.
    pub packets: usize,
    /// Consolidation report.
    pub sleep: SleepReport,
    /// Body when the day ended.
    pub body: BodySnapshot,
}

/// Summary of a multi-day run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Seed.
    pub seed: u64,
    /// Per-day reports.
    pub days: Vec<DayReport>,
    /// Mind summary at the end.
    pub mind: MindSummary,
}

impl RunReport {
    /// Accepted events across all days.
    #[must_use]
    pub fn total_accepted(&self) -> usize {
        self.days.iter().map(|day| day.accepted).sum()
    }

    /// Blocked events across all days.
    #[must_use]
    pub fn total_blocked(&self) -> usize {
        self.days.iter().map(|day| day.blocked).sum()
    }
}

/// Observer snapshot of the whole engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSnapshot {
    /// Seed.
    pub seed: u64,
    /// Source label.
    pub source: String,
    /// Life phase.
    pub phase: LifePhase,
    /// Day counter and phase.
    pub cycle: DayCycle,
    /// Schedule status.
    pub schedule: ScheduleStatus,
    /// World summary.
    pub world: WorldSnapshot,
    /// Mind summary.
    pub mind: MindSummary,
    /// Registered future paths.
    pub paths: usize,
}
