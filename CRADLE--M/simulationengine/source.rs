use cradle_world::{ExperienceEvent, WorldState};
use serde::{Deserialize, Serialize};

/// Produces the grounded events of one simulated day.
pub trait ExperienceSource: Send {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Builds day `day`. Sources may update background world state (bots,
    /// profiles) but never the infant's position.
    fn build_day(&mut self, world: &mut WorldState, day: u32) -> Vec<ExperienceEvent>;
}

/// Which built-in source drives a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Seeded newborn routine with learning scenes.
    #[default]
    Newborn,
    /// Fixed caregiver flow rotating through places.
    Caregiver,
}

impl SourceKind {
    /// Parses a label.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newborn" => Some(Self::Newborn),
            "caregiver" => Some(Self::Caregiver),
            _ => None,
        }
    }
}

/// Renumbers events 0..n in order and pins them to `day`.
pub fn reindex(events: &mut [ExperienceEvent], day: u32) {
    for (index, event) in events.iter_mut().enumerate() {
        event.index = index;
        event.day = day;
    }
}
