use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Body zones tracked by the map.
pub const ZONES: [&str; 13] = [
    "head",
    "face",
    "chest",
    "back",
    "left_arm",
    "right_arm",
    "left_hand",
    "right_hand",
    "abdomen",
    "left_leg",
    "right_leg",
    "left_foot",
    "right_foot",
];

const DECAY: f32 = 0.05;

/// Where on the body sensation currently sits. A body schema, not cognition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SomaticMap {
    zones: IndexMap<String, f32>,
}

impl Default for SomaticMap {
    fn default() -> Self {
        Self {
            zones: ZONES.iter().map(|zone| ((*zone).to_string(), 0.0)).collect(),
        }
    }
}

impl SomaticMap {
    /// Registers touch at a zone. Unknown zones are ignored.
    pub fn apply_touch(&mut self, zone: &str, intensity: f32) {
        if let Some(level) = self.zones.get_mut(zone) {
            *level = (*level + intensity).min(1.0);
        }
    }

    /// Natural fading of every zone.
    pub fn decay(&mut self) {
        for level in self.zones.values_mut() {
            *level = (*level - DECAY).max(0.0);
        }
    }

    /// Current level of a zone.
    #[must_use]
    pub fn level(&self, zone: &str) -> f32 {
        self.zones.get(zone).copied().unwrap_or(0.0)
    }

    /// Active zones only, rounded to 3dp.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, f32> {
        self.zones
            .iter()
            .filter(|(_, level)| **level > 0.0)
            .map(|(zone, level)| (zone.clone(), (level * 1000.0).round() / 1000.0))
            .collect()
    }
}
