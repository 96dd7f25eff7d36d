use indexmap::IndexMap;

/// Default gain per waking observation.
pub const OBSERVE_DELTA: f32 = 0.02;
/// Default gain per sleep reinforcement.
pub const REINFORCE_DELTA: f32 = 0.01;
const SNAPSHOT_FLOOR: f32 = 0.05;

/// How familiar sensory patterns are. Familiarity is not preference.
#[derive(Debug, Clone)]
pub struct FamiliarityMemory {
    scores: IndexMap<(String, String), f32>,
    observe_delta: f32,
    reinforce_delta: f32,
}

impl Default for FamiliarityMemory {
    fn default() -> Self {
        Self::with_deltas(OBSERVE_DELTA, REINFORCE_DELTA)
    }
}

impl FamiliarityMemory {
    /// Creates a memory with custom gains.
    #[must_use]
    pub fn with_deltas(observe_delta: f32, reinforce_delta: f32) -> Self {
        Self {
            scores: IndexMap::new(),
            observe_delta,
            reinforce_delta,
        }
    }

    fn bump(&mut self, modality: &str, value: &str, delta: f32) {
        let score = self
            .scores
            .entry((modality.to_string(), value.to_string()))
            .or_insert(0.0);
        *score = (*score + delta).min(1.0);
    }

    /// Waking exposure.
    pub fn observe(&mut self, modality: &str, value: &str) {
        self.bump(modality, value, self.observe_delta);
    }

    /// Sleep replay exposure.
    pub fn reinforce(&mut self, modality: &str, value: &str) {
        self.bump(modality, value, self.reinforce_delta);
    }

    /// Score of a pattern, 0 when unseen.
    #[must_use]
    pub fn get(&self, modality: &str, value: &str) -> f32 {
        self.scores
            .get(&(modality.to_string(), value.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Patterns above the noise floor, keyed `modality:value`, 3dp.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, f32> {
        self.scores
            .iter()
            .filter(|(_, score)| **score > SNAPSHOT_FLOOR)
            .map(|((modality, value), score)| {
                (format!("{modality}:{value}"), (score * 1000.0).round() / 1000.0)
            })
            .collect()
    }

    /// Patterns tracked, including those below the floor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when nothing was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
