use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const HUNGER_DRIFT: f32 = 0.02;
const FATIGUE_DRIFT: f32 = 0.015;
const DISCOMFORT_DRIFT: f32 = 0.01;
const FEED_RELIEF: f32 = 0.4;
const SLEEP_RELIEF: f32 = 0.6;
const COLD_DISCOMFORT: f32 = 0.05;

/// Default amount removed from discomfort by soothing.
pub const SOOTHE_AMOUNT: f32 = 0.2;

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// Physiological needs. Biology, not cognition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BiologicalState {
    /// Hunger, 0..1.
    pub hunger: f32,
    /// Fatigue, 0..1.
    pub fatigue: f32,
    /// Discomfort, 0..1.
    pub discomfort: f32,
    /// Derived cry level, 0..1.
    pub cry: f32,
}

impl Default for BiologicalState {
    fn default() -> Self {
        // Cry stays at rest until the first drift or relief.
        Self {
            hunger: 0.30,
            fatigue: 0.20,
            discomfort: 0.10,
            cry: 0.0,
        }
    }
}

/// Rounded body values for observers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BodySnapshot {
    /// Hunger.
    pub hunger: f32,
    /// Fatigue.
    pub fatigue: f32,
    /// Discomfort.
    pub discomfort: f32,
    /// Cry.
    pub cry: f32,
}

impl BiologicalState {
    /// Natural drift while awake.
    pub fn update(&mut self) {
        self.hunger = (self.hunger + HUNGER_DRIFT).min(1.0);
        self.fatigue = (self.fatigue + FATIGUE_DRIFT).min(1.0);
        self.discomfort = (self.discomfort + DISCOMFORT_DRIFT).min(1.0);
        self.recalc_cry();
    }

    /// Lowers discomfort.
    pub fn soothe(&mut self, amount: f32) {
        self.discomfort = (self.discomfort - amount).max(0.0);
        self.recalc_cry();
    }

    /// Lowers hunger.
    pub fn feed(&mut self) {
        self.hunger = (self.hunger - FEED_RELIEF).max(0.0);
        self.recalc_cry();
    }

    /// Lowers fatigue.
    pub fn sleep(&mut self) {
        self.fatigue = (self.fatigue - SLEEP_RELIEF).max(0.0);
        self.recalc_cry();
    }

    /// Applies observer-declared body effects such as `hunger=reduced`.
    /// Unknown effects are ignored.
    pub fn apply_effects(&mut self, effects: &IndexMap<String, String>) {
        for (effect, value) in effects {
            match (effect.as_str(), value.as_str()) {
                ("hunger", "reduced") => self.feed(),
                ("discomfort", "reduced") => self.soothe(SOOTHE_AMOUNT),
                ("comfort", "rising" | "high") => self.soothe(0.1),
                ("temperature", "cold") => {
                    self.discomfort = (self.discomfort + COLD_DISCOMFORT).min(1.0);
                    self.recalc_cry();
                }
                _ => {}
            }
        }
    }

    /// Cry level rounded to 3dp.
    #[must_use]
    pub fn cry_level(&self) -> f32 {
        round3(self.cry)
    }

    /// Rounded snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            hunger: round3(self.hunger),
            fatigue: round3(self.fatigue),
            discomfort: round3(self.discomfort),
            cry: round3(self.cry),
        }
    }

    fn recalc_cry(&mut self) {
        self.cry = 0.4f32
            .mul_add(self.discomfort, 0.5f32.mul_add(self.hunger, 0.3 * self.fatigue))
            .min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn starts_calm_and_drifts() {
        let mut body = BiologicalState::default();
        assert!(close(body.cry, 0.0));
        body.update();
        assert!(close(body.hunger, 0.32));
        assert!(close(body.fatigue, 0.215));
        assert!(close(body.discomfort, 0.11));
        assert!(close(body.cry, 0.5 * 0.32 + 0.3 * 0.215 + 0.4 * 0.11));
    }

    #[test]
    fn relief_floors_at_zero() {
        let mut body = BiologicalState::default();
        body.feed();
        body.sleep();
        body.soothe(SOOTHE_AMOUNT);
        assert!(close(body.hunger, 0.0));
        assert!(close(body.fatigue, 0.0));
        assert!(close(body.discomfort, 0.0));
        assert!(close(body.cry, 0.0));
    }

    #[test]
    fn drift_caps_at_one() {
        let mut body = BiologicalState::default();
        for _ in 0..100 {
            body.update();
        }
        assert!(close(body.hunger, 1.0));
        assert!(close(body.cry, 1.0));
    }

    #[test]
    fn effects_map_to_needs() {
        let mut body = BiologicalState::default();
        let effects = indexmap! {
            "hunger".to_string() => "reduced".to_string(),
            "temperature".to_string() => "cold".to_string(),
            "mood".to_string() => "sunny".to_string(),
        };
        body.apply_effects(&effects);
        assert!(close(body.hunger, 0.0));
        assert!(close(body.discomfort, 0.15));

        let mut comfort = IndexMap::new();
        comfort.insert("comfort".to_string(), "high".to_string());
        body.apply_effects(&comfort);
        assert!(close(body.discomfort, 0.05));
    }

    #[test]
    fn snapshot_rounds_to_three_places() {
        let mut body = BiologicalState::default();
        body.update();
        body.update();
        body.update();
        let snap = body.snapshot();
        assert!(close(snap.fatigue, 0.245));
        assert!(close(snap.cry, body.cry_level()));
    }
}
