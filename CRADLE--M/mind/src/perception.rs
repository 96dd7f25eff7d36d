use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const COMFORT_AFFECT: [&str; 4] = ["comfort", "safe", "calm", "joy"];
const DISCOMFORT_AFFECT: [&str; 5] = ["fear", "pain", "cold", "wet", "hungry"];
const AFFECT_STEP: f32 = 0.05;

/// What the infant has come to know about a place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaceMemory {
    /// Times experienced.
    pub visits: u32,
    /// Accumulated hours.
    pub exposure: f32,
    /// 0..1, saturating with visits and exposure.
    pub familiarity: f32,
    /// -1..1, moved only by affect tokens.
    pub comfort_bias: f32,
    /// Day last seen.
    pub last_day_seen: u32,
}

/// Subjective awareness of the world, built only from experienced events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PerceivedWorldState {
    /// Where the infant believes it is.
    pub current_place: Option<String>,
    /// Last change of place, `from->to`.
    pub last_transition: Option<String>,
    /// Memories per place.
    pub familiar_places: IndexMap<String, PlaceMemory>,
}

impl PerceivedWorldState {
    /// Folds one experience at `place` into the perceived world.
    pub fn update_from_event(&mut self, place: &str, day: u32, duration: f32, affect: &[String]) {
        if place.is_empty() {
            return;
        }
        if let Some(previous) = self.current_place.as_deref().filter(|p| *p != place) {
            self.last_transition = Some(format!("{previous}->{place}"));
        }
        self.current_place = Some(place.to_string());

        let memory = self
            .familiar_places
            .entry(place.to_string())
            .or_insert_with(|| PlaceMemory {
                last_day_seen: day,
                ..PlaceMemory::default()
            });
        memory.visits += 1;
        memory.exposure += duration;
        memory.last_day_seen = day;

        #[allow(clippy::cast_precision_loss)]
        let visits = memory.visits as f32;
        let saturation = 0.08f32.mul_add(memory.exposure, 0.35f32.mul_add(visits, 1.0));
        memory.familiarity = (1.0 - 1.0 / saturation).clamp(0.0, 1.0);

        for token in affect {
            let token = token.trim().to_lowercase();
            if COMFORT_AFFECT.contains(&token.as_str()) {
                memory.comfort_bias += AFFECT_STEP;
            } else if DISCOMFORT_AFFECT.contains(&token.as_str()) {
                memory.comfort_bias -= AFFECT_STEP;
            }
        }
        memory.comfort_bias = memory.comfort_bias.clamp(-1.0, 1.0);
    }

    /// Familiarity of a place, 0 when never experienced.
    #[must_use]
    pub fn familiarity(&self, place: &str) -> f32 {
        self.familiar_places
            .get(place)
            .map_or(0.0, |memory| memory.familiarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn familiarity_follows_saturation_curve() {
        let mut perceived = PerceivedWorldState::default();
        perceived.update_from_event("house_home", 1, 2.0, &[]);
        let expected = 1.0 - 1.0 / (1.0 + 0.35 + 0.16);
        assert!((perceived.familiarity("house_home") - expected).abs() < 1e-5);
        assert_eq!(perceived.current_place.as_deref(), Some("house_home"));
        assert!(perceived.last_transition.is_none());
    }

    #[test]
    fn affect_moves_comfort_bias() {
        let mut perceived = PerceivedWorldState::default();
        let affect = vec!["Calm".to_string(), "joy".into(), "cold".into(), "blue".into()];
        perceived.update_from_event("park", 2, 0.5, &affect);
        let memory = &perceived.familiar_places["park"];
        assert!((memory.comfort_bias - 0.05).abs() < 1e-6);
        assert_eq!(memory.visits, 1);
    }

    #[test]
    fn transitions_and_empty_places() {
        let mut perceived = PerceivedWorldState::default();
        perceived.update_from_event("hospital", 0, 1.0, &[]);
        perceived.update_from_event("", 0, 1.0, &[]);
        perceived.update_from_event("house_home", 0, 1.0, &[]);
        assert_eq!(perceived.last_transition.as_deref(), Some("hospital->house_home"));
        assert_eq!(perceived.familiar_places.len(), 2);
    }
}
