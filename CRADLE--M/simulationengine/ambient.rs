//! Objective background events: what happens around the infant whether or
//! not anything is scheduled. Caregiver and environment logic, no cognition.

use cradle_world::{
    places::{HOME, HOSPITAL},
    WorldEvent, WorldState,
};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng};

use crate::helper::seeded_rng;

const HOSPITAL_LIGHTS_CHANCE: f64 = 0.3;

const HOME_ROUTINES: [(&str, &str, &str); 4] = [
    ("Parent speaks softly nearby", "sound", "soft voice"),
    ("Being held gently", "touch", "held gently"),
    ("Household background noise", "sound", "household noise"),
    ("Warm blanket placed", "touch", "warm blanket"),
];

const TAG_MAP: [(&str, &[&str]); 4] = [
    ("speaks", &["voice", "sound"]),
    ("held", &["touch", "comfort"]),
    ("noise", &["sound"]),
    ("blanket", &["warmth", "touch"]),
];

/// Tags for a routine description, `neutral` when no keyword matches.
#[must_use]
pub fn routine_tags(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let tags: Vec<String> = TAG_MAP
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .flat_map(|(_, tags)| tags.iter().map(|tag| (*tag).to_string()))
        .collect();
    if tags.is_empty() {
        vec!["neutral".into()]
    } else {
        tags
    }
}

/// Seeded background event generator.
#[derive(Debug, Clone)]
pub struct WorldEventGenerator {
    rng: SmallRng,
    last_generated_time: Option<f32>,
}

impl WorldEventGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(seed),
            last_generated_time: None,
        }
    }

    /// Events for the current world time. Nothing when time has not moved
    /// since the previous call.
    pub fn generate(&mut self, world: &WorldState) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        let now = world.time;
        if self
            .last_generated_time
            .is_some_and(|last| (last - now).abs() < f32::EPSILON)
        {
            return events;
        }
        self.last_generated_time = Some(now);

        if world.birthed && world.current_place == HOSPITAL {
            let mut check = WorldEvent::new(
                now,
                world.day,
                HOSPITAL,
                "Nurse checks vital signs",
                ["care", "touch", "voice"],
            );
            check.sensory.insert("touch".into(), vec!["checked".into()]);
            check.sensory.insert("sound".into(), vec!["nurse voice".into()]);
            events.push(check);

            if self.rng.gen_bool(HOSPITAL_LIGHTS_CHANCE) {
                let mut lights = WorldEvent::new(
                    now,
                    world.day,
                    HOSPITAL,
                    "Bright hospital lights overhead",
                    ["light", "visual"],
                );
                lights
                    .sensory
                    .insert("vision".into(), vec!["bright lights".into()]);
                events.push(lights);
            }
        }

        if world.current_place == HOME {
            if let Some((description, modality, value)) = HOME_ROUTINES.choose(&mut self.rng) {
                let mut routine = WorldEvent::new(
                    now,
                    world.day,
                    HOME,
                    *description,
                    routine_tags(description),
                );
                routine
                    .sensory
                    .insert((*modality).to_string(), vec![(*value).to_string()]);
                events.push(routine);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::generate_world;

    #[test]
    fn tag_map_covers_every_routine() {
        assert_eq!(routine_tags("Parent speaks softly nearby"), vec!["voice", "sound"]);
        assert_eq!(routine_tags("Warm blanket placed"), vec!["warmth", "touch"]);
        assert_eq!(routine_tags("Door closes"), vec!["neutral"]);
    }

    #[test]
    fn hospital_care_only_after_birth() {
        let mut world = generate_world(1);
        let mut generator = WorldEventGenerator::new(1);
        assert!(generator.generate(&world).is_empty());

        world.register_birth();
        world.tick(1.0);
        let events = generator.generate(&world);
        assert_eq!(events[0].description, "Nurse checks vital signs");
        assert!(events.len() <= 2);
        assert!(events.iter().all(|e| !e.sensory.is_empty()));
    }

    #[test]
    fn nothing_new_while_time_stands_still() {
        let mut world = generate_world(1);
        world.current_place = HOME.into();
        let mut generator = WorldEventGenerator::new(3);
        assert_eq!(generator.generate(&world).len(), 1);
        assert!(generator.generate(&world).is_empty());
        world.tick(0.5);
        let events = generator.generate(&world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].place, HOME);
        assert!(!events[0].tags.is_empty());
    }
}
