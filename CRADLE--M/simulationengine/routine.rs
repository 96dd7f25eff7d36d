//! Seeded newborn routine. Day 0 is birth; every later day starts with a
//! wake, weaves feeds and changes into learning scenes and ends in bed.

use cradle_world::{
    places::{BEDROOM, DOCTORS, HOME, HOSPITAL, PARK, SHOPS, STREET},
    EventKind, ExperienceEvent, Movement, WorldState, SELF_AGENT,
};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    helper::seeded_rng,
    schedule::BED,
    source::{reindex, ExperienceSource},
};

const HOME_SCENE_SHARE: f64 = 0.75;
const OUTING_PLACES: [&str; 3] = [PARK, SHOPS, DOCTORS];

/// Routine knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewbornConfig {
    /// Days a full run covers.
    pub days: u32,
    /// Learning scenes per normal day.
    pub learning_events_per_day: usize,
    /// A feed follows every nth scheduled event.
    pub feed_every: usize,
    /// A nappy change follows every nth scheduled event.
    pub change_every: usize,
    /// Modes an outing may use.
    pub transport_modes: Vec<String>,
}

impl Default for NewbornConfig {
    fn default() -> Self {
        Self {
            days: 20,
            learning_events_per_day: 15,
            feed_every: 4,
            change_every: 4,
            transport_modes: vec!["car".into(), "buggy".into(), "bus".into()],
        }
    }
}

/// Newborn routine generator.
#[derive(Debug, Clone)]
pub struct NewbornRoutine {
    seed: u64,
    config: NewbornConfig,
    overnight_in_hospital: bool,
}

impl NewbornRoutine {
    /// Creates a routine.
    #[must_use]
    pub const fn new(seed: u64, config: NewbornConfig) -> Self {
        Self {
            seed,
            config,
            overnight_in_hospital: false,
        }
    }

    /// Keeps the infant in hospital for the rest of day 0.
    #[must_use]
    pub const fn overnight_in_hospital(mut self, overnight: bool) -> Self {
        self.overnight_in_hospital = overnight;
        self
    }

    /// Routine knobs.
    #[must_use]
    pub const fn config(&self) -> &NewbornConfig {
        &self.config
    }

    /// Builds one day. Same seed and day, same events.
    #[must_use]
    pub fn plan(&self, day: u32) -> Vec<ExperienceEvent> {
        let mut rng = seeded_rng(self.seed.wrapping_mul(10_000).wrapping_add(u64::from(day)));
        let mut events = if day == 0 {
            let mut events = birth_block();
            if self.overnight_in_hospital {
                events.extend(hospital_overnight_block());
            } else {
                events.extend(journey_home_block(&mut rng));
            }
            events
        } else {
            let mut scenes = vec![wake_event(day)];
            for _ in 0..self.config.learning_events_per_day {
                let scene = if rng.gen_bool(HOME_SCENE_SHARE) {
                    home_scene(&mut rng)
                } else {
                    self.outing_scene(&mut rng)
                };
                scenes.push(scene);
            }
            self.weave_needs(scenes)
        };
        events.push(bed_sleep_event());
        reindex(&mut events, day);
        events
    }

    fn outing_scene(&self, rng: &mut SmallRng) -> ExperienceEvent {
        let place = OUTING_PLACES.choose(rng).copied().unwrap_or(PARK);
        let mode = self
            .config
            .transport_modes
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "buggy".into());
        let sound = if place == PARK { "birds" } else { "indoor hum" };
        ExperienceEvent::new(0, EventKind::Outing, HOME)
            .actor("Mum", "took")
            .object(SELF_AGENT)
            .presence(["Mum"])
            .movement(Movement::new(HOME, place).mode(mode.clone()))
            .sense("motion", format!("{mode} moving"))
            .sense("sound", sound)
            .spoken([place])
            .note(format!("Outing: {mode} to {place}"))
    }

    fn weave_needs(&self, scenes: Vec<ExperienceEvent>) -> Vec<ExperienceEvent> {
        let mut out = Vec::with_capacity(scenes.len() * 2);
        for (i, scene) in scenes.into_iter().enumerate() {
            out.push(scene);
            if i > 0 && is_every(i, self.config.feed_every) {
                out.push(feed_event());
            }
            if i > 0 && is_every(i, self.config.change_every) {
                out.push(change_event());
            }
        }
        out
    }
}

impl ExperienceSource for NewbornRoutine {
    fn name(&self) -> &'static str {
        "newborn"
    }

    fn build_day(&mut self, _world: &mut WorldState, day: u32) -> Vec<ExperienceEvent> {
        self.plan(day)
    }
}

const fn is_every(i: usize, every: usize) -> bool {
    every > 0 && i % every == 0
}

fn birth_block() -> Vec<ExperienceEvent> {
    vec![
        ExperienceEvent::new(0, EventKind::Birth, HOSPITAL)
            .room("delivery_room")
            .actor("Nurse", "checked")
            .object(SELF_AGENT)
            .presence(["Mum", "Dad", "Nurse"])
            .sense("vision", "bright lights")
            .sense("sound", "voices")
            .sense("smell", "antiseptic")
            .sense("touch", "handled")
            .effect("temperature", "cold")
            .effect("comfort", "low")
            .spoken(["mum", "dad"])
            .note("Birth: checks, lights, voices"),
        ExperienceEvent::new(0, EventKind::Birth, HOSPITAL)
            .room("ward")
            .actor("Mum", "held")
            .object(SELF_AGENT)
            .presence(["Mum", "Dad", "Nurse"])
            .sense("sound", "crying")
            .sense("touch", "wrapped")
            .sense("vision", "faces close")
            .effect("comfort", "rising")
            .spoken(["nurse", "mum", "dad"])
            .tag("affect", "calm")
            .note("Birth: wrapped, held, first calm"),
    ]
}

fn hospital_overnight_block() -> Vec<ExperienceEvent> {
    (0..4)
        .map(|_| {
            ExperienceEvent::new(0, EventKind::Care, HOSPITAL)
                .room("ward")
                .actor("Mum", "held")
                .object(SELF_AGENT)
                .presence(["Mum", "Nurse"])
                .sense("sound", "quiet ward")
                .sense("touch", "gentle hold")
                .spoken(["shh", "sleep"])
                .duration(2.0)
                .note("Hospital overnight: calm ward")
        })
        .collect()
}

fn journey_home_block(rng: &mut SmallRng) -> Vec<ExperienceEvent> {
    let mode = if rng.gen_bool(0.5) { "car" } else { "buggy" };
    vec![
        ExperienceEvent::new(0, EventKind::Travel, HOSPITAL)
            .actor("Dad", "carried")
            .object(SELF_AGENT)
            .presence(["Mum", "Dad"])
            .movement(Movement::new(HOSPITAL, STREET).mode(mode))
            .sense("sound", "traffic")
            .sense("motion", "moving")
            .sense("vision", "outside blur")
            .spoken(["going", "home"])
            .note(format!("Journey home: {mode} strap, motion")),
        ExperienceEvent::new(0, EventKind::Travel, PARK)
            .presence(["Mum", "Dad"])
            .sense("vision", "open sky")
            .sense("sound", "birds")
            .sense("smell", "grass")
            .spoken(["park"])
            .duration(0.25)
            .note("Passing park"),
        ExperienceEvent::new(0, EventKind::Travel, SHOPS)
            .presence(["Mum", "Dad"])
            .sense("vision", "bright signs")
            .sense("sound", "chatter")
            .spoken(["shops"])
            .duration(0.25)
            .note("Passing shops"),
        ExperienceEvent::new(0, EventKind::Travel, STREET)
            .actor("Dad", "carried")
            .object(SELF_AGENT)
            .presence(["Mum", "Dad"])
            .movement(Movement::new(STREET, HOME).mode(mode))
            .sense("sound", "door")
            .sense("smell", "home fabric")
            .spoken(["home"])
            .note("Arrive home"),
    ]
}

pub(crate) fn wake_event(day: u32) -> ExperienceEvent {
    ExperienceEvent::new(day, EventKind::Wake, BEDROOM)
        .room(BED)
        .actor("Mum", "woke")
        .object(SELF_AGENT)
        .presence(["Mum"])
        .sense("sound", "morning voices")
        .sense("light", "soft")
        .spoken(["good", "morning"])
        .note("Wake")
}

fn home_scene(rng: &mut SmallRng) -> ExperienceEvent {
    let base = ExperienceEvent::new(0, EventKind::Learning, HOME)
        .room("living_room")
        .presence(["Mum"]);
    match rng.gen_range(0..4) {
        0 => base
            .actor("Mum", "laid")
            .object("blanket")
            .sense("touch", "blanket")
            .sense("vision", "ceiling")
            .sense("sound", "mum voice")
            .spoken(["kicking", "legs"])
            .effect("motor", "legs_kicking")
            .note("Living room blanket: kicking legs prompt"),
        1 => base
            .actor("Mum", "offered")
            .object(SELF_AGENT)
            .sense("touch", "finger")
            .sense("sound", "mum laugh")
            .spoken(["got", "my", "finger"])
            .effect("motor", "grasp")
            .note("Grab mum finger"),
        2 => base
            .actor("Mum", "sang")
            .object(SELF_AGENT)
            .sense("touch", "toes")
            .sense("sound", "sing-song")
            .spoken(["this", "little", "piggy", "toe", "toe", "toe"])
            .effect("touch_zone", "feet")
            .note("Nursery rhyme: toe repetition"),
        _ => base
            .actor("Mum", "showed")
            .object("rattle")
            .sense("vision", "object close")
            .sense("sound", "labelled slowly")
            .spoken(["look"])
            .note("Home object glimpse"),
    }
}

fn feed_event() -> ExperienceEvent {
    ExperienceEvent::new(0, EventKind::Feed, HOME)
        .room("living_room")
        .actor("Mum", "fed")
        .object("bottle")
        .presence(["Mum"])
        .sense("touch", "held")
        .sense("sound", "soft voice")
        .spoken(["feed"])
        .effect("hunger", "reduced")
        .note("Feeding routine")
}

fn change_event() -> ExperienceEvent {
    ExperienceEvent::new(0, EventKind::Change, HOME)
        .room("bathroom")
        .actor("Mum", "changed")
        .object(SELF_AGENT)
        .presence(["Mum"])
        .sense("touch", "change")
        .sense("sound", "rustle")
        .spoken(["change"])
        .effect("discomfort", "reduced")
        .note("Nappy change routine")
}

pub(crate) fn bed_sleep_event() -> ExperienceEvent {
    ExperienceEvent::new(0, EventKind::Sleep, BEDROOM)
        .room(BED)
        .actor("Mum", "settled")
        .object(SELF_AGENT)
        .presence(["Mum"])
        .sense("sound", "quiet")
        .sense("light", "dark")
        .sense("touch", "blanket")
        .spoken(["sleep"])
        .effect("sleep", "onset")
        .duration(8.0)
        .note("Bedtime sleep")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::{check, generate_world};

    #[test]
    fn birth_day_goes_home_and_ends_in_bed() {
        let routine = NewbornRoutine::new(7, NewbornConfig::default());
        let day = routine.plan(0);
        assert_eq!(day.len(), 7);
        assert_eq!(day[0].kind, EventKind::Birth);
        assert_eq!(day[5].destination(), HOME);
        let last = day.last().unwrap();
        assert_eq!(last.kind, EventKind::Sleep);
        assert_eq!(last.place_id, BEDROOM);
        assert!(day.iter().enumerate().all(|(i, e)| e.index == i && e.day == 0));
    }

    #[test]
    fn overnight_stays_on_the_ward() {
        let routine = NewbornRoutine::new(7, NewbornConfig::default()).overnight_in_hospital(true);
        let day = routine.plan(0);
        assert_eq!(day.len(), 7);
        assert!(day[2..6]
            .iter()
            .all(|e| e.place_id == HOSPITAL && e.room.as_deref() == Some("ward")));
        assert!(day.iter().all(|e| e.movement.is_none()));
    }

    #[test]
    fn normal_day_weaves_needs_between_wake_and_sleep() {
        let routine = NewbornRoutine::new(7, NewbornConfig::default());
        let day = routine.plan(1);
        assert_eq!(day.len(), 23);
        assert_eq!(day[0].kind, EventKind::Wake);
        assert_eq!(day[22].kind, EventKind::Sleep);
        assert_eq!(day.iter().filter(|e| e.kind == EventKind::Feed).count(), 3);
        assert_eq!(day.iter().filter(|e| e.kind == EventKind::Change).count(), 3);
        assert_eq!(day[5].kind, EventKind::Feed);
        assert_eq!(day[6].kind, EventKind::Change);
    }

    #[test]
    fn days_are_reproducible_and_coherent() {
        let routine = NewbornRoutine::new(11, NewbornConfig::default());
        let a = serde_json::to_string(&routine.plan(3)).unwrap();
        let b = serde_json::to_string(&routine.plan(3)).unwrap();
        assert_eq!(a, b);

        let world = generate_world(11);
        for day in 0..4 {
            for event in routine.plan(day) {
                let report = check(&world, &event);
                assert!(report.is_clean(), "{:?}: {:?}", event.note, report.issues);
            }
        }
    }
}
