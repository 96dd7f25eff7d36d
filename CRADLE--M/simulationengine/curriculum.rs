//! Observer-side curriculum bots. They read a few signals, propose future
//! paths and, once paths are approved, turn them into grounded events.
//! They never write to the mind.

use cradle_mind::Mind;
use cradle_world::{
    places::{HOME, PARK},
    EventKind, ExperienceEvent, Movement, ObjectProfile, PersonProfile, WorldState, SELF_AGENT,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    future_paths::{FuturePath, FuturePathRegistry, PathKind, PathProposal, PathStatus, UnlockRule},
    helper::seeded_rng,
    routine::{bed_sleep_event, wake_event},
    source::reindex,
};

const BALL_EXPOSURE_TARGET: u32 = 3;
const PARK_WALK_MAX_CRY: f32 = 0.8;
const VISIT_MAX_CRY: f32 = 0.7;
const MAX_PATHS_PER_DAY: usize = 10;
const NEIGHBOUR_ROLE: &str = "neighbour";
const NEIGHBOUR_AGE: u32 = 35;

/// Read-only signals the bots look at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurriculumSignals {
    /// Times `ball` has been heard.
    pub ball_exposure: u32,
    /// Current cry level.
    pub cry: f32,
    /// Where the infant is, observer side.
    pub place: String,
    /// Episodes remembered so far.
    pub memory_len: usize,
}

impl CurriculumSignals {
    /// Reads signals from a mind and the world.
    #[must_use]
    pub fn observe(mind: &Mind, world: &WorldState) -> Self {
        Self {
            ball_exposure: mind.lexicon().count("ball"),
            cry: mind.body().cry_level(),
            place: world.current_place.clone(),
            memory_len: mind.summary().episode_count,
        }
    }
}

fn signal_seed(world: &WorldState, signals: &CurriculumSignals, salt: u64) -> u64 {
    world
        .seed
        .wrapping_add(signals.memory_len as u64)
        .wrapping_add(salt)
}

fn pick_speaker(world: &WorldState, seed: u64) -> Option<(String, String)> {
    let doors: Vec<&String> = world.profiles.neighbour_families.keys().collect();
    let door = doors.choose(&mut seeded_rng(seed))?;
    let speaker = world.profiles.neighbour_families.get(*door)?.speaker()?;
    Some(((*door).clone(), speaker.to_string()))
}

/// Proposes ball grounding, a park walk and a neighbour meeting when the
/// signals allow. Returns the ids registered.
pub fn propose_paths(
    bot_name: &str,
    registry: &mut FuturePathRegistry,
    world: &WorldState,
    signals: &CurriculumSignals,
) -> Vec<String> {
    let mut ids = Vec::new();

    if signals.ball_exposure < BALL_EXPOSURE_TARGET {
        ids.push(
            registry.propose(
                PathProposal::new(
                    PathKind::Object,
                    json!({
                        "name": "ball",
                        "category": "toy",
                        "colour": "red",
                        "shape": "round",
                        "affordances": ["roll", "throw", "catch"],
                    }),
                )
                .unlock(UnlockRule {
                    min_day: Some(0),
                    max_cry: Some(0.9),
                    ..UnlockRule::default()
                })
                .priority(0.8)
                .novelty_cost(0.2)
                .note(format!("{bot_name}: reinforce early object grounding")),
            ),
        );
    }

    if signals.cry < PARK_WALK_MAX_CRY {
        ids.push(
            registry.propose(
                PathProposal::new(
                    PathKind::Routine,
                    json!({ "name": "short_walk_to_park", "from": HOME, "to": PARK }),
                )
                .unlock(UnlockRule {
                    min_day: Some(1),
                    max_cry: Some(PARK_WALK_MAX_CRY),
                    ..UnlockRule::default()
                })
                .priority(0.6)
                .novelty_cost(0.4)
                .note(format!("{bot_name}: introduce outdoor sensory variation")),
            ),
        );
    }

    if let Some((door, speaker)) = pick_speaker(world, signal_seed(world, signals, 777)) {
        ids.push(
            registry.propose(
                PathProposal::new(
                    PathKind::Person,
                    json!({ "name": speaker, "door": door, "context": "neighbour_meeting" }),
                )
                .unlock(UnlockRule {
                    min_day: Some(1),
                    ..UnlockRule::default()
                })
                .note(format!("{bot_name}: expand social continuity")),
            ),
        );
    }

    ids
}

/// Proposes one neighbour visit, only at home and while calm enough.
pub fn propose_neighbour_visit(
    registry: &mut FuturePathRegistry,
    world: &WorldState,
    signals: &CurriculumSignals,
) -> Option<String> {
    if signals.place != HOME || signals.cry > VISIT_MAX_CRY {
        return None;
    }
    let (door, visitor) = pick_speaker(world, signal_seed(world, signals, 0))?;
    let note = format!("Neighbour {visitor} from door {door} visits briefly");
    Some(
        registry.propose(
            PathProposal::new(
                PathKind::Routine,
                json!({ "name": "neighbour_visit", "door": door, "visitor": visitor, "place": HOME }),
            )
            .unlock(UnlockRule {
                min_day: Some(0),
                max_cry: Some(VISIT_MAX_CRY),
                place: Some(HOME.into()),
                ..UnlockRule::default()
            })
            .priority(0.7)
            .novelty_cost(0.3)
            .note(note),
        ),
    )
}

fn register_neighbour(world: &mut WorldState, name: &str) {
    if !world.profiles.knows_agent(name) {
        world
            .profiles
            .add_person(PersonProfile::new(name, NEIGHBOUR_ROLE, NEIGHBOUR_AGE));
    }
}

fn object_event(world: &mut WorldState, path: &FuturePath) -> ExperienceEvent {
    let name = path.field("name").unwrap_or("object").to_string();
    if !world.profiles.knows_object(&name) {
        let mut object = ObjectProfile::new(&name, path.field("category").unwrap_or("toy"));
        object.colour = path.field("colour").map(str::to_string);
        object.shape = path.field("shape").map(str::to_string);
        object.affordances = path
            .proposal
            .get("affordances")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        world.profiles.add_object(object);
    }
    ExperienceEvent::new(0, EventKind::Play, HOME)
        .room("living_room")
        .actor("Dad", "showed")
        .object(&name)
        .presence(["Dad", "Mum"])
        .emphasis([name.to_uppercase()])
        .sense("sound", "gentle voice")
        .sense("touch", "held near hands")
        .note("Grounded object exposure at home")
}

fn greeting_event(world: &mut WorldState, speaker: &str) -> ExperienceEvent {
    register_neighbour(world, speaker);
    ExperienceEvent::new(0, EventKind::Social, HOME)
        .room("living_room")
        .actor(speaker, "said")
        .object(SELF_AGENT)
        .presence([speaker, "Mum", "Dad"])
        .sense("sound", "hello voice")
        .sense("touch", "pat")
        .spoken(["hello"])
        .transaction(SELF_AGENT, "calm")
        .note("Neighbour greeting")
}

fn park_walk_event() -> ExperienceEvent {
    ExperienceEvent::new(0, EventKind::Outing, HOME)
        .room("hall")
        .actor("Mum", "carried")
        .object(SELF_AGENT)
        .presence(["Mum", "Dad"])
        .movement(Movement::new(HOME, PARK).mode("carried"))
        .sense("sound", "outside air")
        .sense("smell", "grass")
        .note("Movement to park")
}

fn visit_event(world: &mut WorldState, visitor: &str, door: &str) -> ExperienceEvent {
    register_neighbour(world, visitor);
    ExperienceEvent::new(0, EventKind::Social, HOME)
        .room("living_room")
        .actor(visitor, "visited")
        .object(SELF_AGENT)
        .presence([visitor, "Mum"])
        .sense("sound", "door knock")
        .sense("sound", "new voice")
        .spoken(["hello", "baby"])
        .transaction(SELF_AGENT, "calm")
        .note(format!("Neighbour visit from {door}"))
}

/// Builds a day from the top approved paths and marks them scheduled.
/// Empty when nothing usable is approved; otherwise wrapped in a wake and
/// a bedtime.
pub fn build_day_from_approved(
    registry: &mut FuturePathRegistry,
    world: &mut WorldState,
    day: u32,
) -> Vec<ExperienceEvent> {
    let approved: Vec<FuturePath> = registry
        .list(Some(PathStatus::Approved))
        .into_iter()
        .take(MAX_PATHS_PER_DAY)
        .cloned()
        .collect();

    let mut scenes = Vec::new();
    for path in &approved {
        let event = match (path.kind, path.field("name")) {
            (PathKind::Object, _) => Some(object_event(world, path)),
            (PathKind::Person, Some(speaker)) => Some(greeting_event(world, speaker)),
            (PathKind::Routine, Some("short_walk_to_park")) => Some(park_walk_event()),
            (PathKind::Routine, Some("neighbour_visit")) => path
                .field("visitor")
                .map(|visitor| visit_event(world, visitor, path.field("door").unwrap_or("-"))),
            _ => None,
        };
        if let Some(event) = event {
            scenes.push(event);
            registry.mark_scheduled(&path.path_id);
        }
    }

    if scenes.is_empty() {
        return scenes;
    }
    let mut events = vec![wake_event(day)];
    events.extend(scenes);
    events.push(bed_sleep_event());
    reindex(&mut events, day);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::{check, generate_world, places::BEDROOM};

    fn signals(ball: u32, cry: f32, place: &str) -> CurriculumSignals {
        CurriculumSignals {
            ball_exposure: ball,
            cry,
            place: place.into(),
            memory_len: 4,
        }
    }

    #[test]
    fn bots_respect_signal_thresholds() {
        let world = generate_world(3);
        let mut registry = FuturePathRegistry::default();
        assert_eq!(propose_paths("curriculum", &mut registry, &world, &signals(0, 0.1, HOME)).len(), 3);
        let listed = registry.list(None);
        assert_eq!(listed[0].field("name"), Some("ball"));
        assert_eq!(listed[0].kind, PathKind::Object);

        let mut quiet = FuturePathRegistry::default();
        let ids = propose_paths("curriculum", &mut quiet, &world, &signals(5, 0.85, HOME));
        assert_eq!(ids.len(), 1);
        assert_eq!(quiet.get(&ids[0]).unwrap().kind, PathKind::Person);
    }

    #[test]
    fn neighbour_visit_needs_home_and_calm() {
        let world = generate_world(3);
        let mut registry = FuturePathRegistry::default();
        assert!(propose_neighbour_visit(&mut registry, &world, &signals(0, 0.2, PARK)).is_none());
        assert!(propose_neighbour_visit(&mut registry, &world, &signals(0, 0.75, HOME)).is_none());
        let id = propose_neighbour_visit(&mut registry, &world, &signals(0, 0.7, HOME)).unwrap();
        let path = registry.get(&id).unwrap();
        assert_eq!(path.unlock.place.as_deref(), Some(HOME));
        assert!((path.priority - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn approved_paths_become_a_grounded_day() {
        let mut world = generate_world(3);
        let mut registry = FuturePathRegistry::default();
        let ids = propose_paths("curriculum", &mut registry, &world, &signals(0, 0.1, HOME));
        let visit = propose_neighbour_visit(&mut registry, &world, &signals(0, 0.1, HOME)).unwrap();
        for id in ids.iter().chain(std::iter::once(&visit)) {
            registry.approve(id);
        }

        let day = build_day_from_approved(&mut registry, &mut world, 2);
        assert_eq!(day.len(), 6);
        assert_eq!(day[0].kind, EventKind::Wake);
        assert_eq!(day[1].object.as_deref(), Some("ball"));
        assert_eq!(day[1].emphasis, vec!["BALL"]);
        assert_eq!(day[5].place_id, BEDROOM);
        assert!(world.profiles.knows_object("ball"));
        assert_eq!(world.profiles.objects["ball"].colour.as_deref(), Some("red"));
        assert!(day.iter().all(|e| check(&world, e).is_clean()));
        assert!(registry.list(Some(PathStatus::Approved)).is_empty());
        assert_eq!(registry.list(Some(PathStatus::Scheduled)).len(), 4);
    }

    #[test]
    fn nothing_approved_builds_nothing() {
        let mut world = generate_world(3);
        let mut registry = FuturePathRegistry::default();
        propose_paths("curriculum", &mut registry, &world, &signals(0, 0.1, HOME));
        assert!(build_day_from_approved(&mut registry, &mut world, 2).is_empty());
    }
}
