use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    events::{EventKind, WorldEvent},
    places::{Place, HOSPITAL},
    profiles::{BotState, WorldProfiles},
};

/// Hours in a simulated day.
pub const HOURS_PER_DAY: f32 = 24.0;
const TIMELINE_LIMIT: usize = 512;
const BOT_MOVEMENT_LIMIT: usize = 64;

/// Errors raised when mutating the world.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// Mutation attempted while sleep replay holds the world frozen.
    #[error("world state is frozen during sleep replay")]
    Frozen,
    /// Reference to a place that does not exist.
    #[error("unknown place: {0}")]
    UnknownPlace(String),
}

/// Last movement of the infant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovementRecord {
    /// Origin.
    pub from: String,
    /// Destination.
    pub to: String,
    /// Mode label.
    pub mode: Option<String>,
    /// Day.
    pub day: u32,
    /// Event index.
    pub event: usize,
}

/// Last transport used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportRecord {
    /// Mode label.
    pub mode: String,
    /// Origin.
    pub from: String,
    /// Destination.
    pub to: String,
    /// Day.
    pub day: u32,
}

/// Where and when the infant last went to sleep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SleepRecord {
    /// Place.
    pub place: String,
    /// Day.
    pub day: u32,
}

/// Observer log entry for background bot movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotMovement {
    /// Bot name.
    pub bot: String,
    /// Origin.
    pub from: String,
    /// Destination.
    pub to: String,
    /// Day.
    pub day: u32,
}

/// Objective world state. Ground truth, never the infant's understanding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Seed the world was generated from.
    pub seed: u64,
    /// Current day.
    pub day: u32,
    /// Clock time, 0..24.
    pub time: f32,
    /// Whether birth has happened.
    pub birthed: bool,
    /// Where the infant is.
    pub current_place: String,
    /// Room within the current place.
    pub current_room: Option<String>,
    /// Body posture.
    pub posture: Option<String>,
    /// Index of the last applied event within its day.
    pub current_event_index: Option<usize>,
    /// Places by id.
    pub places: IndexMap<String, Place>,
    /// Undirected adjacency.
    pub routes: IndexMap<String, Vec<String>>,
    /// People living in the world.
    pub bots: IndexMap<String, BotState>,
    /// Allowed entities.
    pub profiles: WorldProfiles,
    /// Bounded objective timeline.
    pub timeline: VecDeque<WorldEvent>,
    /// Total timeline entries ever appended.
    pub timeline_total: u64,
    /// Kinds of every applied experience, in order.
    pub event_history: Vec<EventKind>,
    /// Raw somatic accumulation from observer tags.
    pub body_state: IndexMap<String, f32>,
    /// Last movement.
    pub last_movement: Option<MovementRecord>,
    /// Last transport.
    pub last_transport: Option<TransportRecord>,
    /// Last sleep.
    pub last_sleep: Option<SleepRecord>,
    /// Background bot movements (observer only).
    pub bot_movements: VecDeque<BotMovement>,
    frozen: bool,
}

/// Observer-safe summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    /// Day.
    pub day: u32,
    /// Clock time rounded to 2dp.
    pub time: f32,
    /// Current place.
    pub place: String,
    /// Current room.
    pub room: Option<String>,
    /// Whether birth has happened.
    pub birthed: bool,
    /// Timeline entries ever appended.
    pub event_count: u64,
    /// Whether sleep replay is running.
    pub frozen: bool,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WorldState {
    /// Creates an empty world: no places, infant nominally at the hospital.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            day: 0,
            time: 0.0,
            birthed: false,
            current_place: HOSPITAL.into(),
            current_room: None,
            posture: None,
            current_event_index: None,
            places: IndexMap::new(),
            routes: IndexMap::new(),
            bots: IndexMap::new(),
            profiles: WorldProfiles::default(),
            timeline: VecDeque::new(),
            timeline_total: 0,
            event_history: Vec::new(),
            body_state: IndexMap::new(),
            last_movement: None,
            last_transport: None,
            last_sleep: None,
            bot_movements: VecDeque::new(),
            frozen: false,
        }
    }

    /// Adds a place and gives it an (empty) adjacency list.
    pub fn add_place(&mut self, place: Place) {
        self.routes.entry(place.place_id.clone()).or_default();
        self.places.insert(place.place_id.clone(), place);
    }

    /// Links two places both ways. Idempotent.
    pub fn link(&mut self, a: &str, b: &str) {
        let forward = self.routes.entry(a.to_string()).or_default();
        if !forward.iter().any(|p| p == b) {
            forward.push(b.to_string());
        }
        let backward = self.routes.entry(b.to_string()).or_default();
        if !backward.iter().any(|p| p == a) {
            backward.push(a.to_string());
        }
    }

    /// Whether a place exists.
    #[must_use]
    pub fn has_place(&self, place_id: &str) -> bool {
        self.places.contains_key(place_id)
    }

    /// Ambient sensory signature of a place; empty when unknown.
    #[must_use]
    pub fn sensory_of(&self, place_id: &str) -> IndexMap<String, String> {
        self.places
            .get(place_id)
            .map(|place| place.sensory.clone())
            .unwrap_or_default()
    }

    /// Route between two places through at most one intermediate.
    /// Unconnected pairs fall back to a direct hop.
    #[must_use]
    pub fn route(&self, a: &str, b: &str) -> Vec<String> {
        if a == b {
            return vec![a.to_string()];
        }
        let neighbours = self.routes.get(a).map(Vec::as_slice).unwrap_or_default();
        if neighbours.iter().any(|p| p == b) {
            return vec![a.to_string(), b.to_string()];
        }
        for mid in neighbours {
            if self
                .routes
                .get(mid)
                .is_some_and(|next| next.iter().any(|p| p == b))
            {
                return vec![a.to_string(), mid.clone(), b.to_string()];
            }
        }
        vec![a.to_string(), b.to_string()]
    }

    /// Appends to the bounded objective timeline.
    pub fn record(&mut self, event: WorldEvent) {
        self.timeline.push_back(event);
        self.timeline_total += 1;
        while self.timeline.len() > TIMELINE_LIMIT {
            self.timeline.pop_front();
        }
    }

    /// Timeline entries appended after sequence number `since`, plus the new cursor.
    /// Entries already evicted from the bounded timeline are skipped.
    #[must_use]
    pub fn timeline_since(&self, since: u64) -> (Vec<&WorldEvent>, u64) {
        let first_seq = self.timeline_total - self.timeline.len() as u64;
        let skip = since.saturating_sub(first_seq);
        let entries = self
            .timeline
            .iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .collect();
        (entries, self.timeline_total)
    }

    /// Logs background bot movement, keeping the most recent entries.
    pub fn record_bot_movement(&mut self, movement: BotMovement) {
        self.bot_movements.push_back(movement);
        while self.bot_movements.len() > BOT_MOVEMENT_LIMIT {
            self.bot_movements.pop_front();
        }
    }

    /// Birth is a world event, not a mental one. Idempotent.
    pub fn register_birth(&mut self) {
        if self.birthed {
            return;
        }
        self.birthed = true;
        self.current_place = HOSPITAL.into();
        let entry = WorldEvent::new(self.time, self.day, HOSPITAL, "Birth", ["birth", "hospital"]);
        self.record(entry);
    }

    /// Physical movement without any validation.
    pub fn move_to(&mut self, place: &str, description: &str) {
        self.current_place = place.to_string();
        let description = if description.is_empty() {
            format!("Moved to {place}")
        } else {
            description.to_string()
        };
        let entry = WorldEvent::new(self.time, self.day, place, description, ["movement"]);
        self.record(entry);
    }

    /// Advances clock time, wrapping at 24h. The day counter belongs to
    /// the day cycle and the events it schedules, never to the clock.
    pub fn tick(&mut self, delta: f32) {
        self.time = (self.time + delta.max(0.0)) % HOURS_PER_DAY;
    }

    /// Freezes the world for sleep replay.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Releases the sleep-replay freeze.
    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    /// Whether sleep replay holds the world.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Errors when frozen.
    pub fn ensure_mutable(&self) -> Result<(), WorldError> {
        if self.frozen {
            Err(WorldError::Frozen)
        } else {
            Ok(())
        }
    }

    /// Observer-safe summary.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            day: self.day,
            time: (self.time * 100.0).round() / 100.0,
            place: self.current_place.clone(),
            room: self.current_room.clone(),
            birthed: self.birthed,
            event_count: self.timeline_total,
            frozen: self.frozen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{PlaceKind, HOME, PARK, STREET};

    fn small_world() -> WorldState {
        let mut world = WorldState::new(1);
        world.add_place(Place::new(HOME, "Home", PlaceKind::Home, (1, 1)));
        world.add_place(Place::new(STREET, "Street", PlaceKind::Street, (1, 0)));
        world.add_place(Place::new(PARK, "Park", PlaceKind::Park, (3, 1)));
        world.link(HOME, STREET);
        world.link(STREET, PARK);
        world
    }

    #[test]
    fn link_is_symmetric_and_idempotent() {
        let mut world = small_world();
        world.link(HOME, STREET);
        assert_eq!(world.routes[HOME], vec![STREET.to_string()]);
        assert!(world.routes[STREET].contains(&HOME.to_string()));
    }

    #[test]
    fn route_uses_one_intermediate() {
        let world = small_world();
        assert_eq!(world.route(HOME, HOME), vec![HOME]);
        assert_eq!(world.route(HOME, STREET), vec![HOME, STREET]);
        assert_eq!(world.route(HOME, PARK), vec![HOME, STREET, PARK]);
        assert_eq!(world.route(PARK, "moon"), vec![PARK, "moon"]);
    }

    #[test]
    fn tick_wraps_clock_but_keeps_day() {
        let mut world = WorldState::new(0);
        world.day = 3;
        world.tick(23.5);
        world.tick(1.0);
        world.tick(-4.0);
        assert_eq!(world.day, 3);
        assert!((world.time - 0.5).abs() < 1e-5);
    }

    #[test]
    fn birth_is_registered_once() {
        let mut world = small_world();
        world.register_birth();
        world.register_birth();
        assert!(world.birthed);
        assert_eq!(world.timeline_total, 1);
        assert_eq!(world.timeline[0].tags, vec!["birth", "hospital"]);
    }

    #[test]
    fn timeline_cursor_skips_seen_entries() {
        let mut world = small_world();
        world.move_to(STREET, "");
        let (first, cursor) = world.timeline_since(0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].description, "Moved to street_main");
        world.move_to(PARK, "stroll");
        let (second, cursor) = world.timeline_since(cursor);
        assert_eq!(second.len(), 1);
        assert_eq!(cursor, 2);
    }

    #[test]
    fn timeline_is_bounded() {
        let mut world = small_world();
        for _ in 0..(TIMELINE_LIMIT + 10) {
            world.move_to(PARK, "loop");
        }
        assert_eq!(world.timeline.len(), TIMELINE_LIMIT);
        let (entries, _) = world.timeline_since(5);
        assert_eq!(entries.len(), TIMELINE_LIMIT);
    }

    #[test]
    fn freeze_blocks_mutation() {
        let mut world = small_world();
        world.freeze();
        assert_eq!(world.ensure_mutable(), Err(WorldError::Frozen));
        world.thaw();
        assert!(world.ensure_mutable().is_ok());
        assert!(!world.snapshot().frozen);
    }
}
