#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Cradle World – the objective environment the infant lives in: places,
//! people, experience events, and the observer-side rules that apply them.

/// Experience and timeline event records.
#[path = "../events.rs"]
pub mod events;

/// Places, rooms and transition modes.
#[path = "../places.rs"]
pub mod places;

/// People, animals, objects and background bots.
#[path = "../profiles.rs"]
pub mod profiles;

/// Core world state.
#[path = "../model.rs"]
pub mod model;

/// Seeded default world.
#[path = "../generator.rs"]
pub mod generator;

/// Observer ASCII map.
#[path = "../map.rs"]
pub mod map;

/// Event coherence checks against the world.
#[path = "../coherence.rs"]
pub mod coherence;

/// Applies accepted experiences to the world.
#[path = "../applier.rs"]
pub mod applier;

/// Objective place-to-place transitions.
#[path = "../transition.rs"]
pub mod transition;

/// TOML world layout extensions.
#[path = "../layout.rs"]
pub mod layout;

pub use applier::{apply_event, AppliedEvent, EXPERIENCE_TAG};
pub use coherence::{check, CoherenceIssue, CoherenceReport};
pub use events::{
    EventKind, ExperienceEvent, Movement, Transaction, WorldEvent, ENVIRONMENT_AGENT, SELF_AGENT,
};
pub use generator::{generate_world, neighbour_door, tick_bot_routines, NEIGHBOUR_HOUSES};
pub use layout::WorldLayoutDocument;
pub use map::{ascii_map, CageBounds};
pub use model::{WorldError, WorldSnapshot, WorldState, HOURS_PER_DAY};
pub use places::{Place, PlaceKind, Room, TransitionMode};
pub use profiles::{
    AnimalProfile, BotState, Interaction, NeighbourFamily, ObjectProfile, PersonProfile,
    WorldProfiles,
};
pub use transition::apply_transition;
