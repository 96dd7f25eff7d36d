use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Hospital where day 0 starts.
pub const HOSPITAL: &str = "hospital";
/// Street every other place hangs off.
pub const STREET: &str = "street_main";
/// Public park.
pub const PARK: &str = "park";
/// Local shops.
pub const SHOPS: &str = "shops";
/// Doctors' surgery.
pub const DOCTORS: &str = "doctors";
/// Family home.
pub const HOME: &str = "house_home";
/// Nursery where every day ends.
pub const BEDROOM: &str = "bedroom_home";

/// Category of a place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    /// Hospital.
    Hospital,
    /// Park.
    Park,
    /// Shops.
    Shops,
    /// Doctors.
    Doctors,
    /// Street.
    Street,
    /// House.
    Home,
    /// Single room modelled as its own place.
    Room,
}

impl PlaceKind {
    /// Two-character map glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Hospital => " H",
            Self::Park => " P",
            Self::Shops => " S",
            Self::Doctors => " D",
            Self::Street => " =",
            Self::Home => " O",
            Self::Room => " R",
        }
    }
}

/// Room inside a place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Display name.
    pub name: String,
    /// Width and depth in metres.
    pub size: (u32, u32),
    /// Wall colour.
    pub colour: String,
    /// Feature -> material/description.
    #[serde(default)]
    pub features: IndexMap<String, String>,
}

impl Room {
    /// Creates a room.
    #[must_use]
    pub fn new(name: impl Into<String>, size: (u32, u32), colour: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            colour: colour.into(),
            features: IndexMap::new(),
        }
    }

    /// Adds a feature.
    #[must_use]
    pub fn feature(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }
}

/// A place in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Stable id.
    pub place_id: String,
    /// Display label.
    pub label: String,
    /// Category.
    pub kind: PlaceKind,
    /// Grid position for the observer map.
    pub pos: (i32, i32),
    /// Rooms keyed by id; empty for open places.
    #[serde(default)]
    pub rooms: IndexMap<String, Room>,
    /// Ambient sensory signature: modality -> value.
    #[serde(default)]
    pub sensory: IndexMap<String, String>,
}

impl Place {
    /// Creates a place without rooms or sensory signature.
    #[must_use]
    pub fn new(
        place_id: impl Into<String>,
        label: impl Into<String>,
        kind: PlaceKind,
        pos: (i32, i32),
    ) -> Self {
        Self {
            place_id: place_id.into(),
            label: label.into(),
            kind,
            pos,
            rooms: IndexMap::new(),
            sensory: IndexMap::new(),
        }
    }

    /// Adds a sensory signature entry.
    #[must_use]
    pub fn sense(mut self, modality: impl Into<String>, value: impl Into<String>) -> Self {
        self.sensory.insert(modality.into(), value.into());
        self
    }

    /// Adds a room.
    #[must_use]
    pub fn room(mut self, id: impl Into<String>, room: Room) -> Self {
        self.rooms.insert(id.into(), room);
        self
    }

    /// Whether `room` is a known room of this place.
    #[must_use]
    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }
}

/// How the infant is moved between places.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// In someone's arms.
    Carried,
    /// Car seat.
    Car,
    /// Held while someone walks.
    Walked,
    /// Pushchair.
    Buggy,
    /// Public bus.
    Bus,
}

impl TransitionMode {
    /// Parses a mode label.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "carried" | "carry" => Some(Self::Carried),
            "car" => Some(Self::Car),
            "walked" | "walk" => Some(Self::Walked),
            "buggy" => Some(Self::Buggy),
            "bus" => Some(Self::Bus),
            _ => None,
        }
    }

    /// Label used in tags and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Carried => "carried",
            Self::Car => "car",
            Self::Walked => "walked",
            Self::Buggy => "buggy",
            Self::Bus => "bus",
        }
    }

    /// Motion intensity fed into sensory tags (0..1).
    #[must_use]
    pub const fn motion_level(self) -> f32 {
        match self {
            Self::Carried => 0.4,
            Self::Buggy => 0.5,
            Self::Walked => 0.6,
            Self::Bus => 0.7,
            Self::Car => 0.8,
        }
    }

    /// Coarse motion sensation for the level.
    #[must_use]
    pub fn motion_sensation(self) -> &'static str {
        let level = self.motion_level();
        if level >= 0.7 {
            "strong motion"
        } else if level >= 0.5 {
            "rocking"
        } else {
            "gentle sway"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_round_trip_labels() {
        for mode in [
            TransitionMode::Carried,
            TransitionMode::Car,
            TransitionMode::Walked,
            TransitionMode::Buggy,
            TransitionMode::Bus,
        ] {
            assert_eq!(TransitionMode::parse(mode.label()), Some(mode));
        }
        assert_eq!(TransitionMode::Car.motion_sensation(), "strong motion");
        assert_eq!(TransitionMode::Carried.motion_sensation(), "gentle sway");
    }

    #[test]
    fn place_rooms_are_queryable() {
        let place = Place::new(HOME, "Home", PlaceKind::Home, (1, 1))
            .room("kitchen", Room::new("Kitchen", (4, 3), "cream").feature("sink", "metal"));
        assert!(place.has_room("kitchen"));
        assert!(!place.has_room("attic"));
    }
}
