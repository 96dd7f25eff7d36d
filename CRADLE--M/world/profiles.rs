use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A person the observer allows to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonProfile {
    /// Name, also used as agent id in events.
    pub name: String,
    /// Role: mum, dad, sister, nurse, neighbour...
    pub role: String,
    /// Age in years.
    pub age: u32,
    /// Hair colour.
    #[serde(default)]
    pub hair: String,
    /// Eye colour.
    #[serde(default)]
    pub eyes: String,
    /// Distinguishing features.
    #[serde(default)]
    pub features: Vec<String>,
}

impl PersonProfile {
    /// Creates a profile with blank appearance.
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            age,
            hair: String::new(),
            eyes: String::new(),
            features: Vec::new(),
        }
    }

    /// Sets hair and eye colour.
    #[must_use]
    pub fn looks(mut self, hair: impl Into<String>, eyes: impl Into<String>) -> Self {
        self.hair = hair.into();
        self.eyes = eyes.into();
        self
    }
}

/// An animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalProfile {
    /// Name.
    pub name: String,
    /// Species.
    pub species: String,
    /// Temperament.
    #[serde(default = "default_temperament")]
    pub temperament: String,
    /// Sounds it makes.
    #[serde(default)]
    pub sounds: Vec<String>,
}

fn default_temperament() -> String {
    "calm".into()
}

/// An object that may appear in events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectProfile {
    /// Name.
    pub name: String,
    /// Category: toy, tool, container, furniture.
    pub category: String,
    /// Colour.
    #[serde(default)]
    pub colour: Option<String>,
    /// Shape.
    #[serde(default)]
    pub shape: Option<String>,
    /// What it can be used for.
    #[serde(default)]
    pub affordances: Vec<String>,
    /// Object this one usually contains.
    #[serde(default)]
    pub container_of: Option<String>,
}

impl ObjectProfile {
    /// Creates an object of a category.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            colour: None,
            shape: None,
            affordances: Vec::new(),
            container_of: None,
        }
    }
}

/// Household behind a neighbour door.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeighbourFamily {
    /// Door (place id).
    pub door: String,
    /// Mother, if any.
    #[serde(default)]
    pub mum: Option<String>,
    /// Father, if any.
    #[serde(default)]
    pub dad: Option<String>,
    /// Stepfather, if any.
    #[serde(default)]
    pub stepdad: Option<String>,
    /// Children.
    #[serde(default)]
    pub children: Vec<String>,
}

impl NeighbourFamily {
    /// First adult who could come and speak.
    #[must_use]
    pub fn speaker(&self) -> Option<&str> {
        self.mum
            .as_deref()
            .or(self.dad.as_deref())
            .or(self.stepdad.as_deref())
    }
}

/// Recorded social exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interaction {
    /// Counterpart.
    pub agent: String,
    /// Outcome label.
    pub outcome: String,
    /// Day it happened.
    pub day: u32,
}

/// Observer-defined entities: the allowed reality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldProfiles {
    /// People by name.
    pub people: IndexMap<String, PersonProfile>,
    /// Animals by name.
    pub animals: IndexMap<String, AnimalProfile>,
    /// Objects by name.
    pub objects: IndexMap<String, ObjectProfile>,
    /// Neighbour households by door.
    pub neighbour_families: IndexMap<String, NeighbourFamily>,
    /// Background facts the parents know, used only for planning.
    pub parent_knowledge: IndexMap<String, Vec<String>>,
    /// Most recent exchange per agent.
    pub interactions: IndexMap<String, Interaction>,
}

impl WorldProfiles {
    /// Adds or replaces a person.
    pub fn add_person(&mut self, person: PersonProfile) {
        self.people.insert(person.name.clone(), person);
    }

    /// Adds or replaces an animal.
    pub fn add_animal(&mut self, animal: AnimalProfile) {
        self.animals.insert(animal.name.clone(), animal);
    }

    /// Adds or replaces an object.
    pub fn add_object(&mut self, object: ObjectProfile) {
        self.objects.insert(object.name.clone(), object);
    }

    /// True when both a mum and a dad role exist.
    #[must_use]
    pub fn has_parents(&self) -> bool {
        let has_role = |role: &str| {
            self.people
                .values()
                .any(|person| person.role.eq_ignore_ascii_case(role))
        };
        has_role("mum") && has_role("dad")
    }

    /// Whether `name` is a known person or animal.
    #[must_use]
    pub fn knows_agent(&self, name: &str) -> bool {
        self.people.contains_key(name) || self.animals.contains_key(name)
    }

    /// Whether `name` is a known object, animal or person.
    #[must_use]
    pub fn knows_object(&self, name: &str) -> bool {
        self.objects.contains_key(name) || self.knows_agent(name)
    }

    /// Records the latest exchange with `agent`.
    pub fn record_interaction(&mut self, agent: &str, outcome: &str, day: u32) {
        self.interactions.insert(
            agent.to_string(),
            Interaction {
                agent: agent.to_string(),
                outcome: outcome.to_string(),
                day,
            },
        );
    }

    /// Observer summary.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "people": self.people.values().map(|p| format!("{} ({})", p.name, p.role)).collect::<Vec<_>>(),
            "animals": self.animals.values().map(|a| format!("{} ({})", a.name, a.species)).collect::<Vec<_>>(),
            "objects": self.objects.values().map(|o| format!("{} ({})", o.name, o.category)).collect::<Vec<_>>(),
            "neighbour_doors": self.neighbour_families.keys().collect::<Vec<_>>(),
            "parent_knowledge_keys": self.parent_knowledge.keys().collect::<Vec<_>>(),
        })
    }
}

/// Observer-side state of a person living in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotState {
    /// Name, matching a person profile.
    pub name: String,
    /// Home place id.
    pub home_place: String,
    /// Coarse activity label.
    pub state: String,
    /// Current place id.
    pub location: String,
    /// Last day seen alongside the infant.
    #[serde(default)]
    pub last_seen_day: Option<u32>,
    /// Last event index seen alongside the infant.
    #[serde(default)]
    pub last_seen_event: Option<usize>,
}

impl BotState {
    /// Creates a bot at home.
    #[must_use]
    pub fn at_home(name: impl Into<String>, home_place: impl Into<String>) -> Self {
        let home_place = home_place.into();
        Self {
            name: name.into(),
            location: home_place.clone(),
            home_place,
            state: "at_home".into(),
            last_seen_day: None,
            last_seen_event: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_require_both_roles() {
        let mut profiles = WorldProfiles::default();
        profiles.add_person(PersonProfile::new("Mum", "mum", 32));
        assert!(!profiles.has_parents());
        profiles.add_person(PersonProfile::new("Dad", "Dad", 34));
        assert!(profiles.has_parents());
    }

    #[test]
    fn objects_include_agents() {
        let mut profiles = WorldProfiles::default();
        profiles.add_animal(AnimalProfile {
            name: "Millie".into(),
            species: "dog".into(),
            temperament: "playful".into(),
            sounds: vec!["woof".into()],
        });
        profiles.add_object(ObjectProfile::new("ball", "toy"));
        assert!(profiles.knows_object("Millie"));
        assert!(profiles.knows_object("ball"));
        assert!(!profiles.knows_agent("ball"));
    }

    #[test]
    fn neighbour_speaker_falls_back() {
        let family = NeighbourFamily {
            door: "house_3".into(),
            stepdad: Some("Gary".into()),
            ..NeighbourFamily::default()
        };
        assert_eq!(family.speaker(), Some("Gary"));
    }
}
