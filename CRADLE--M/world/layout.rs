use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    model::WorldState,
    places::{Place, PlaceKind, Room},
    profiles::{AnimalProfile, BotState, ObjectProfile, PersonProfile},
};

/// Observer-authored additions to a generated world, loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldLayoutDocument {
    /// Schema version (informational).
    #[serde(default)]
    pub version: u32,
    /// Extra places.
    #[serde(default)]
    pub places: Vec<PlaceSpec>,
    /// Extra links between places.
    #[serde(default)]
    pub links: Vec<[String; 2]>,
    /// Extra people.
    #[serde(default)]
    pub people: Vec<PersonSpec>,
    /// Extra animals.
    #[serde(default)]
    pub animals: Vec<AnimalProfile>,
    /// Extra objects.
    #[serde(default)]
    pub objects: Vec<ObjectProfile>,
}

/// Place declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSpec {
    /// Place id.
    pub id: String,
    /// Display label; defaults to the id.
    #[serde(default)]
    pub label: Option<String>,
    /// Category.
    pub kind: PlaceKind,
    /// Map position.
    #[serde(default)]
    pub pos: (i32, i32),
    /// Room ids.
    #[serde(default)]
    pub rooms: Vec<String>,
    /// Sensory signature.
    #[serde(default)]
    pub sensory: IndexMap<String, String>,
    /// Places to link to.
    #[serde(default)]
    pub links: Vec<String>,
}

/// Person declaration; `home` also spawns a bot living there.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonSpec {
    /// Name.
    pub name: String,
    /// Role.
    pub role: String,
    /// Age.
    #[serde(default)]
    pub age: u32,
    /// Home place id.
    #[serde(default)]
    pub home: Option<String>,
}

impl WorldLayoutDocument {
    /// Loads and parses a layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading world layout {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses a layout from TOML text.
    pub fn parse(raw: &str) -> Result<Self> {
        let document: Self = toml::from_str(raw)?;
        for place in &document.places {
            if place.id.trim().is_empty() {
                bail!("place with empty id");
            }
        }
        Ok(document)
    }

    /// Applies the layout. Links must reference places that exist after
    /// this layout's places are added.
    pub fn apply(&self, world: &mut WorldState) -> Result<()> {
        for spec in &self.places {
            let mut place = Place::new(
                &spec.id,
                spec.label.clone().unwrap_or_else(|| spec.id.clone()),
                spec.kind,
                spec.pos,
            );
            for room in &spec.rooms {
                place = place.room(room, Room::new(room, (3, 3), "white"));
            }
            place.sensory.clone_from(&spec.sensory);
            world.add_place(place);
        }

        let declared = self
            .places
            .iter()
            .flat_map(|spec| spec.links.iter().map(move |to| [spec.id.clone(), to.clone()]));
        for [a, b] in declared.chain(self.links.iter().cloned()) {
            for end in [&a, &b] {
                if !world.has_place(end) {
                    bail!("layout link {a} <-> {b} references unknown place {end}");
                }
            }
            world.link(&a, &b);
        }

        for spec in &self.people {
            world
                .profiles
                .add_person(PersonProfile::new(&spec.name, &spec.role, spec.age));
            if let Some(home) = &spec.home {
                if !world.has_place(home) {
                    bail!("person {} lives at unknown place {home}", spec.name);
                }
                world
                    .bots
                    .insert(spec.name.clone(), BotState::at_home(&spec.name, home));
            }
        }
        for animal in &self.animals {
            world.profiles.add_animal(animal.clone());
        }
        for object in &self.objects {
            world.profiles.add_object(object.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generator::generate_world, places::STREET};
    use tempfile::tempdir;

    const LAYOUT: &str = r#"
version = 1

[[places]]
id = "library"
label = "Town Library"
kind = "shops"
pos = [4, -1]
rooms = ["reading_room"]
sensory = { sound = "hush", smell = "paper" }
links = ["street_main"]

[[people]]
name = "Grandma"
role = "grandma"
age = 70
home = "house_2"

[[objects]]
name = "ball"
category = "toy"
colour = "red"
affordances = ["roll", "throw"]
"#;

    #[test]
    fn layout_extends_generated_world() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        fs::write(&path, LAYOUT).unwrap();
        let layout = WorldLayoutDocument::load(&path).unwrap();
        let mut world = generate_world(7);
        layout.apply(&mut world).unwrap();
        assert!(world.places["library"].has_room("reading_room"));
        assert!(world.routes[STREET].contains(&"library".to_string()));
        assert!(world.profiles.knows_agent("Grandma"));
        assert_eq!(world.bots["Grandma"].location, "house_2");
        assert_eq!(world.profiles.objects["ball"].colour.as_deref(), Some("red"));
    }

    #[test]
    fn link_to_unknown_place_fails() {
        let layout = WorldLayoutDocument::parse("links = [[\"street_main\", \"atlantis\"]]").unwrap();
        let mut world = generate_world(7);
        let err = layout.apply(&mut world).unwrap_err();
        assert!(err.to_string().contains("atlantis"));
    }
}
