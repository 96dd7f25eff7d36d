use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    model::{BotMovement, WorldState},
    places::{Place, PlaceKind, Room, BEDROOM, DOCTORS, HOME, HOSPITAL, PARK, SHOPS, STREET},
    profiles::{AnimalProfile, BotState, NeighbourFamily, ObjectProfile, PersonProfile},
};

/// Number of neighbour houses along the street.
pub const NEIGHBOUR_HOUSES: usize = 10;

const WALL_COLOURS: [&str; 4] = ["cream", "light blue", "soft green", "warm white"];
const ADULT_NAMES: [&str; 12] = [
    "Anna", "Ben", "Chloe", "Dev", "Ellie", "Farid", "Grace", "Harry", "Isla", "Jonah", "Kemi",
    "Liam",
];
const CHILD_NAMES: [&str; 8] = ["Ava", "Noah", "Mia", "Leo", "Ruby", "Oscar", "Zara", "Theo"];
const PUBLIC_PLACES: [&str; 3] = [PARK, SHOPS, DOCTORS];

/// Door of the `n`th neighbour house (1-based).
#[must_use]
pub fn neighbour_door(n: usize) -> String {
    format!("house_{n}")
}

/// Builds the default world for a seed. Same seed, same world.
#[must_use]
pub fn generate_world(seed: u64) -> WorldState {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut world = WorldState::new(seed);

    world.add_place(
        Place::new(HOSPITAL, "City Hospital", PlaceKind::Hospital, (0, 0))
            .sense("smell", "antiseptic")
            .sense("sound", "voices")
            .sense("vision", "bright lights")
            .room("ward", Room::new("Maternity Ward", (8, 6), "white"))
            .room("delivery_room", Room::new("Delivery Room", (5, 5), "pale green")),
    );
    world.add_place(
        Place::new(PARK, "Central Park", PlaceKind::Park, (3, 1))
            .sense("smell", "grass")
            .sense("sound", "birds")
            .sense("vision", "open sky"),
    );
    world.add_place(
        Place::new(SHOPS, "Local Shops", PlaceKind::Shops, (2, -1))
            .sense("smell", "food")
            .sense("sound", "chatter")
            .sense("vision", "colourful shelves"),
    );
    world.add_place(
        Place::new(DOCTORS, "Doctors' Surgery", PlaceKind::Doctors, (0, -1))
            .sense("smell", "disinfectant")
            .sense("sound", "indoor hum"),
    );
    world.add_place(
        Place::new(STREET, "Main Street", PlaceKind::Street, (1, 0))
            .sense("sound", "traffic")
            .sense("vision", "houses"),
    );
    world.add_place(home_place(&mut rng));
    world.add_place(
        Place::new(BEDROOM, "Nursery", PlaceKind::Room, (1, 2))
            .sense("sound", "muffled")
            .sense("smell", "bedding")
            .room("bed", Room::new("Cot", (1, 1), "white").feature("mattress", "soft")),
    );

    for place in [PARK, SHOPS, DOCTORS, HOME] {
        world.link(STREET, place);
    }
    world.link(HOSPITAL, STREET);
    world.link(HOME, BEDROOM);

    for n in 1..=NEIGHBOUR_HOUSES {
        let door = neighbour_door(n);
        let x = 1 + i32::try_from(n).unwrap_or(i32::MAX);
        world.add_place(
            Place::new(&door, format!("House {n}"), PlaceKind::Home, (x, 1))
                .sense("sound", "neighbour noise")
                .sense("vision", "front door"),
        );
        world.link(STREET, &door);
        let family = neighbour_family(&mut rng, &door);
        world.profiles.neighbour_families.insert(door, family);
    }

    seed_profiles(&mut world);
    world
}

fn home_place(rng: &mut SmallRng) -> Place {
    let mut colour = || pick(rng, &WALL_COLOURS);
    Place::new(HOME, "Home", PlaceKind::Home, (1, 1))
        .sense("sound", "home quiet")
        .sense("smell", "clean fabric")
        .room(
            "living_room",
            Room::new("Living Room", (5, 4), colour())
                .feature("sofa", "fabric")
                .feature("table", "wood")
                .feature("window", "large"),
        )
        .room(
            "kitchen",
            Room::new("Kitchen", (4, 3), colour())
                .feature("sink", "metal")
                .feature("cupboard", "wood")
                .feature("floor", "tile"),
        )
        .room(
            "bathroom",
            Room::new("Bathroom", (3, 2), "white")
                .feature("bath", "ceramic")
                .feature("floor", "tile"),
        )
        .room(
            "bedroom",
            Room::new("Nursery", (3, 3), colour())
                .feature("bed", "soft")
                .feature("window", "curtains")
                .feature("floor", "carpet"),
        )
        .room("hall", Room::new("Hall", (2, 4), colour()))
}

fn pick(rng: &mut SmallRng, names: &[&str]) -> String {
    names.choose(rng).copied().unwrap_or_default().to_string()
}

fn neighbour_family(rng: &mut SmallRng, door: &str) -> NeighbourFamily {
    let mut family = NeighbourFamily {
        door: door.to_string(),
        ..NeighbourFamily::default()
    };
    let shape: u8 = rng.gen_range(0..4);
    match shape {
        0 => {
            family.mum = Some(pick(rng, &ADULT_NAMES));
            family.dad = Some(pick(rng, &ADULT_NAMES));
        }
        1 => family.mum = Some(pick(rng, &ADULT_NAMES)),
        2 => family.dad = Some(pick(rng, &ADULT_NAMES)),
        _ => {
            family.mum = Some(pick(rng, &ADULT_NAMES));
            family.stepdad = Some(pick(rng, &ADULT_NAMES));
        }
    }
    let children = rng.gen_range(0..3);
    family.children = (0..children).map(|_| pick(rng, &CHILD_NAMES)).collect();
    family
}

fn seed_profiles(world: &mut WorldState) {
    let profiles = &mut world.profiles;
    profiles.add_person(PersonProfile::new("Mum", "mum", 31).looks("brown", "green"));
    profiles.add_person(PersonProfile::new("Dad", "dad", 33).looks("black", "brown"));
    profiles.add_person(PersonProfile::new("Sister", "sister", 6).looks("brown", "brown"));
    profiles.add_person(PersonProfile::new("Nurse", "nurse", 45));
    profiles.add_person(PersonProfile::new("Lucy", "neighbour", 29).looks("blonde", "blue"));
    profiles.add_animal(AnimalProfile {
        name: "Millie".into(),
        species: "dog".into(),
        temperament: "playful".into(),
        sounds: vec!["woof".into()],
    });
    for (name, category) in [("blanket", "bedding"), ("bottle", "feeding"), ("rattle", "toy")] {
        profiles.add_object(ObjectProfile::new(name, category));
    }
    profiles
        .parent_knowledge
        .insert("feeding".into(), vec!["every two hours".into()]);

    for name in ["Mum", "Dad", "Sister"] {
        world.bots.insert(name.into(), BotState::at_home(name, HOME));
    }
    let lucy_home = neighbour_door(7);
    world
        .bots
        .insert("Lucy".into(), BotState::at_home("Lucy", lucy_home));
}

/// Moves background bots between home and public places for a day.
/// Observer-only; the infant never perceives this directly.
pub fn tick_bot_routines(world: &mut WorldState, day: u32) {
    let mut rng = SmallRng::seed_from_u64(world.seed.wrapping_mul(31).wrapping_add(u64::from(day)));
    let mut moves = Vec::new();
    for bot in world.bots.values_mut() {
        let target = if rng.gen_bool(0.5) {
            bot.home_place.clone()
        } else {
            (*PUBLIC_PLACES.choose(&mut rng).unwrap_or(&PARK)).to_string()
        };
        if target != bot.location {
            moves.push(BotMovement {
                bot: bot.name.clone(),
                from: bot.location.clone(),
                to: target.clone(),
                day,
            });
            bot.state = if target == bot.home_place {
                "at_home".into()
            } else {
                "out".into()
            };
            bot.location = target;
        }
    }
    for movement in moves {
        world.record_bot_movement(movement);
    }
}
