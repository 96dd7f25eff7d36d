//! Fixed caregiver flow: a plain rotation of outings grounded in the sensory
//! signature of the places the world already has.

use cradle_world::{
    places::{BEDROOM, HOME, HOSPITAL, PARK, SHOPS, STREET},
    tick_bot_routines, EventKind, ExperienceEvent, Movement, WorldState, SELF_AGENT,
};

use crate::{
    schedule::BED,
    source::{reindex, ExperienceSource},
};

const ROTATION: [&str; 3] = [PARK, SHOPS, HOME];
/// Wake, return home and sleep wrap the activities.
const FIXED_EVENTS: usize = 3;

/// Caregiver flow generator.
#[derive(Debug, Clone, Copy)]
pub struct CaregiverFlow {
    events_per_day: usize,
}

impl Default for CaregiverFlow {
    fn default() -> Self {
        Self { events_per_day: 10 }
    }
}

impl CaregiverFlow {
    /// Creates a flow with `events_per_day` events on normal days.
    #[must_use]
    pub const fn new(events_per_day: usize) -> Self {
        Self { events_per_day }
    }

    fn birth_day() -> Vec<ExperienceEvent> {
        vec![
            ExperienceEvent::new(0, EventKind::Birth, HOSPITAL)
                .room("delivery_room")
                .actor("Nurse", "delivered")
                .object(SELF_AGENT)
                .presence(["Mum", "Dad", "Nurse"])
                .sense("vision", "bright lights")
                .sense("sound", "voices")
                .sense("touch", "handled")
                .effect("temperature", "cold")
                .note("Birth"),
            ExperienceEvent::new(0, EventKind::Care, HOSPITAL)
                .room("ward")
                .actor("Nurse", "checked")
                .object(SELF_AGENT)
                .presence(["Mum", "Dad", "Nurse"])
                .sense("touch", "wrapped")
                .sense("smell", "antiseptic")
                .effect("comfort", "rising")
                .note("Post-birth care"),
            ExperienceEvent::new(0, EventKind::Travel, HOSPITAL)
                .actor("Dad", "drove")
                .object(SELF_AGENT)
                .presence(["Mum", "Dad"])
                .movement(Movement::new(HOSPITAL, HOME).mode("car"))
                .sense("sound", "car noise")
                .sense("motion", "rocking")
                .note("Journey home from hospital"),
            first_sleep(0).effect("comfort", "high").note("First sleep at home"),
        ]
    }

    fn activity(world: &WorldState, day: u32, slot: usize) -> ExperienceEvent {
        let rotation = usize::try_from(day).unwrap_or_default().wrapping_add(slot);
        let place = ROTATION[rotation % ROTATION.len()];
        let kind = if place == HOME {
            EventKind::Care
        } else {
            EventKind::Outing
        };
        let mut event = ExperienceEvent::new(day, kind, place)
            .actor("Mum", "carried")
            .object(SELF_AGENT)
            .presence(["Mum"])
            .note(format!("Caregiver activity at {place}"));
        if place == HOME {
            event = event.room("living_room");
        }
        for (modality, value) in world.sensory_of(place) {
            event = event.sense(modality, value);
        }
        if place == PARK {
            event.presence.push("Lucy".into());
            event = event.pets(["Millie"]).spoken(["Lucy", "Millie"]);
        }
        event
    }
}

fn first_sleep(day: u32) -> ExperienceEvent {
    ExperienceEvent::new(day, EventKind::Sleep, BEDROOM)
        .room(BED)
        .actor("Mum", "settled")
        .object(SELF_AGENT)
        .presence(["Mum", "Dad"])
        .sense("sound", "quiet")
        .sense("touch", "blanket")
        .duration(8.0)
}

impl ExperienceSource for CaregiverFlow {
    fn name(&self) -> &'static str {
        "caregiver"
    }

    fn build_day(&mut self, world: &mut WorldState, day: u32) -> Vec<ExperienceEvent> {
        if day == 0 {
            let mut events = Self::birth_day();
            reindex(&mut events, 0);
            return events;
        }

        tick_bot_routines(world, day);

        let mut events = vec![ExperienceEvent::new(day, EventKind::Wake, BEDROOM)
            .room(BED)
            .actor("Mum", "woke")
            .object(SELF_AGENT)
            .presence(["Mum", "Dad"])
            .sense("sound", "morning voices")
            .note("Wake")];
        let activities = self.events_per_day.saturating_sub(FIXED_EVENTS);
        events.extend((0..activities).map(|slot| Self::activity(world, day, slot)));
        events.push(
            ExperienceEvent::new(day, EventKind::Travel, STREET)
                .actor("Mum", "carried")
                .object(SELF_AGENT)
                .presence(["Mum"])
                .movement(Movement::new(STREET, HOME).mode("walked"))
                .sense("sound", "traffic")
                .note("Return home"),
        );
        events.push(first_sleep(day).note("Sleep"));
        reindex(&mut events, day);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::{check, generate_world};

    #[test]
    fn birth_day_has_four_events() {
        let mut world = generate_world(5);
        let mut flow = CaregiverFlow::default();
        let day = flow.build_day(&mut world, 0);
        let kinds: Vec<_> = day.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Birth, EventKind::Care, EventKind::Travel, EventKind::Sleep]
        );
        assert_eq!(day[2].destination(), HOME);
    }

    #[test]
    fn later_days_rotate_places_and_stay_coherent() {
        let mut world = generate_world(5);
        let mut flow = CaregiverFlow::new(10);
        let day = flow.build_day(&mut world, 1);
        assert_eq!(day.len(), 10);
        assert_eq!(day[0].kind, EventKind::Wake);
        assert_eq!(day[1].place_id, SHOPS);
        assert_eq!(day[2].place_id, HOME);
        assert_eq!(day[3].place_id, PARK);
        assert_eq!(day[3].pets, vec!["Millie"]);
        assert!(day[3].sensory.contains_key("smell"));
        assert_eq!(day[8].destination(), HOME);
        assert_eq!(day[9].kind, EventKind::Sleep);
        assert!(day.iter().all(|e| check(&world, e).is_clean()));
    }

    #[test]
    fn tiny_days_still_wake_and_sleep() {
        let mut world = generate_world(5);
        let day = CaregiverFlow::new(1).build_day(&mut world, 2);
        assert_eq!(day.len(), 3);
    }
}
