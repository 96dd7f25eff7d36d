//! Observer-side reconciliation: applies the physical consequences of an
//! experience to the objective world. Never touches cognition.

use serde::{Deserialize, Serialize};

use crate::{
    events::{EventKind, ExperienceEvent, WorldEvent},
    model::{MovementRecord, SleepRecord, TransportRecord, WorldError, WorldState, HOURS_PER_DAY},
};

/// Tag marking timeline entries written for an applied experience.
pub const EXPERIENCE_TAG: &str = "experience";

/// Per-value contribution of an observer tag to the raw body state.
const TAG_WEIGHT: f32 = 0.1;

/// What an application changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedEvent {
    /// Whether the infant changed place.
    pub moved: bool,
    /// Bots relocated next to the infant.
    pub bots_updated: usize,
}

/// Applies one event to the world. Must be called exactly once per event.
pub fn apply_event(world: &mut WorldState, event: &ExperienceEvent) -> Result<AppliedEvent, WorldError> {
    world.ensure_mutable()?;
    let destination = event.destination().to_string();
    if !world.has_place(&destination) {
        return Err(WorldError::UnknownPlace(destination));
    }
    let mut applied = AppliedEvent::default();

    // The event's day is authoritative; clock time wraps without rolling the day.
    world.day = event.day;
    world.current_event_index = Some(event.index);
    world.time = (world.time + event.duration.max(0.0)) % HOURS_PER_DAY;

    if destination != world.current_place {
        applied.moved = true;
        world.current_place = destination;
    }
    if let Some(room) = &event.room {
        world.current_room = Some(room.clone());
    } else if applied.moved {
        world.current_room = None;
    }

    if let Some(movement) = &event.movement {
        world.last_movement = Some(MovementRecord {
            from: movement.from.clone(),
            to: movement.to.clone(),
            mode: movement.mode.clone(),
            day: event.day,
            event: event.index,
        });
        if let Some(posture) = &movement.posture {
            world.posture = Some(posture.clone());
        }
        if let Some(mode) = &movement.mode {
            world.last_transport = Some(TransportRecord {
                mode: mode.clone(),
                from: movement.from.clone(),
                to: movement.to.clone(),
                day: event.day,
            });
        }
    }

    for person in &event.presence {
        if let Some(bot) = world.bots.get_mut(person) {
            bot.location = world.current_place.clone();
            bot.last_seen_day = Some(event.day);
            bot.last_seen_event = Some(event.index);
            applied.bots_updated += 1;
        }
    }

    world.event_history.push(event.kind);

    for (tag, values) in &event.tags {
        #[allow(clippy::cast_precision_loss)]
        let contribution = TAG_WEIGHT * values.len() as f32;
        *world.body_state.entry(tag.clone()).or_insert(0.0) += contribution;
    }

    if event.kind == EventKind::Sleep {
        world.last_sleep = Some(SleepRecord {
            place: world.current_place.clone(),
            day: event.day,
        });
    }

    let description = if event.note.is_empty() {
        event.summary()
    } else {
        event.note.clone()
    };
    let mut entry = WorldEvent::new(
        world.time,
        event.day,
        world.current_place.clone(),
        description,
        [EXPERIENCE_TAG, event.kind.label()],
    );
    entry.sensory = event.sensory.clone();
    world.record(entry);

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::Movement,
        generator::generate_world,
        places::{BEDROOM, HOME, HOSPITAL},
    };

    #[test]
    fn applies_location_bots_and_history() {
        let mut world = generate_world(7);
        let event = ExperienceEvent::new(0, EventKind::Travel, HOSPITAL)
            .movement(Movement::new(HOSPITAL, HOME).mode("car"))
            .presence(["Mum", "Dad", "Nobody"])
            .duration(1.5)
            .note("Journey home");
        let applied = apply_event(&mut world, &event).unwrap();
        assert!(applied.moved);
        assert_eq!(applied.bots_updated, 2);
        assert_eq!(world.current_place, HOME);
        assert_eq!(world.bots["Dad"].last_seen_day, Some(0));
        assert_eq!(world.last_transport.as_ref().unwrap().mode, "car");
        assert_eq!(world.event_history, vec![EventKind::Travel]);
        assert!((world.time - 1.5).abs() < 1e-6);
        let entry = world.timeline.back().unwrap();
        assert_eq!(entry.description, "Journey home");
        assert_eq!(entry.tags, vec![EXPERIENCE_TAG, "travel"]);
    }

    #[test]
    fn tags_accumulate_into_body_state() {
        let mut world = generate_world(7);
        let event = ExperienceEvent::new(1, EventKind::Play, HOME)
            .tag("affect", "joy")
            .tag("affect", "calm")
            .tag("colour", "red");
        apply_event(&mut world, &event).unwrap();
        apply_event(&mut world, &event).unwrap();
        assert!((world.body_state["affect"] - 0.4).abs() < 1e-6);
        assert!((world.body_state["colour"] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn sleep_event_records_last_sleep() {
        let mut world = generate_world(7);
        let event = ExperienceEvent::new(3, EventKind::Sleep, BEDROOM).room("bed");
        apply_event(&mut world, &event).unwrap();
        assert_eq!(
            world.last_sleep,
            Some(SleepRecord {
                place: BEDROOM.into(),
                day: 3
            })
        );
        assert_eq!(world.current_room.as_deref(), Some("bed"));
    }

    #[test]
    fn frozen_world_rejects_events() {
        let mut world = generate_world(7);
        world.freeze();
        let event = ExperienceEvent::new(1, EventKind::Care, HOME);
        assert_eq!(apply_event(&mut world, &event), Err(WorldError::Frozen));
        assert!(world.event_history.is_empty());
    }

    #[test]
    fn unknown_destination_leaves_world_untouched() {
        let mut world = generate_world(7);
        let before = world.current_place.clone();
        let event = ExperienceEvent::new(1, EventKind::Travel, "moon")
            .movement(Movement::new("moon", "mars"));
        assert_eq!(
            apply_event(&mut world, &event),
            Err(WorldError::UnknownPlace("mars".into()))
        );
        assert_eq!(world.current_place, before);
        assert!(world.event_history.is_empty());
        assert_eq!(world.current_event_index, None);
    }

    #[test]
    fn clock_wraps_without_changing_event_day() {
        let mut world = generate_world(7);
        world.time = 23.5;
        let event = ExperienceEvent::new(4, EventKind::Care, HOME).duration(1.0);
        apply_event(&mut world, &event).unwrap();
        assert_eq!(world.day, 4);
        assert!((world.time - 0.5).abs() < 1e-5);
    }
}
