use crate::{
    events::WorldEvent,
    model::{TransportRecord, WorldError, WorldState},
    places::TransitionMode,
};

/// Objective movement of the infant to a known place. This is movement, not perception.
pub fn apply_transition(
    world: &mut WorldState,
    to_place: &str,
    mode: TransitionMode,
    description: &str,
) -> Result<(), WorldError> {
    world.ensure_mutable()?;
    if !world.has_place(to_place) {
        return Err(WorldError::UnknownPlace(to_place.to_string()));
    }
    let from = std::mem::replace(&mut world.current_place, to_place.to_string());
    world.current_room = None;
    world.last_transport = Some(TransportRecord {
        mode: mode.label().into(),
        from,
        to: to_place.to_string(),
        day: world.day,
    });
    let description = if description.is_empty() {
        format!("Transitioned to {to_place}")
    } else {
        description.to_string()
    };
    let mut entry = WorldEvent::new(
        world.time,
        world.day,
        to_place,
        description,
        ["transition", "movement", mode.label()],
    );
    entry
        .sensory
        .insert("motion".into(), vec![mode.motion_sensation().into()]);
    world.record(entry);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generator::generate_world, places::PARK};

    #[test]
    fn transition_moves_and_logs() {
        let mut world = generate_world(7);
        apply_transition(&mut world, PARK, TransitionMode::Buggy, "").unwrap();
        assert_eq!(world.current_place, PARK);
        let entry = world.timeline.back().unwrap();
        assert_eq!(entry.description, "Transitioned to park");
        assert_eq!(entry.tags, vec!["transition", "movement", "buggy"]);
        assert_eq!(entry.sensory["motion"], vec!["rocking"]);
        assert_eq!(world.last_transport.as_ref().unwrap().from, "hospital");
    }

    #[test]
    fn transition_rejects_unknown_or_frozen() {
        let mut world = generate_world(7);
        assert_eq!(
            apply_transition(&mut world, "moon", TransitionMode::Car, ""),
            Err(WorldError::UnknownPlace("moon".into()))
        );
        world.freeze();
        assert_eq!(
            apply_transition(&mut world, PARK, TransitionMode::Car, ""),
            Err(WorldError::Frozen)
        );
    }
}
