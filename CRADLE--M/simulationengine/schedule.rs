//! Executes a day's events in order and enforces that every day ends in bed.

use cradle_world::{places::BEDROOM, ExperienceEvent, SELF_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Room every day ends in.
pub const BED: &str = "bed";

/// Schedule misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// A day with no events cannot be loaded.
    #[error("day {0} has no events")]
    EmptyDay(u32),
    /// Wake requested before any day was loaded.
    #[error("no day loaded")]
    NothingLoaded,
}

/// Whether events may flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleState {
    /// No events until wake is authorised.
    Sleeping,
    /// Events flow.
    Awake,
}

/// Observer-visible movement of the infant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledMovement {
    /// Day.
    pub day: u32,
    /// 1-based position of the event in the day.
    pub event: usize,
    /// Who moved.
    pub actor: String,
    /// Origin.
    pub from: String,
    /// Destination.
    pub to: String,
}

/// Observer status line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleStatus {
    /// Day.
    pub day: u32,
    /// State.
    pub state: ScheduleState,
    /// Events consumed.
    pub event_index: usize,
    /// Events loaded.
    pub events_total: usize,
    /// Tracked place.
    pub current_place: String,
    /// Tracked room.
    pub current_room: Option<String>,
    /// Movements recorded since the day was loaded.
    pub movements: usize,
}

/// A loaded day.
#[derive(Debug, Clone)]
pub struct Schedule {
    day: u32,
    state: ScheduleState,
    events: Vec<ExperienceEvent>,
    index: usize,
    current_place: String,
    current_room: Option<String>,
    movements: Vec<ScheduledMovement>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            day: 0,
            state: ScheduleState::Sleeping,
            events: Vec::new(),
            index: 0,
            current_place: cradle_world::places::HOSPITAL.into(),
            current_room: None,
            movements: Vec::new(),
        }
    }
}

impl Schedule {
    /// Loads a day. The schedule falls asleep and must be woken explicitly.
    pub fn load(
        &mut self,
        day: u32,
        events: Vec<ExperienceEvent>,
        start_place: &str,
        start_room: Option<&str>,
    ) -> Result<(), ScheduleError> {
        if events.is_empty() {
            return Err(ScheduleError::EmptyDay(day));
        }
        self.day = day;
        self.events = events;
        self.index = 0;
        self.movements.clear();
        self.current_place = start_place.to_string();
        self.current_room = start_room.map(str::to_string);
        self.state = ScheduleState::Sleeping;
        Ok(())
    }

    /// Lets events flow.
    pub fn authorise_wake(&mut self) -> Result<(), ScheduleError> {
        if self.events.is_empty() {
            return Err(ScheduleError::NothingLoaded);
        }
        self.state = ScheduleState::Awake;
        Ok(())
    }

    /// Next event, or `None` while sleeping or once the day is exhausted.
    pub fn next_event(&mut self) -> Option<ExperienceEvent> {
        if self.state != ScheduleState::Awake {
            return None;
        }
        let event = self.events.get(self.index)?.clone();
        self.index += 1;

        if let Some(movement) = &event.movement {
            self.movements.push(ScheduledMovement {
                day: self.day,
                event: self.index,
                actor: SELF_AGENT.into(),
                from: movement.from.clone(),
                to: movement.to.clone(),
            });
            self.current_place.clone_from(&movement.to);
        } else if !event.place_id.is_empty() {
            self.current_place.clone_from(&event.place_id);
        }
        if event.room.is_some() {
            self.current_room.clone_from(&event.room);
        }
        Some(event)
    }

    /// Forces the day to end in bed, asleep.
    pub fn end_day_enforced(&mut self) {
        self.current_place = BEDROOM.into();
        self.current_room = Some(BED.into());
        self.state = ScheduleState::Sleeping;
    }

    /// Events left today.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.index)
    }

    /// Loaded events, in order.
    #[must_use]
    pub fn events(&self) -> &[ExperienceEvent] {
        &self.events
    }

    /// Movements of the loaded day, in order.
    #[must_use]
    pub fn movements(&self) -> &[ScheduledMovement] {
        &self.movements
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ScheduleState {
        self.state
    }

    /// Observer status.
    #[must_use]
    pub fn status(&self) -> ScheduleStatus {
        ScheduleStatus {
            day: self.day,
            state: self.state,
            event_index: self.index,
            events_total: self.events.len(),
            current_place: self.current_place.clone(),
            current_room: self.current_room.clone(),
            movements: self.movements.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::{places::HOME, EventKind, Movement};

    fn day() -> Vec<ExperienceEvent> {
        vec![
            ExperienceEvent::new(1, EventKind::Wake, BEDROOM).room(BED),
            ExperienceEvent::new(1, EventKind::Outing, HOME)
                .movement(Movement::new(HOME, "park").mode("buggy")),
            ExperienceEvent::new(1, EventKind::Care, HOME).room("kitchen"),
        ]
    }

    #[test]
    fn loaded_day_waits_for_wake() {
        let mut schedule = Schedule::default();
        schedule.load(1, day(), BEDROOM, Some(BED)).unwrap();
        assert!(schedule.next_event().is_none());
        schedule.authorise_wake().unwrap();
        assert_eq!(schedule.next_event().unwrap().kind, EventKind::Wake);
        assert_eq!(schedule.remaining(), 2);
    }

    #[test]
    fn tracks_movement_then_place_and_room() {
        let mut schedule = Schedule::default();
        schedule.load(1, day(), BEDROOM, Some(BED)).unwrap();
        schedule.authorise_wake().unwrap();
        schedule.next_event();
        schedule.next_event();
        let status = schedule.status();
        assert_eq!(status.current_place, "park");
        assert_eq!(status.current_room.as_deref(), Some(BED));
        assert_eq!(schedule.movements()[0].event, 2);
        schedule.next_event();
        assert_eq!(schedule.status().current_room.as_deref(), Some("kitchen"));
        assert!(schedule.next_event().is_none());
    }

    #[test]
    fn movements_belong_to_the_loaded_day() {
        let mut schedule = Schedule::default();
        schedule.load(1, day(), BEDROOM, Some(BED)).unwrap();
        schedule.authorise_wake().unwrap();
        while schedule.next_event().is_some() {}
        assert_eq!(schedule.status().movements, 1);
        schedule.end_day_enforced();

        let quiet = vec![ExperienceEvent::new(2, EventKind::Wake, BEDROOM).room(BED)];
        schedule.load(2, quiet, BEDROOM, Some(BED)).unwrap();
        assert!(schedule.movements().is_empty());
        schedule.authorise_wake().unwrap();
        schedule.next_event();
        assert_eq!(schedule.status().movements, 0);
    }

    #[test]
    fn day_end_is_enforced_in_bed() {
        let mut schedule = Schedule::default();
        schedule.load(1, day(), HOME, None).unwrap();
        schedule.authorise_wake().unwrap();
        schedule.next_event();
        schedule.end_day_enforced();
        let status = schedule.status();
        assert_eq!(status.current_place, BEDROOM);
        assert_eq!(status.current_room.as_deref(), Some(BED));
        assert_eq!(status.state, ScheduleState::Sleeping);
        assert!(schedule.next_event().is_none());
    }

    #[test]
    fn misuse_is_reported() {
        let mut schedule = Schedule::default();
        assert_eq!(schedule.authorise_wake(), Err(ScheduleError::NothingLoaded));
        assert_eq!(
            schedule.load(4, Vec::new(), HOME, None),
            Err(ScheduleError::EmptyDay(4))
        );
    }
}
