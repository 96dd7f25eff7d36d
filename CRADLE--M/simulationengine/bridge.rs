use cradle_mind::SensoryPacket;
use cradle_world::{WorldEvent, WorldState, EXPERIENCE_TAG};

/// Turns objective timeline entries into sensory packets for the mind.
/// Entries written for applied experiences are skipped; the mind already
/// lived those.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBridge {
    cursor: u64,
}

impl WorldBridge {
    /// Packet for one entry, `None` when it carries no sensory content.
    #[must_use]
    pub fn translate_event(event: &WorldEvent) -> Option<SensoryPacket> {
        if event.sensory.is_empty() || event.tags.iter().any(|tag| tag == EXPERIENCE_TAG) {
            return None;
        }
        Some(SensoryPacket {
            place: event.place.clone(),
            sensory: event.sensory.clone(),
            tags: event.tags.clone(),
            time: event.time,
            day: event.day,
        })
    }

    /// Packets for every entry appended since the previous pull.
    pub fn pull_new_packets(&mut self, world: &WorldState) -> Vec<SensoryPacket> {
        let (entries, cursor) = world.timeline_since(self.cursor);
        self.cursor = cursor;
        entries.into_iter().filter_map(Self::translate_event).collect()
    }

    /// Timeline sequence number already consumed.
    #[must_use]
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }
}
