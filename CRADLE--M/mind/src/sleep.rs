//! Sleep consolidation. Replays recent episodes, reinforces familiarity and
//! writes an internal log. Introduces nothing that was not experienced.

use std::collections::VecDeque;

use cradle_world::{ExperienceEvent, ENVIRONMENT_AGENT, SELF_AGENT};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::{
    familiarity::FamiliarityMemory,
    lexicon::{episode_pairs, AssociationGraph, Edge},
    memory::SensoryPacket,
};

/// Internal verdict on a replayed tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplayCoherence {
    /// Replayed without contradiction.
    Stable,
    /// Replayed from an episode that carried no sensory content.
    Partial,
    /// Same agent placed in more than one place within the replay window.
    Conflict,
}

/// What was replayed and whether it held together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SleepInternalLog {
    /// Tags in replay order, deduplicated.
    pub replayed_tags: Vec<String>,
    /// Tag -> verdict.
    pub coherence: IndexMap<String, ReplayCoherence>,
}

impl SleepInternalLog {
    fn mark(&mut self, tag: String, verdict: ReplayCoherence) {
        match self.coherence.get_mut(&tag) {
            Some(existing) => {
                if rank(verdict) > rank(*existing) {
                    *existing = verdict;
                }
            }
            None => {
                self.replayed_tags.push(tag.clone());
                self.coherence.insert(tag, verdict);
            }
        }
    }

    /// Tags that ended in `verdict`.
    #[must_use]
    pub fn tags_with(&self, verdict: ReplayCoherence) -> Vec<&str> {
        self.coherence
            .iter()
            .filter(|(_, v)| **v == verdict)
            .map(|(tag, _)| tag.as_str())
            .collect()
    }
}

const fn rank(verdict: ReplayCoherence) -> u8 {
    match verdict {
        ReplayCoherence::Stable => 0,
        ReplayCoherence::Partial => 1,
        ReplayCoherence::Conflict => 2,
    }
}

/// Result of one night.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SleepReport {
    /// Episodes replayed.
    pub replayed_count: usize,
    /// Familiarity reinforcements applied.
    pub reinforced: usize,
    /// Heaviest replay edges.
    pub top_edges: Vec<Edge>,
    /// Internal log.
    pub log: SleepInternalLog,
}

/// Replay windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SleepEngine {
    /// Episodes replayed for co-occurrence.
    pub replay_window: usize,
    /// Episodes and packets whose sensory values are reinforced.
    pub familiarity_window: usize,
    /// Edges reported.
    pub top_edges: usize,
}

impl Default for SleepEngine {
    fn default() -> Self {
        Self {
            replay_window: 12,
            familiarity_window: 50,
            top_edges: 20,
        }
    }
}

fn tail<T>(items: &VecDeque<T>, n: usize) -> impl Iterator<Item = &T> {
    items.iter().skip(items.len().saturating_sub(n))
}

impl SleepEngine {
    /// Consolidates recent experience. Replay edges are also folded into
    /// the mind's long-lived `edges`.
    pub fn consolidate(
        &self,
        episodes: &VecDeque<ExperienceEvent>,
        packets: &VecDeque<SensoryPacket>,
        familiarity: &mut FamiliarityMemory,
        edges: &mut AssociationGraph,
    ) -> SleepReport {
        let replayed: Vec<&ExperienceEvent> = tail(episodes, self.replay_window).collect();

        let mut replay = AssociationGraph::default();
        for episode in &replayed {
            for (a, b) in episode_pairs(episode) {
                replay.strengthen(&a, &b, 1);
                edges.strengthen(&a, &b, 1);
            }
        }

        let mut reinforced = 0;
        let sensed = tail(episodes, self.familiarity_window)
            .map(|episode| &episode.sensory)
            .chain(tail(packets, self.familiarity_window).map(|packet| &packet.sensory));
        for sensory in sensed {
            for (modality, values) in sensory {
                for value in values {
                    familiarity.reinforce(modality, value);
                    reinforced += 1;
                }
            }
        }

        SleepReport {
            replayed_count: replayed.len(),
            reinforced,
            top_edges: replay.top(self.top_edges),
            log: internal_log(&replayed),
        }
    }
}

fn internal_log(replayed: &[&ExperienceEvent]) -> SleepInternalLog {
    let mut seen_at: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for episode in replayed {
        if episode.agent != SELF_AGENT && episode.agent != ENVIRONMENT_AGENT {
            seen_at
                .entry(episode.agent.as_str())
                .or_default()
                .insert(episode.place_id.as_str());
        }
    }

    let mut log = SleepInternalLog::default();
    for episode in replayed {
        let partial = episode.sensory.values().all(Vec::is_empty);
        let place_verdict = if partial {
            ReplayCoherence::Partial
        } else {
            ReplayCoherence::Stable
        };
        let agent_verdict = if seen_at
            .get(episode.agent.as_str())
            .is_some_and(|places| places.len() > 1)
        {
            ReplayCoherence::Conflict
        } else {
            place_verdict
        };
        log.mark(format!("place:{}", episode.place_id), place_verdict);
        log.mark(format!("agent:{}", episode.agent), agent_verdict);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::EventKind;

    fn scene(place: &str, agent: &str, sound: Option<&str>) -> ExperienceEvent {
        let mut event = ExperienceEvent::new(1, EventKind::Care, place).actor(agent, "held");
        if let Some(sound) = sound {
            event = event.sense("sound", sound);
        }
        event
    }

    #[test]
    fn replays_only_the_window() {
        let engine = SleepEngine {
            replay_window: 2,
            ..SleepEngine::default()
        };
        let episodes: VecDeque<_> = [
            scene("hospital", "Nurse", Some("beep")),
            scene("house_home", "Mum", Some("voice")),
            scene("house_home", "Mum", Some("voice")),
        ]
        .into_iter()
        .collect();
        let mut familiarity = FamiliarityMemory::default();
        let mut edges = AssociationGraph::default();
        let report = engine.consolidate(&episodes, &VecDeque::new(), &mut familiarity, &mut edges);
        assert_eq!(report.replayed_count, 2);
        assert_eq!(report.top_edges[0].weight, 2);
        assert_eq!(edges.weight("agent:Nurse", "place:hospital"), 0);
        assert_eq!(report.reinforced, 3);
        assert!((familiarity.get("sound", "voice") - 0.02).abs() < 1e-6);
    }

    #[test]
    fn packets_are_reinforced_too() {
        let engine = SleepEngine::default();
        let mut sensory = IndexMap::new();
        sensory.insert("vision".to_string(), vec!["bright lights".to_string()]);
        let packets: VecDeque<_> = [SensoryPacket {
            place: "hospital".into(),
            sensory,
            tags: vec!["care".into()],
            time: 1.0,
            day: 0,
        }]
        .into_iter()
        .collect();
        let mut familiarity = FamiliarityMemory::default();
        let report = engine.consolidate(
            &VecDeque::new(),
            &packets,
            &mut familiarity,
            &mut AssociationGraph::default(),
        );
        assert_eq!(report.replayed_count, 0);
        assert_eq!(report.reinforced, 1);
        assert!(familiarity.get("vision", "bright lights") > 0.0);
    }

    #[test]
    fn internal_log_flags_partial_and_conflict() {
        let engine = SleepEngine::default();
        let episodes: VecDeque<_> = [
            scene("house_home", "Mum", Some("voice")),
            scene("park", "Mum", Some("birds")),
            scene("shops", "Dad", None),
            scene("shops", SELF_AGENT, Some("chatter")),
        ]
        .into_iter()
        .collect();
        let report = engine.consolidate(
            &episodes,
            &VecDeque::new(),
            &mut FamiliarityMemory::default(),
            &mut AssociationGraph::default(),
        );
        let log = &report.log;
        assert_eq!(
            log.replayed_tags,
            vec![
                "place:house_home",
                "agent:Mum",
                "place:park",
                "place:shops",
                "agent:Dad",
                "agent:self",
            ]
        );
        assert_eq!(log.coherence["agent:Mum"], ReplayCoherence::Conflict);
        assert_eq!(log.coherence["agent:Dad"], ReplayCoherence::Partial);
        assert_eq!(log.coherence["place:shops"], ReplayCoherence::Partial);
        assert_eq!(log.coherence["agent:self"], ReplayCoherence::Stable);
        assert_eq!(log.tags_with(ReplayCoherence::Stable), vec!["place:house_home", "place:park", "agent:self"]);
    }
}
