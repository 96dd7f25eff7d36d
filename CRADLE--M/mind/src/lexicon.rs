//! Exposure counters for tokens and co-occurrence edges between them.

use cradle_world::ExperienceEvent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Token exposure counts. No meaning is attached to a token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lexicon {
    counts: IndexMap<String, u32>,
}

fn normalise(token: &str) -> Option<String> {
    let token = token.trim().to_lowercase();
    (!token.is_empty()).then_some(token)
}

impl Lexicon {
    /// Adds `weight` exposures of `token`. Returns false for blank tokens.
    pub fn expose(&mut self, token: &str, weight: u32) -> bool {
        let Some(token) = normalise(token) else {
            return false;
        };
        *self.counts.entry(token).or_insert(0) += weight;
        true
    }

    /// Exposure count of a token (normalised before lookup).
    #[must_use]
    pub fn count(&self, token: &str) -> u32 {
        normalise(token)
            .and_then(|token| self.counts.get(&token).copied())
            .unwrap_or(0)
    }

    /// Known tokens by count desc, then token asc.
    #[must_use]
    pub fn known_words(&self) -> Vec<(String, u32)> {
        let mut words: Vec<_> = self
            .counts
            .iter()
            .map(|(token, count)| (token.clone(), *count))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words
    }

    /// Distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True before any exposure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Weighted co-occurrence edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// First endpoint, as first inserted.
    pub a: String,
    /// Second endpoint.
    pub b: String,
    /// Times the pair co-occurred.
    pub weight: u32,
}

/// Co-occurrence edges. A pair keeps the orientation it was first seen
/// with; later sightings in either orientation add to it.
#[derive(Debug, Clone, Default)]
pub struct AssociationGraph {
    edges: IndexMap<(String, String), u32>,
}

impl AssociationGraph {
    /// Adds `by` to the pair's weight.
    pub fn strengthen(&mut self, a: &str, b: &str, by: u32) {
        let reversed = (b.to_string(), a.to_string());
        if let Some(weight) = self.edges.get_mut(&reversed) {
            *weight += by;
            return;
        }
        *self.edges.entry((a.to_string(), b.to_string())).or_insert(0) += by;
    }

    /// Weight of the pair in either orientation.
    #[must_use]
    pub fn weight(&self, a: &str, b: &str) -> u32 {
        self.edges
            .get(&(a.to_string(), b.to_string()))
            .or_else(|| self.edges.get(&(b.to_string(), a.to_string())))
            .copied()
            .unwrap_or(0)
    }

    /// The `n` heaviest edges; ties keep insertion order.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .edges
            .iter()
            .map(|((a, b), weight)| Edge {
                a: a.clone(),
                b: b.clone(),
                weight: *weight,
            })
            .collect();
        edges.sort_by(|x, y| y.weight.cmp(&x.weight));
        edges.truncate(n);
        edges
    }

    /// Number of distinct pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when no pair was seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Co-occurrence pairs of one episode: agent-place, agent-room, place-room,
/// agent-object, object-place and agent-present for everyone present.
#[must_use]
pub fn episode_pairs(event: &ExperienceEvent) -> Vec<(String, String)> {
    let agent = format!("agent:{}", event.agent);
    let place = format!("place:{}", event.place_id);
    let mut pairs = vec![(agent.clone(), place.clone())];
    if let Some(room) = &event.room {
        let room = format!("room:{room}");
        pairs.push((agent.clone(), room.clone()));
        pairs.push((place.clone(), room));
    }
    if let Some(object) = event.object.as_deref().filter(|o| !o.is_empty()) {
        let object = format!("obj:{object}");
        pairs.push((agent.clone(), object.clone()));
        pairs.push((object, place));
    }
    for person in &event.presence {
        pairs.push((agent.clone(), format!("present:{person}")));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_world::EventKind;

    #[test]
    fn tokens_are_normalised_and_sorted() {
        let mut lexicon = Lexicon::default();
        assert!(lexicon.expose("  Ball ", 1));
        assert!(lexicon.expose("ball", 2));
        assert!(lexicon.expose("mum", 3));
        assert!(lexicon.expose("dog", 1));
        assert!(!lexicon.expose("   ", 1));
        assert_eq!(lexicon.count("BALL"), 3);
        assert_eq!(
            lexicon.known_words(),
            vec![("ball".into(), 3), ("mum".into(), 3), ("dog".into(), 1)]
        );
        assert_eq!(lexicon.len(), 3);
    }

    #[test]
    fn edges_merge_orientations_and_rank() {
        let mut graph = AssociationGraph::default();
        graph.strengthen("agent:Mum", "place:park", 1);
        graph.strengthen("place:park", "agent:Mum", 1);
        graph.strengthen("agent:Dad", "place:park", 2);
        graph.strengthen("agent:Dad", "obj:ball", 1);
        assert_eq!(graph.weight("place:park", "agent:Mum"), 2);
        assert_eq!(graph.len(), 3);
        let top = graph.top(2);
        assert_eq!(top[0].a, "agent:Mum");
        assert_eq!(top[1].a, "agent:Dad");
        assert_eq!(top[1].b, "place:park");
    }

    #[test]
    fn episode_pairs_cover_room_object_and_presence() {
        let event = ExperienceEvent::new(1, EventKind::Play, "house_home")
            .room("living_room")
            .actor("Dad", "rolled")
            .object("ball")
            .presence(["Mum"]);
        let pairs = episode_pairs(&event);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&("obj:ball".into(), "place:house_home".into())));
        assert!(pairs.contains(&("agent:Dad".into(), "present:Mum".into())));
    }
}
