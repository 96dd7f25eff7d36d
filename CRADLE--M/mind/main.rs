//! Mind runtime: ingests experiences, receives bridge packets, responds,
//! sleeps and exposes observer-safe snapshots.

use std::collections::VecDeque;

use cradle_world::{
    check, CoherenceReport, EventKind, ExperienceEvent, Interaction, WorldState, SELF_AGENT,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    body::{BiologicalState, BodySnapshot},
    familiarity::{FamiliarityMemory, OBSERVE_DELTA, REINFORCE_DELTA},
    gate::{GateResult, ResponseGate},
    lexicon::{episode_pairs, AssociationGraph, Edge, Lexicon},
    memory::{ActivityEntry, SensoryPacket, TraceEntry},
    pathing::traverse,
    perception::PerceivedWorldState,
    reflex::{ActionDecision, ActionRouter, LocalBody},
    sleep::{SleepEngine, SleepReport},
    somatic::SomaticMap,
};

/// Household members whose presence is not worth a social trace.
pub const FAMILY: [&str; 3] = ["Mum", "Dad", "Sister"];

const TOUCH_ZONE: &str = "chest";
const TOUCH_INTENSITY: f32 = 0.15;
const EMPHASIS_WEIGHT: u32 = 2;
const SIGNAL_HALF_POINT: f32 = 5.0;

const fn default_block_threshold() -> f32 {
    0.2
}
const fn default_episode_capacity() -> usize {
    512
}
const fn default_packet_capacity() -> usize {
    512
}
const fn default_activity_capacity() -> usize {
    2048
}
const fn default_trace_capacity() -> usize {
    2048
}
const fn default_replay_window() -> usize {
    12
}
const fn default_familiarity_window() -> usize {
    50
}
const fn default_top_edges() -> usize {
    20
}
const fn default_observe_delta() -> f32 {
    OBSERVE_DELTA
}
const fn default_reinforce_delta() -> f32 {
    REINFORCE_DELTA
}

/// Thresholds and windows of the mind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MindConfig {
    /// Events scoring at or below this are blocked.
    #[serde(default = "default_block_threshold")]
    pub block_threshold: f32,
    /// Episodes kept.
    #[serde(default = "default_episode_capacity")]
    pub episode_capacity: usize,
    /// Sensory packets kept.
    #[serde(default = "default_packet_capacity")]
    pub packet_capacity: usize,
    /// Activity entries kept.
    #[serde(default = "default_activity_capacity")]
    pub activity_capacity: usize,
    /// Trace entries kept.
    #[serde(default = "default_trace_capacity")]
    pub trace_capacity: usize,
    /// Episodes replayed each night.
    #[serde(default = "default_replay_window")]
    pub replay_window: usize,
    /// Episodes and packets reinforced each night.
    #[serde(default = "default_familiarity_window")]
    pub familiarity_window: usize,
    /// Edges reported after sleep.
    #[serde(default = "default_top_edges")]
    pub top_edges: usize,
    /// Familiarity gain while awake.
    #[serde(default = "default_observe_delta")]
    pub observe_delta: f32,
    /// Familiarity gain during replay.
    #[serde(default = "default_reinforce_delta")]
    pub reinforce_delta: f32,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            block_threshold: default_block_threshold(),
            episode_capacity: default_episode_capacity(),
            packet_capacity: default_packet_capacity(),
            activity_capacity: default_activity_capacity(),
            trace_capacity: default_trace_capacity(),
            replay_window: default_replay_window(),
            familiarity_window: default_familiarity_window(),
            top_edges: default_top_edges(),
            observe_delta: default_observe_delta(),
            reinforce_delta: default_reinforce_delta(),
        }
    }
}

/// What happened to one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestOutcome {
    /// False when the coherence check blocked the event.
    pub accepted: bool,
    /// Coherence verdict.
    pub coherence: CoherenceReport,
    /// Exchange aimed at the infant, for the observer to record.
    pub interaction: Option<Interaction>,
    /// Body after ingestion.
    pub body: BodySnapshot,
}

/// Compact observer summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MindSummary {
    /// Day.
    pub day: u32,
    /// Whether birth was experienced.
    pub birthed: bool,
    /// Last thing the mind did.
    pub last_action: String,
    /// Body.
    pub body: BodySnapshot,
    /// Active somatic zones.
    pub somatic: IndexMap<String, f32>,
    /// Distinct tokens.
    pub lexicon_size: usize,
    /// Trace entries.
    pub trace_count: usize,
    /// Activity entries.
    pub activity_len: usize,
    /// Episodes kept.
    pub episode_count: usize,
    /// Packets kept.
    pub packet_count: usize,
}

/// Full observer snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MindSnapshot {
    /// Summary.
    pub summary: MindSummary,
    /// Believed place.
    pub current_place: Option<String>,
    /// Tokens by exposure.
    pub known_words: Vec<(String, u32)>,
    /// Familiar sensory patterns.
    pub familiarity: IndexMap<String, f32>,
    /// Perceived world.
    pub perceived: PerceivedWorldState,
    /// Heaviest association edges.
    pub top_edges: Vec<Edge>,
    /// Reflex table.
    pub local_body: LocalBody,
    /// Last coherence verdict.
    pub last_coherence: Option<CoherenceReport>,
    /// Last night's report.
    pub last_sleep: Option<SleepReport>,
    /// Tags of the newest packet.
    pub recent_tags: Vec<String>,
}

/// The infant's body and mind. Reads the world only to check coherence;
/// never mutates it.
#[derive(Debug, Clone)]
pub struct Mind {
    config: MindConfig,
    body: BiologicalState,
    somatic: SomaticMap,
    lexicon: Lexicon,
    edges: AssociationGraph,
    familiarity: FamiliarityMemory,
    perceived: PerceivedWorldState,
    local_body: LocalBody,
    router: ActionRouter,
    gate: ResponseGate,
    sleep_engine: SleepEngine,
    packets: VecDeque<SensoryPacket>,
    episodes: VecDeque<ExperienceEvent>,
    trace: VecDeque<TraceEntry>,
    activity: VecDeque<ActivityEntry>,
    current_place: Option<String>,
    last_coherence: Option<CoherenceReport>,
    last_sleep: Option<SleepReport>,
    last_action: String,
    birthed: bool,
    day: u32,
}

impl Default for Mind {
    fn default() -> Self {
        Self::new(MindConfig::default())
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, capacity: usize) {
    queue.push_back(item);
    while queue.len() > capacity.max(1) {
        queue.pop_front();
    }
}

impl Mind {
    /// Creates a fresh, unborn mind.
    #[must_use]
    pub fn new(config: MindConfig) -> Self {
        Self {
            body: BiologicalState::default(),
            somatic: SomaticMap::default(),
            lexicon: Lexicon::default(),
            edges: AssociationGraph::default(),
            familiarity: FamiliarityMemory::with_deltas(config.observe_delta, config.reinforce_delta),
            perceived: PerceivedWorldState::default(),
            local_body: LocalBody::default(),
            router: ActionRouter,
            gate: ResponseGate::default(),
            sleep_engine: SleepEngine {
                replay_window: config.replay_window,
                familiarity_window: config.familiarity_window,
                top_edges: config.top_edges,
            },
            packets: VecDeque::new(),
            episodes: VecDeque::new(),
            trace: VecDeque::new(),
            activity: VecDeque::new(),
            current_place: None,
            last_coherence: None,
            last_sleep: None,
            last_action: "waiting".into(),
            birthed: false,
            day: 0,
            config,
        }
    }

    fn log(&mut self, kind: &str, day: u32, detail: serde_json::Value) {
        let entry = ActivityEntry {
            kind: kind.to_string(),
            day,
            detail,
        };
        push_bounded(&mut self.activity, entry, self.config.activity_capacity);
    }

    fn push_trace(&mut self, entry: TraceEntry) {
        push_bounded(&mut self.trace, entry, self.config.trace_capacity);
    }

    /// Ingests one experience. Blocked events only leave a trace.
    pub fn ingest(&mut self, world: &WorldState, event: &ExperienceEvent) -> IngestOutcome {
        let report = check(world, event);
        self.last_coherence = Some(report.clone());
        let (day, index) = (event.day, event.index);

        if report.is_blocking(self.config.block_threshold) {
            self.push_trace(TraceEntry::Blocked {
                day,
                event: index,
                place: event.place_id.clone(),
                score: report.score,
                issues: report.issue_labels(),
            });
            return IngestOutcome {
                accepted: false,
                coherence: report,
                interaction: None,
                body: self.body.snapshot(),
            };
        }

        self.last_action = format!("ingest event {index}");
        self.log(
            "ingest",
            day,
            json!({ "event": index, "place": event.place_id, "room": event.room }),
        );
        if event.kind == EventKind::Birth {
            self.birthed = true;
        }

        self.body.update();
        self.somatic.decay();
        push_bounded(&mut self.episodes, event.clone(), self.config.episode_capacity);

        self.expose_tokens(event);
        for (a, b) in episode_pairs(event) {
            self.edges.strengthen(&a, &b, 1);
        }
        if let Some(movement) = &event.movement {
            self.edges.strengthen(
                &format!("place:{}", event.place_id),
                &format!("place:{}", movement.to),
                1,
            );
        }
        for (modality, values) in &event.sensory {
            for value in values {
                self.familiarity.observe(modality, value);
            }
        }

        let affect = event.tags.get("affect").cloned().unwrap_or_default();
        self.perceived
            .update_from_event(event.destination(), day, event.duration, &affect);
        self.current_place = Some(event.destination().to_string());

        if event.sensory.get("touch").is_some_and(|values| !values.is_empty()) {
            self.somatic.apply_touch(TOUCH_ZONE, TOUCH_INTENSITY);
        }
        self.body.apply_effects(&event.body_effects);

        self.trace_social(event);

        let interaction = event
            .transaction
            .as_ref()
            .filter(|transaction| transaction.target == SELF_AGENT)
            .map(|transaction| Interaction {
                agent: event.agent.clone(),
                outcome: transaction.outcome.clone(),
                day,
            });

        self.push_trace(TraceEntry::Experience {
            day,
            event: index,
            place: event.place_id.clone(),
            kind: event.kind,
        });
        let body = self.body.snapshot();
        self.log("body", day, json!({ "event": index, "body": body }));

        IngestOutcome {
            accepted: true,
            coherence: report,
            interaction,
            body,
        }
    }

    fn expose_tokens(&mut self, event: &ExperienceEvent) {
        let lexicon = &mut self.lexicon;
        lexicon.expose(&event.place_id, 1);
        if let Some(room) = &event.room {
            lexicon.expose(room, 1);
        }
        lexicon.expose(&event.agent, 1);
        lexicon.expose(&event.action, 1);
        if let Some(object) = &event.object {
            lexicon.expose(object, 1);
        }
        for token in &event.sounds_spoken {
            lexicon.expose(token, 1);
        }
        for token in &event.emphasis {
            lexicon.expose(token, EMPHASIS_WEIGHT);
        }
        for (modality, values) in &event.sensory {
            if !values.is_empty() {
                lexicon.expose(modality, 1);
            }
        }
    }

    fn trace_social(&mut self, event: &ExperienceEvent) {
        let strangers: Vec<String> = event
            .presence
            .iter()
            .filter(|person| !person.is_empty() && !FAMILY.contains(&person.as_str()))
            .cloned()
            .collect();
        for person in strangers {
            self.push_trace(TraceEntry::Social {
                day: event.day,
                event: event.index,
                place: event.place_id.clone(),
                with: event
                    .presence
                    .iter()
                    .filter(|other| !other.is_empty() && **other != person)
                    .cloned()
                    .collect(),
                pets: event.pets.clone(),
                action: event.action.clone(),
                object: event.object.clone(),
                saw: person.clone(),
            });
            self.log(
                "trace_write",
                event.day,
                json!({ "event": event.index, "saw": person, "place": event.place_id }),
            );
        }
    }

    /// Receives a sensory packet from the world bridge.
    pub fn receive_packet(&mut self, packet: SensoryPacket) {
        self.birthed = true;
        self.current_place = Some(packet.place.clone());
        for (modality, values) in &packet.sensory {
            for value in values {
                self.familiarity.observe(modality, value);
            }
        }
        self.log(
            "packet",
            packet.day,
            json!({ "place": packet.place, "tags": packet.tags }),
        );
        push_bounded(&mut self.packets, packet, self.config.packet_capacity);
    }

    /// Starts a waking day.
    pub fn wake(&mut self, day: u32) {
        self.day = day;
        self.last_action = "awake".into();
        self.log("wake", day, json!({}));
    }

    /// Sleeps: body rest, then consolidation.
    pub fn sleep(&mut self, day: u32) -> SleepReport {
        self.last_action = "sleep".into();
        self.log("sleep_start", day, json!({}));
        self.body.sleep();
        let report = self.sleep_engine.consolidate(
            &self.episodes,
            &self.packets,
            &mut self.familiarity,
            &mut self.edges,
        );
        let body = self.body.snapshot();
        self.log(
            "sleep_end",
            day,
            json!({
                "body": body,
                "replayed": report.replayed_count,
                "reinforced": report.reinforced,
            }),
        );
        self.last_sleep = Some(report.clone());
        report
    }

    /// Chooses a pre-verbal response to active stimuli and enacts it.
    pub fn respond<S: AsRef<str>>(&mut self, stimuli: &[S], caregiver_present: bool) -> ActionDecision {
        let decision = self.router.decide(&self.local_body, stimuli, caregiver_present);
        if let Some(action) = &decision.action {
            self.local_body.enact(action);
            self.last_action = format!("respond {action}");
        }
        let stimuli: Vec<&str> = stimuli.iter().map(AsRef::as_ref).collect();
        self.log(
            "respond",
            self.day,
            json!({ "stimuli": stimuli, "decision": decision }),
        );
        decision
    }

    /// Feeds back how much an action relieved a stimulus.
    pub fn record_relief(&mut self, stimulus: &str, action: &str, relief: f32) {
        self.local_body.record_relief(stimulus, action, relief);
    }

    /// Asks the gate whether the mind may answer about `anchor`. Stability
    /// is the anchor's place familiarity; signal is its lexicon exposure,
    /// saturating at 0.5 after five exposures.
    #[must_use]
    pub fn consider(&self, anchor: &str, resolvable_by_action: bool) -> GateResult {
        let stability = self.perceived.familiarity(anchor);
        #[allow(clippy::cast_precision_loss)]
        let exposure = self.lexicon.count(anchor) as f32;
        let signal = exposure / (exposure + SIGNAL_HALF_POINT);
        let has_anchor = stability > 0.0 || exposure > 0.0;
        self.gate
            .evaluate(stability, signal, has_anchor, resolvable_by_action)
    }

    /// Episode kinds matching the anchors, via [`traverse`].
    #[must_use]
    pub fn recall(&self, anchors: &[EventKind]) -> Vec<EventKind> {
        let history: Vec<EventKind> = self.episodes.iter().map(|episode| episode.kind).collect();
        traverse(anchors, &history)
    }

    /// Body state.
    #[must_use]
    pub const fn body(&self) -> &BiologicalState {
        &self.body
    }

    /// Lexicon.
    #[must_use]
    pub const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Association edges.
    #[must_use]
    pub const fn edges(&self) -> &AssociationGraph {
        &self.edges
    }

    /// Familiarity memory.
    #[must_use]
    pub const fn familiarity(&self) -> &FamiliarityMemory {
        &self.familiarity
    }

    /// Perceived world.
    #[must_use]
    pub const fn perceived(&self) -> &PerceivedWorldState {
        &self.perceived
    }

    /// Observation trace, oldest first.
    #[must_use]
    pub const fn trace(&self) -> &VecDeque<TraceEntry> {
        &self.trace
    }

    /// Activity timeline, oldest first.
    #[must_use]
    pub const fn activity(&self) -> &VecDeque<ActivityEntry> {
        &self.activity
    }

    /// Whether birth has been experienced.
    #[must_use]
    pub const fn birthed(&self) -> bool {
        self.birthed
    }

    /// Current day.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Last night's report.
    #[must_use]
    pub const fn last_sleep(&self) -> Option<&SleepReport> {
        self.last_sleep.as_ref()
    }

    /// Compact summary.
    #[must_use]
    pub fn summary(&self) -> MindSummary {
        MindSummary {
            day: self.day,
            birthed: self.birthed,
            last_action: self.last_action.clone(),
            body: self.body.snapshot(),
            somatic: self.somatic.snapshot(),
            lexicon_size: self.lexicon.len(),
            trace_count: self.trace.len(),
            activity_len: self.activity.len(),
            episode_count: self.episodes.len(),
            packet_count: self.packets.len(),
        }
    }

    /// Full observer snapshot.
    #[must_use]
    pub fn snapshot(&self) -> MindSnapshot {
        MindSnapshot {
            summary: self.summary(),
            current_place: self.current_place.clone(),
            known_words: self.lexicon.known_words(),
            familiarity: self.familiarity.snapshot(),
            perceived: self.perceived.clone(),
            top_edges: self.edges.top(self.config.top_edges),
            local_body: self.local_body.clone(),
            last_coherence: self.last_coherence.clone(),
            last_sleep: self.last_sleep.clone(),
            recent_tags: self
                .packets
                .back()
                .map(|packet| packet.tags.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gate::GateState, reflex::ActionKind};
    use cradle_world::{generate_world, Movement};

    const HOME: &str = "house_home";

    fn world() -> WorldState {
        generate_world(7)
    }

    #[test]
    fn blocked_events_only_leave_a_trace() {
        let world = world();
        let mut mind = Mind::default();
        let event = ExperienceEvent::new(1, EventKind::Travel, "moon")
            .actor("Stranger", "pushed")
            .object("rocket")
            .movement(Movement::new("moon", "mars"));
        let outcome = mind.ingest(&world, &event);
        assert!(!outcome.accepted);
        assert!(mind.lexicon().is_empty());
        assert!(mind.episodes.is_empty());
        assert!(mind.activity().is_empty());
        assert!(matches!(mind.trace()[0], TraceEntry::Blocked { .. }));
        assert!((mind.body().hunger - 0.30).abs() < f32::EPSILON);
    }

    #[test]
    fn accepted_event_updates_every_channel() {
        let world = world();
        let mut mind = Mind::default();
        let event = ExperienceEvent::new(2, EventKind::Play, HOME)
            .room("living_room")
            .actor("Dad", "showed")
            .object("rattle")
            .presence(["Dad", "Lucy"])
            .sense("touch", "soft")
            .sense("sound", "rattle shake")
            .spoken(["look"])
            .emphasis(["RATTLE"])
            .tag("affect", "joy")
            .effect("comfort", "rising");
        let outcome = mind.ingest(&world, &event);
        assert!(outcome.accepted);
        assert_eq!(mind.lexicon().count("rattle"), 3);
        assert_eq!(mind.lexicon().count("touch"), 1);
        assert_eq!(mind.lexicon().count("living_room"), 1);
        assert_eq!(mind.edges().weight("agent:Dad", "present:Lucy"), 1);
        assert!((mind.familiarity().get("touch", "soft") - 0.02).abs() < 1e-6);
        assert!((mind.somatic.level("chest") - 0.15).abs() < 1e-6);
        assert!(mind.perceived().familiar_places[HOME].comfort_bias > 0.0);
        let social: Vec<_> = mind
            .trace()
            .iter()
            .filter(|t| matches!(t, TraceEntry::Social { .. }))
            .collect();
        assert_eq!(social.len(), 1);
        assert!(matches!(mind.trace().back(), Some(TraceEntry::Experience { .. })));
        // update() then comfort soothe(0.1): 0.10 + 0.01 - 0.1
        assert!((mind.body().discomfort - 0.01).abs() < 1e-5);
    }

    #[test]
    fn transaction_to_self_is_reported() {
        let world = world();
        let mut mind = Mind::default();
        let event = ExperienceEvent::new(3, EventKind::Social, HOME)
            .actor("Lucy", "waved")
            .transaction(SELF_AGENT, "smile");
        let outcome = mind.ingest(&world, &event);
        assert_eq!(
            outcome.interaction,
            Some(Interaction {
                agent: "Lucy".into(),
                outcome: "smile".into(),
                day: 3
            })
        );
    }

    #[test]
    fn movement_links_origin_and_destination() {
        let world = world();
        let mut mind = Mind::default();
        let event = ExperienceEvent::new(0, EventKind::Travel, "hospital")
            .actor("Mum", "carried")
            .object(SELF_AGENT)
            .movement(Movement::new("hospital", HOME).mode("car"));
        mind.ingest(&world, &event);
        assert_eq!(mind.edges().weight("place:hospital", "place:house_home"), 1);
        assert_eq!(mind.perceived().current_place.as_deref(), Some(HOME));
    }

    #[test]
    fn packets_mark_birth_and_familiarity() {
        let mut mind = Mind::default();
        let mut sensory = IndexMap::new();
        sensory.insert("vision".to_string(), vec!["bright lights".to_string()]);
        mind.receive_packet(SensoryPacket {
            place: "hospital".into(),
            sensory,
            tags: vec!["care".into()],
            time: 0.5,
            day: 0,
        });
        assert!(mind.birthed());
        let snapshot = mind.snapshot();
        assert_eq!(snapshot.current_place.as_deref(), Some("hospital"));
        assert_eq!(snapshot.recent_tags, vec!["care"]);
        assert_eq!(snapshot.summary.packet_count, 1);
    }

    #[test]
    fn sleep_consolidates_and_rests() {
        let world = world();
        let mut mind = Mind::default();
        mind.wake(1);
        for _ in 0..3 {
            let event = ExperienceEvent::new(1, EventKind::Care, HOME)
                .actor("Mum", "held")
                .sense("sound", "voice");
            mind.ingest(&world, &event);
        }
        let fatigue = mind.body().fatigue;
        let report = mind.sleep(1);
        assert_eq!(report.replayed_count, 3);
        assert_eq!(report.reinforced, 3);
        assert!(mind.body().fatigue < fatigue);
        assert_eq!(mind.edges().weight("agent:Mum", "place:house_home"), 6);
        assert_eq!(mind.summary().last_action, "sleep");
        assert!(mind.last_sleep().is_some());
    }

    #[test]
    fn respond_enacts_and_learns() {
        let mut mind = Mind::default();
        let decision = mind.respond(&["hungry"], true);
        assert_eq!(decision.kind, ActionKind::SeekHelp);
        mind.record_relief("hungry", "suck_fist", 0.4);
        let decision = mind.respond(&["hungry"], true);
        assert_eq!(decision.action.as_deref(), Some("suck_fist"));
        assert_eq!(mind.snapshot().local_body.action_history, vec!["cry", "suck_fist"]);
    }

    #[test]
    fn recall_and_gate_use_experience_only() {
        let world = world();
        let mut mind = Mind::default();
        assert_eq!(mind.consider(HOME, false).state, GateState::KnownUnknown);
        for kind in [EventKind::Wake, EventKind::Feed, EventKind::Play, EventKind::Feed] {
            mind.ingest(&world, &ExperienceEvent::new(1, kind, HOME).actor("Mum", "held"));
        }
        assert_eq!(
            mind.recall(&[EventKind::Feed, EventKind::Sleep, EventKind::Wake]),
            vec![EventKind::Feed, EventKind::Feed, EventKind::Wake]
        );
        let verdict = mind.consider(HOME, false);
        assert!(verdict.z > 0.0);
        assert!(!verdict.reasons.contains(&"no_anchor".to_string()));
    }

    #[test]
    fn episode_memory_is_bounded() {
        let world = world();
        let mut mind = Mind::new(MindConfig {
            episode_capacity: 2,
            ..MindConfig::default()
        });
        for index in 0..5 {
            let mut event = ExperienceEvent::new(1, EventKind::Care, HOME);
            event.index = index;
            mind.ingest(&world, &event);
        }
        assert_eq!(mind.summary().episode_count, 2);
        assert_eq!(mind.episodes.front().map(|e| e.index), Some(3));
    }

    #[test]
    fn trace_keeps_only_the_latest_entries() {
        let world = world();
        let mut mind = Mind::new(MindConfig {
            trace_capacity: 3,
            ..MindConfig::default()
        });
        for index in 0..10 {
            let mut event = ExperienceEvent::new(1, EventKind::Care, HOME);
            event.index = index;
            mind.ingest(&world, &event);
        }
        let blocked = ExperienceEvent::new(1, EventKind::Travel, "moon");
        mind.ingest(&world, &blocked);
        assert_eq!(mind.summary().trace_count, 3);
        assert!(matches!(
            mind.trace().front(),
            Some(TraceEntry::Experience { event: 8, .. })
        ));
        assert!(matches!(mind.trace().back(), Some(TraceEntry::Blocked { .. })));
    }
}
