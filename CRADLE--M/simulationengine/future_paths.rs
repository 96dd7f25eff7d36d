//! Observer-side registry of proposed future experiences. Nothing here is
//! ever seen by the mind until a path is approved and built into a day.

use chrono::{DateTime, Utc};
use cradle_mind::Lexicon;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// What a path introduces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// A new place.
    Place,
    /// A new person.
    Person,
    /// A new object.
    Object,
    /// A routine (walk, visit).
    Routine,
}

/// Lifecycle of a path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    /// Waiting for observer review.
    Proposed,
    /// Accepted, not yet built into a day.
    Approved,
    /// Built into a day.
    Scheduled,
    /// Lived through.
    Experienced,
}

impl PathStatus {
    /// Parses a lowercase label.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "proposed" => Some(Self::Proposed),
            "approved" => Some(Self::Approved),
            "scheduled" => Some(Self::Scheduled),
            "experienced" => Some(Self::Experienced),
            _ => None,
        }
    }
}

/// Conditions under which a path may be used. Unset fields never block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UnlockRule {
    /// Earliest day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_day: Option<u32>,
    /// Highest tolerated cry level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cry: Option<f32>,
    /// Required current place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Minimum exposure count per token, e.g. `{"ball": 1}`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub min_lexicon: IndexMap<String, u32>,
}

/// Read-only signals an unlock rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct UnlockContext<'a> {
    /// Current day.
    pub day: u32,
    /// Current cry level.
    pub cry: f32,
    /// Current place.
    pub place: &'a str,
    /// Tokens heard so far.
    pub lexicon: &'a Lexicon,
}

/// A proposal under construction.
#[derive(Debug, Clone)]
pub struct PathProposal {
    kind: PathKind,
    proposal: Value,
    unlock: UnlockRule,
    priority: f32,
    novelty_cost: f32,
    notes: Vec<String>,
}

impl PathProposal {
    /// Starts a proposal with default priority .5 and novelty cost .3.
    #[must_use]
    pub fn new(kind: PathKind, proposal: Value) -> Self {
        Self {
            kind,
            proposal,
            unlock: UnlockRule::default(),
            priority: 0.5,
            novelty_cost: 0.3,
            notes: Vec::new(),
        }
    }

    /// Sets the unlock rule.
    #[must_use]
    pub fn unlock(mut self, unlock: UnlockRule) -> Self {
        self.unlock = unlock;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the novelty cost.
    #[must_use]
    pub const fn novelty_cost(mut self, cost: f32) -> Self {
        self.novelty_cost = cost;
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// A registered path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturePath {
    /// Short id.
    pub path_id: String,
    /// Kind.
    pub kind: PathKind,
    /// Free-form proposal body.
    pub proposal: Value,
    /// Unlock rule.
    pub unlock: UnlockRule,
    /// Higher first.
    pub priority: f32,
    /// How much novelty the path adds.
    pub novelty_cost: f32,
    /// Status.
    pub status: PathStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Creation order, breaks priority ties.
    pub seq: u64,
    /// Observer notes.
    pub notes: Vec<String>,
}

impl FuturePath {
    /// `proposal[key]` as a string.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.proposal.get(key).and_then(Value::as_str)
    }
}

/// Registry of future paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FuturePathRegistry {
    paths: IndexMap<String, FuturePath>,
    next_seq: u64,
}

impl FuturePathRegistry {
    /// Registers a proposal and returns its id.
    pub fn propose(&mut self, proposal: PathProposal) -> String {
        let path_id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.paths.insert(
            path_id.clone(),
            FuturePath {
                path_id: path_id.clone(),
                kind: proposal.kind,
                proposal: proposal.proposal,
                unlock: proposal.unlock,
                priority: proposal.priority,
                novelty_cost: proposal.novelty_cost,
                status: PathStatus::Proposed,
                created_at: Utc::now(),
                seq,
                notes: proposal.notes,
            },
        );
        path_id
    }

    /// Paths, optionally filtered, highest priority first then oldest first.
    #[must_use]
    pub fn list(&self, status: Option<PathStatus>) -> Vec<&FuturePath> {
        let mut items: Vec<&FuturePath> = self
            .paths
            .values()
            .filter(|path| status.is_none() || status == Some(path.status))
            .collect();
        items.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        items
    }

    /// Path by id.
    #[must_use]
    pub fn get(&self, path_id: &str) -> Option<&FuturePath> {
        self.paths.get(path_id)
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing was proposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Marks approved. False when unknown.
    pub fn approve(&mut self, path_id: &str) -> bool {
        self.set_status(path_id, PathStatus::Approved)
    }

    /// Marks scheduled. False when unknown.
    pub fn mark_scheduled(&mut self, path_id: &str) -> bool {
        self.set_status(path_id, PathStatus::Scheduled)
    }

    /// Marks experienced. False when unknown.
    pub fn mark_experienced(&mut self, path_id: &str) -> bool {
        self.set_status(path_id, PathStatus::Experienced)
    }

    fn set_status(&mut self, path_id: &str, status: PathStatus) -> bool {
        if let Some(path) = self.paths.get_mut(path_id) {
            path.status = status;
            true
        } else {
            false
        }
    }

    /// Whether every condition of the path's unlock rule holds.
    #[must_use]
    pub fn is_unlocked(path: &FuturePath, ctx: &UnlockContext<'_>) -> bool {
        let rule = &path.unlock;
        !(rule.min_day.is_some_and(|min| ctx.day < min)
            || rule.max_cry.is_some_and(|max| ctx.cry > max)
            || rule.place.as_deref().is_some_and(|place| place != ctx.place)
            || rule
                .min_lexicon
                .iter()
                .any(|(token, min)| ctx.lexicon.count(token) < *min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_orders_by_priority_then_creation() {
        let mut registry = FuturePathRegistry::default();
        let low = registry.propose(PathProposal::new(PathKind::Place, json!({"name": "pond"})).priority(0.2));
        let first = registry.propose(PathProposal::new(PathKind::Object, json!({"name": "ball"})).priority(0.8));
        let second = registry.propose(PathProposal::new(PathKind::Person, json!({"name": "Anna"})).priority(0.8));
        let ids: Vec<_> = registry.list(None).iter().map(|p| p.path_id.clone()).collect();
        assert_eq!(ids, vec![first, second, low.clone()]);
        assert_eq!(low.len(), 8);
    }

    #[test]
    fn lexicon_gate_round_trips_through_json() {
        let rule: UnlockRule =
            serde_json::from_value(json!({ "min_lexicon": { "ball": 1 }, "max_cry": 0.9 })).unwrap();
        assert_eq!(rule.min_lexicon.get("ball"), Some(&1));
        let open = serde_json::to_value(UnlockRule::default()).unwrap();
        assert_eq!(open, json!({}));
    }

    #[test]
    fn status_transitions_filter_lists() {
        let mut registry = FuturePathRegistry::default();
        let id = registry.propose(PathProposal::new(PathKind::Routine, json!({"name": "walk"})));
        assert!(registry.approve(&id));
        assert_eq!(registry.list(Some(PathStatus::Approved)).len(), 1);
        assert!(registry.mark_scheduled(&id));
        assert!(registry.list(Some(PathStatus::Approved)).is_empty());
        assert!(registry.mark_experienced(&id));
        assert_eq!(registry.get(&id).unwrap().status, PathStatus::Experienced);
        assert!(!registry.approve("missing"));
    }

    #[test]
    fn unlock_rules_check_every_condition() {
        let mut registry = FuturePathRegistry::default();
        let id = registry.propose(
            PathProposal::new(PathKind::Routine, json!({"name": "visit"})).unlock(UnlockRule {
                min_day: Some(1),
                max_cry: Some(0.7),
                place: Some("house_home".into()),
                min_lexicon: IndexMap::from([("ball".to_string(), 2), ("mum".to_string(), 1)]),
            }),
        );
        let path = registry.get(&id).unwrap();
        let mut heard = Lexicon::default();
        heard.expose("ball", 2);
        heard.expose("Mum", 1);
        let mut unrelated = Lexicon::default();
        for token in ["dog", "cat", "cup", "spoon", "ball"] {
            unrelated.expose(token, 1);
        }
        let ok = UnlockContext {
            day: 2,
            cry: 0.3,
            place: "house_home",
            lexicon: &heard,
        };
        assert!(FuturePathRegistry::is_unlocked(path, &ok));
        assert!(!FuturePathRegistry::is_unlocked(path, &UnlockContext { day: 0, ..ok }));
        assert!(!FuturePathRegistry::is_unlocked(path, &UnlockContext { cry: 0.9, ..ok }));
        assert!(!FuturePathRegistry::is_unlocked(path, &UnlockContext { place: "park", ..ok }));
        assert!(!FuturePathRegistry::is_unlocked(path, &UnlockContext { lexicon: &unrelated, ..ok }));
    }
}
