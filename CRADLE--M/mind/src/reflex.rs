//! Local body loops: stimulus -> action -> relief, learned without words.
//! These bypass the response gate entirely.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stimuli that make the infant seek help when no reflex is known.
pub const DISCOMFORT_STIMULI: [&str; 5] = ["wet", "cold", "pain", "hungry", "itch"];

/// Learned relief for one stimulus/action pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReflexRecord {
    /// Stimulus, e.g. `eye_itch`.
    pub stimulus: String,
    /// Action, e.g. `rub_eye`.
    pub action: String,
    /// Running mean relief.
    pub relief: f32,
    /// Samples in the mean.
    pub count: u32,
}

/// Reflex table plus action history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocalBody {
    /// Records keyed `stimulus::action`.
    pub reflexes: IndexMap<String, ReflexRecord>,
    /// Last enacted action.
    pub last_action: Option<String>,
    /// Every enacted action.
    pub action_history: Vec<String>,
}

impl LocalBody {
    /// Folds a relief sample into the running mean.
    pub fn record_relief(&mut self, stimulus: &str, action: &str, relief: f32) {
        self.reflexes
            .entry(format!("{stimulus}::{action}"))
            .and_modify(|record| {
                #[allow(clippy::cast_precision_loss)]
                let count = record.count as f32;
                record.relief = record.relief.mul_add(count, relief) / (count + 1.0);
                record.count += 1;
            })
            .or_insert_with(|| ReflexRecord {
                stimulus: stimulus.to_string(),
                action: action.to_string(),
                relief,
                count: 1,
            });
    }

    /// Best-known action across the active stimuli. First best wins ties.
    #[must_use]
    pub fn choose_action<S: AsRef<str>>(&self, stimuli: &[S]) -> Option<&str> {
        let mut best: (f32, Option<&str>) = (f32::NEG_INFINITY, None);
        for stimulus in stimuli {
            for record in self.reflexes.values() {
                if record.stimulus == stimulus.as_ref() && record.relief > best.0 {
                    best = (record.relief, Some(record.action.as_str()));
                }
            }
        }
        best.1
    }

    /// Performs an action.
    pub fn enact(&mut self, action: &str) {
        self.last_action = Some(action.to_string());
        self.action_history.push(action.to_string());
    }
}

/// Route taken by the router.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Learned local reflex.
    BodyReflex,
    /// Cry for a caregiver.
    SeekHelp,
    /// Nothing to do.
    None,
}

/// Outcome of routing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionDecision {
    /// Route.
    pub kind: ActionKind,
    /// Action label, if any.
    pub action: Option<String>,
    /// Reasons, in order.
    pub rationale: Vec<String>,
}

impl ActionDecision {
    fn new(kind: ActionKind, action: Option<&str>, rationale: &[&str]) -> Self {
        Self {
            kind,
            action: action.map(str::to_string),
            rationale: rationale.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

/// Picks an action when cognition cannot answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionRouter;

impl ActionRouter {
    /// Reflex first, then crying for help on discomfort, else nothing.
    #[must_use]
    pub fn decide<S: AsRef<str>>(
        self,
        body: &LocalBody,
        stimuli: &[S],
        caregiver_present: bool,
    ) -> ActionDecision {
        if let Some(action) = body.choose_action(stimuli) {
            return ActionDecision::new(ActionKind::BodyReflex, Some(action), &["local_reflex"]);
        }
        let uncomfortable = stimuli
            .iter()
            .any(|s| DISCOMFORT_STIMULI.contains(&s.as_ref()));
        if uncomfortable {
            let presence = if caregiver_present {
                "caregiver_present"
            } else {
                "caregiver_absent"
            };
            return ActionDecision::new(ActionKind::SeekHelp, Some("cry"), &["seek_help", presence]);
        }
        ActionDecision::new(ActionKind::None, None, &["no_action_needed"])
    }
}
