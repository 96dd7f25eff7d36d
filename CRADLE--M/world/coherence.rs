//! Coherence check: does an event only reference things the world allows?

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    events::{ExperienceEvent, ENVIRONMENT_AGENT, SELF_AGENT},
    model::WorldState,
};

/// Score penalty per issue.
const ISSUE_PENALTY: f32 = 0.2;

/// A single problem found in an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "issue", content = "value", rename_all = "snake_case")]
pub enum CoherenceIssue {
    /// Place id not in the world.
    UnknownPlace(String),
    /// Room not part of a place that declares rooms.
    UnknownRoom(String),
    /// Acting agent is neither self, environment, person, animal nor bot.
    UnknownAgent(String),
    /// Movement destination not in the world.
    UnknownDestination(String),
    /// Object not in any profile. Flagged, tolerated as a raw token.
    FloatingToken(String),
}

impl fmt::Display for CoherenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, value) = match self {
            Self::UnknownPlace(v) => ("unknown_place", v),
            Self::UnknownRoom(v) => ("unknown_room", v),
            Self::UnknownAgent(v) => ("unknown_agent", v),
            Self::UnknownDestination(v) => ("unknown_destination", v),
            Self::FloatingToken(v) => ("floating_token", v),
        };
        write!(f, "{kind}:{value}")
    }
}

impl CoherenceIssue {
    /// Unknown places, agents and destinations block regardless of score.
    #[must_use]
    pub const fn is_hard(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlace(_) | Self::UnknownAgent(_) | Self::UnknownDestination(_)
        )
    }
}

/// Result of a coherence check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoherenceReport {
    /// 1.0 when clean, minus 0.2 per issue, floored at 0. Rounded to 2dp.
    pub score: f32,
    /// Issues in discovery order.
    pub issues: Vec<CoherenceIssue>,
}

impl CoherenceReport {
    fn from_issues(issues: Vec<CoherenceIssue>) -> Self {
        let raw = if issues.is_empty() {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let penalty = ISSUE_PENALTY * issues.len() as f32;
            (1.0 - penalty).max(0.0)
        };
        Self {
            score: (raw * 100.0).round() / 100.0,
            issues,
        }
    }

    /// True when the event should be rejected: the score fell to
    /// `threshold`, or any issue is hard.
    #[must_use]
    pub fn is_blocking(&self, threshold: f32) -> bool {
        self.score <= threshold || self.issues.iter().any(CoherenceIssue::is_hard)
    }

    /// True when nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues rendered as `kind:value` strings.
    #[must_use]
    pub fn issue_labels(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

fn agent_is_known(world: &WorldState, agent: &str) -> bool {
    agent == SELF_AGENT
        || agent == ENVIRONMENT_AGENT
        || world.profiles.knows_agent(agent)
        || world.bots.contains_key(agent)
}

/// Checks an event against the world's places, rooms and profiles.
#[must_use]
pub fn check(world: &WorldState, event: &ExperienceEvent) -> CoherenceReport {
    let mut issues = Vec::new();

    match world.places.get(&event.place_id) {
        None => issues.push(CoherenceIssue::UnknownPlace(event.place_id.clone())),
        Some(place) => {
            if let Some(room) = &event.room {
                if !place.rooms.is_empty() && !place.has_room(room) {
                    issues.push(CoherenceIssue::UnknownRoom(room.clone()));
                }
            }
        }
    }

    if !agent_is_known(world, &event.agent) {
        issues.push(CoherenceIssue::UnknownAgent(event.agent.clone()));
    }

    if let Some(movement) = &event.movement {
        if !world.has_place(&movement.to) {
            issues.push(CoherenceIssue::UnknownDestination(movement.to.clone()));
        }
    }

    if let Some(object) = event.object.as_deref().filter(|o| !o.is_empty()) {
        if object != SELF_AGENT && !world.profiles.knows_object(object) {
            issues.push(CoherenceIssue::FloatingToken(object.to_string()));
        }
    }

    CoherenceReport::from_issues(issues)
}
