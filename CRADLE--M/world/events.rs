use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Agent name the sandboxed infant uses for itself in events and transactions.
pub const SELF_AGENT: &str = "self";
/// Agent name for things that simply happen.
pub const ENVIRONMENT_AGENT: &str = "Environment";

/// Kind of lived experience.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Origin event on day 0.
    Birth,
    /// Morning wake.
    Wake,
    /// Routine care (checks, holding).
    Care,
    /// Feeding.
    Feed,
    /// Nappy change.
    Change,
    /// Caregiver-led learning scene.
    Learning,
    /// Trip out of the house.
    Outing,
    /// Movement between places.
    Travel,
    /// Meeting or greeting someone.
    Social,
    /// Play with an object.
    Play,
    /// Background sensation with no actor.
    Ambient,
    /// Bedtime.
    Sleep,
}

impl EventKind {
    /// Lowercase label, matching the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Wake => "wake",
            Self::Care => "care",
            Self::Feed => "feed",
            Self::Change => "change",
            Self::Learning => "learning",
            Self::Outing => "outing",
            Self::Travel => "travel",
            Self::Social => "social",
            Self::Play => "play",
            Self::Ambient => "ambient",
            Self::Sleep => "sleep",
        }
    }
}

/// Physical movement carried by an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movement {
    /// Origin place id.
    pub from: String,
    /// Destination place id.
    pub to: String,
    /// Transport mode label (car, buggy, carried...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Body posture during the move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture: Option<String>,
}

impl Movement {
    /// Creates a movement without mode or posture.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            mode: None,
            posture: None,
        }
    }

    /// Sets the transport mode.
    #[must_use]
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }
}

/// Social exchange directed at someone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// Who the exchange is aimed at.
    pub target: String,
    /// How it went.
    #[serde(default = "default_outcome")]
    pub outcome: String,
}

fn default_outcome() -> String {
    "calm".into()
}

/// A single unit of grounded experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEvent {
    /// Day the event belongs to.
    pub day: u32,
    /// Position within the day.
    pub index: usize,
    /// What sort of experience this is.
    pub kind: EventKind,
    /// Place where it happens.
    pub place_id: String,
    /// Room within the place, if any.
    #[serde(default)]
    pub room: Option<String>,
    /// Who acts.
    #[serde(default = "default_agent")]
    pub agent: String,
    /// What the agent does.
    #[serde(default = "default_action")]
    pub action: String,
    /// Object of the action.
    #[serde(default)]
    pub object: Option<String>,
    /// People physically present.
    #[serde(default)]
    pub presence: Vec<String>,
    /// Pets physically present.
    #[serde(default)]
    pub pets: Vec<String>,
    /// Sensory channels: modality -> values. Channels carry no meaning.
    #[serde(default)]
    pub sensory: IndexMap<String, Vec<String>>,
    /// Spoken tokens, treated as raw sound patterns.
    #[serde(default)]
    pub sounds_spoken: Vec<String>,
    /// Emphasised tokens (e.g. BALL), weighted double by the lexicon.
    #[serde(default)]
    pub emphasis: Vec<String>,
    /// Bodily consequences, e.g. `hunger = reduced`.
    #[serde(default)]
    pub body_effects: IndexMap<String, String>,
    /// Observer-supplied raw tags, e.g. `affect = [joy]`.
    #[serde(default)]
    pub tags: IndexMap<String, Vec<String>>,
    /// Movement between places.
    #[serde(default)]
    pub movement: Option<Movement>,
    /// Social exchange.
    #[serde(default)]
    pub transaction: Option<Transaction>,
    /// Simulated duration in hours.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Observer note.
    #[serde(default)]
    pub note: String,
}

fn default_agent() -> String {
    ENVIRONMENT_AGENT.into()
}

fn default_action() -> String {
    "occurred".into()
}

const fn default_duration() -> f32 {
    0.5
}

impl ExperienceEvent {
    /// Creates an event at a place with defaults for everything else.
    #[must_use]
    pub fn new(day: u32, kind: EventKind, place_id: impl Into<String>) -> Self {
        Self {
            day,
            index: 0,
            kind,
            place_id: place_id.into(),
            room: None,
            agent: default_agent(),
            action: default_action(),
            object: None,
            presence: Vec::new(),
            pets: Vec::new(),
            sensory: IndexMap::new(),
            sounds_spoken: Vec::new(),
            emphasis: Vec::new(),
            body_effects: IndexMap::new(),
            tags: IndexMap::new(),
            movement: None,
            transaction: None,
            duration: default_duration(),
            note: String::new(),
        }
    }

    /// Sets the room.
    #[must_use]
    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Sets agent and action.
    #[must_use]
    pub fn actor(mut self, agent: impl Into<String>, action: impl Into<String>) -> Self {
        self.agent = agent.into();
        self.action = action.into();
        self
    }

    /// Sets the object.
    #[must_use]
    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Replaces the people present.
    #[must_use]
    pub fn presence<I, S>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.presence = people.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the pets present.
    #[must_use]
    pub fn pets<I, S>(mut self, pets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pets = pets.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one value to a sensory channel.
    #[must_use]
    pub fn sense(mut self, modality: impl Into<String>, value: impl Into<String>) -> Self {
        self.sensory
            .entry(modality.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Replaces spoken tokens.
    #[must_use]
    pub fn spoken<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sounds_spoken = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces emphasised tokens.
    #[must_use]
    pub fn emphasis<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emphasis = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a body effect.
    #[must_use]
    pub fn effect(mut self, effect: impl Into<String>, value: impl Into<String>) -> Self {
        self.body_effects.insert(effect.into(), value.into());
        self
    }

    /// Adds one value to an observer tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.entry(tag.into()).or_default().push(value.into());
        self
    }

    /// Sets the movement.
    #[must_use]
    pub fn movement(mut self, movement: Movement) -> Self {
        self.movement = Some(movement);
        self
    }

    /// Sets the transaction.
    #[must_use]
    pub fn transaction(mut self, target: impl Into<String>, outcome: impl Into<String>) -> Self {
        self.transaction = Some(Transaction {
            target: target.into(),
            outcome: outcome.into(),
        });
        self
    }

    /// Sets the duration in hours.
    #[must_use]
    pub const fn duration(mut self, hours: f32) -> Self {
        self.duration = hours;
        self
    }

    /// Sets the observer note.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Place the event ends in: the movement destination if any.
    #[must_use]
    pub fn destination(&self) -> &str {
        self.movement
            .as_ref()
            .map_or(self.place_id.as_str(), |movement| movement.to.as_str())
    }

    /// One-line observer summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let who = join_or_dash(&self.presence);
        let pets = join_or_dash(&self.pets);
        let room = self.room.as_deref().unwrap_or("-");
        let mut what = format!("{} {}", self.agent, self.action);
        if let Some(object) = &self.object {
            what.push(' ');
            what.push_str(object);
        }
        format!("{}/{room} | people={who} | pets={pets} | {what}", self.place_id)
    }
}

fn join_or_dash(names: &[String]) -> String {
    let joined = names
        .iter()
        .filter(|name| !name.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "-".into()
    } else {
        joined
    }
}

/// Objective timeline entry. Ground truth, not perception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Clock time (0..24) when it happened.
    pub time: f32,
    /// Day it happened on.
    pub day: u32,
    /// Where it happened.
    pub place: String,
    /// Free-form description.
    pub description: String,
    /// Flat tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Sensory content available to a bridge, if any.
    #[serde(default)]
    pub sensory: IndexMap<String, Vec<String>>,
}

impl WorldEvent {
    /// Creates an entry without sensory content.
    #[must_use]
    pub fn new<I, S>(time: f32, day: u32, place: impl Into<String>, description: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            time,
            day,
            place: place.into(),
            description: description.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            sensory: IndexMap::new(),
        }
    }
}
