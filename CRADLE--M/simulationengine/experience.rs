use serde::{Deserialize, Serialize};

/// Coarse life phase, observer side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LifePhase {
    /// Before day 0 begins.
    #[default]
    PreBirth,
    /// Birth events.
    Birth,
    /// Hospital stay after birth.
    Hospital,
    /// Travelling home.
    JourneyHome,
    /// Ordinary waking day.
    HomeDay,
    /// Asleep.
    Sleep,
}

impl LifePhase {
    /// Next phase; `Sleep` stays `Sleep`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::PreBirth => Self::Birth,
            Self::Birth => Self::Hospital,
            Self::Hospital => Self::JourneyHome,
            Self::JourneyHome => Self::HomeDay,
            Self::HomeDay | Self::Sleep => Self::Sleep,
        }
    }

    /// Snake-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreBirth => "pre_birth",
            Self::Birth => "birth",
            Self::Hospital => "hospital",
            Self::JourneyHome => "journey_home",
            Self::HomeDay => "home_day",
            Self::Sleep => "sleep",
        }
    }
}

/// Tracks the current life phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseController {
    phase: LifePhase,
}

impl PhaseController {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> LifePhase {
        self.phase
    }

    /// Steps forward one phase.
    pub fn advance(&mut self) -> LifePhase {
        self.phase = self.phase.next();
        self.phase
    }

    /// Jumps forward to `target`. Never goes back, except that a new day
    /// resumes from sleep (see [`Self::resume_day`]).
    pub fn advance_to(&mut self, target: LifePhase) -> LifePhase {
        if target > self.phase {
            self.phase = target;
        }
        self.phase
    }

    /// Sleep hands over to the next home day.
    pub fn resume_day(&mut self) {
        if self.phase == LifePhase::Sleep {
            self.phase = LifePhase::HomeDay;
        }
    }

    /// Whether the current phase is `phase`.
    #[must_use]
    pub fn is_phase(&self, phase: LifePhase) -> bool {
        self.phase == phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_saturates_at_sleep() {
        let mut phases = PhaseController::default();
        let mut seen = vec![phases.phase().label()];
        for _ in 0..7 {
            seen.push(phases.advance().label());
        }
        assert_eq!(
            &seen[..6],
            ["pre_birth", "birth", "hospital", "journey_home", "home_day", "sleep"]
        );
        assert!(phases.is_phase(LifePhase::Sleep));
    }

    #[test]
    fn advance_to_is_forward_only_until_a_new_day() {
        let mut phases = PhaseController::default();
        phases.advance_to(LifePhase::JourneyHome);
        assert_eq!(phases.advance_to(LifePhase::Birth), LifePhase::JourneyHome);
        phases.advance_to(LifePhase::Sleep);
        phases.resume_day();
        assert!(phases.is_phase(LifePhase::HomeDay));
    }
}
