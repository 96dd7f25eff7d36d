use serde::{Deserialize, Serialize};

/// Kind of day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Day 0.
    Birth,
    /// Every later day.
    Normal,
}

/// Phase within a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    /// Waiting for wake to be authorised.
    Wake,
    /// Events are flowing.
    Active,
    /// Consolidating.
    Sleep,
}

/// Day counter and phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCycle {
    /// Current day.
    pub day_index: u32,
    /// Birth or normal.
    pub day_type: DayType,
    /// Phase.
    pub phase: DayPhase,
    /// Whether birth began.
    pub birthed: bool,
}

impl Default for DayCycle {
    fn default() -> Self {
        Self {
            day_index: 0,
            day_type: DayType::Birth,
            phase: DayPhase::Wake,
            birthed: false,
        }
    }
}

impl DayCycle {
    /// Whether today is the birth day.
    #[must_use]
    pub fn is_birth_day(&self) -> bool {
        self.day_type == DayType::Birth
    }

    /// Starts day 0, already active.
    pub fn begin_birth(&mut self) {
        self.birthed = true;
        self.day_index = 0;
        self.day_type = DayType::Birth;
        self.phase = DayPhase::Active;
    }

    /// Moves to the next normal day, waiting to wake.
    pub fn begin_new_day(&mut self) {
        self.day_index += 1;
        self.day_type = DayType::Normal;
        self.phase = DayPhase::Wake;
    }

    /// Wake authorised.
    pub fn wake(&mut self) {
        self.phase = DayPhase::Active;
    }

    /// Sleep started.
    pub fn sleep(&mut self) {
        self.phase = DayPhase::Sleep;
    }

    /// Called once consolidation finishes. The birth day and normal days
    /// both roll into a new normal day.
    pub fn advance_after_sleep(&mut self) {
        self.begin_new_day();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_day_rolls_into_normal_days() {
        let mut cycle = DayCycle::default();
        assert!(cycle.is_birth_day());
        cycle.begin_birth();
        assert_eq!(cycle.phase, DayPhase::Active);
        cycle.sleep();
        cycle.advance_after_sleep();
        assert_eq!(cycle.day_index, 1);
        assert_eq!(cycle.day_type, DayType::Normal);
        assert_eq!(cycle.phase, DayPhase::Wake);
        cycle.wake();
        cycle.sleep();
        cycle.advance_after_sleep();
        assert_eq!(cycle.day_index, 2);
        assert!(cycle.birthed);
    }
}
