use serde::{Deserialize, Serialize};

/// What the gate allows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Stable and strong enough to answer.
    Answer,
    /// Cannot answer, but acting may resolve it.
    Action,
    /// Cannot answer and cannot act on it.
    KnownUnknown,
}

/// Gate verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateResult {
    /// Whether a response is permitted.
    pub permitted: bool,
    /// Resulting state.
    pub state: GateState,
    /// Stability evaluated.
    pub z: f32,
    /// Signal evaluated.
    pub sigma: f32,
    /// Reasons, in evaluation order.
    pub reasons: Vec<String>,
}

/// Permits a response only when stability (z) and signal (sigma) both
/// clear their thresholds. Creates no meaning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResponseGate {
    /// Minimum stability.
    pub z_threshold: f32,
    /// Minimum signal.
    pub sigma_threshold: f32,
}

impl Default for ResponseGate {
    fn default() -> Self {
        Self {
            z_threshold: 0.65,
            sigma_threshold: 0.35,
        }
    }
}

impl ResponseGate {
    /// Evaluates one question.
    #[must_use]
    pub fn evaluate(
        &self,
        stability: f32,
        signal: f32,
        has_anchor: bool,
        resolvable_by_action: bool,
    ) -> GateResult {
        let (z, sigma) = (stability, signal);
        if z >= self.z_threshold && sigma >= self.sigma_threshold {
            return GateResult {
                permitted: true,
                state: GateState::Answer,
                z,
                sigma,
                reasons: vec!["gate_pass".into()],
            };
        }

        let mut reasons = Vec::new();
        if !has_anchor {
            reasons.push("no_anchor".to_string());
        }
        if z < self.z_threshold {
            reasons.push("low_stability".into());
        }
        if sigma < self.sigma_threshold {
            reasons.push("low_signal".into());
        }
        let state = if resolvable_by_action {
            reasons.push("resolvable_by_action".into());
            GateState::Action
        } else {
            reasons.push("not_resolvable".into());
            GateState::KnownUnknown
        };
        GateResult {
            permitted: false,
            state,
            z,
            sigma,
            reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_both_thresholds_clear() {
        let result = ResponseGate::default().evaluate(0.65, 0.35, false, false);
        assert!(result.permitted);
        assert_eq!(result.state, GateState::Answer);
        assert_eq!(result.reasons, vec!["gate_pass"]);
    }

    #[test]
    fn reasons_follow_evaluation_order() {
        let gate = ResponseGate::default();
        let result = gate.evaluate(0.1, 0.1, false, true);
        assert_eq!(result.state, GateState::Action);
        assert_eq!(
            result.reasons,
            vec!["no_anchor", "low_stability", "low_signal", "resolvable_by_action"]
        );

        let result = gate.evaluate(0.9, 0.2, true, false);
        assert_eq!(result.state, GateState::KnownUnknown);
        assert_eq!(result.reasons, vec!["low_signal", "not_resolvable"]);
    }
}
