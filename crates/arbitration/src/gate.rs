//! Actionability gate.
//!
//! Decides whether the authority model's signal clears the thresholds for
//! execution, is informational only, or is absent.

use serde::{Deserialize, Serialize};

use bookiex_core::{GateThresholds, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Actionability {
    Action,
    Info,
    None,
}

impl Actionability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Info => "INFO",
            Self::None => "NONE",
        }
    }
}

pub const REASON_NO_SIGNAL: &str = "No model signal";
pub const REASON_EDGE: &str = "Edge exceeds minimum threshold";
pub const REASON_PARLAY: &str = "Combined parlay edge exceeds threshold";
pub const REASON_BELOW: &str = "Signal present but edge below threshold";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionabilityDecision {
    pub state: Actionability,
    pub reason: String,
}

impl ActionabilityDecision {
    fn new(state: Actionability, reason: &str) -> Self {
        Self {
            state,
            reason: reason.to_string(),
        }
    }

    /// Gates a model's signal. `None` means the authority produced no result.
    ///
    /// Any pick, PUSH included, counts as a signal. Edges are compared by
    /// magnitude; the parlay score is compared as is.
    #[must_use]
    pub fn evaluate(authority: Option<&ModelResult>, thresholds: &GateThresholds) -> Self {
        let Some(result) = authority else {
            return Self::new(Actionability::None, REASON_NO_SIGNAL);
        };

        if result.spread_pick.is_none() && result.total_pick.is_none() {
            return Self::new(Actionability::None, REASON_NO_SIGNAL);
        }

        let actionable_spread = result.spread_pick.is_some()
            && result
                .spread_edge
                .is_some_and(|e| e.abs() >= thresholds.min_spread_edge);
        let actionable_total = result.total_pick.is_some()
            && result
                .total_edge
                .is_some_and(|e| e.abs() >= thresholds.min_total_edge);

        if actionable_spread || actionable_total {
            return Self::new(Actionability::Action, REASON_EDGE);
        }

        if result
            .parlay_edge_score
            .is_some_and(|p| p >= thresholds.min_parlay_edge)
        {
            return Self::new(Actionability::Action, REASON_PARLAY);
        }

        Self::new(Actionability::Info, REASON_BELOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookiex_core::{SpreadPick, TotalPick};

    fn signal(
        spread: Option<(SpreadPick, f64)>,
        total: Option<(TotalPick, f64)>,
        parlay: Option<f64>,
    ) -> ModelResult {
        let mut result = ModelResult::empty("baseline");
        result.spread_pick = spread.map(|(p, _)| p);
        result.spread_edge = spread.map(|(_, e)| e);
        result.total_pick = total.map(|(p, _)| p);
        result.total_edge = total.map(|(_, e)| e);
        result.parlay_edge_score = parlay;
        result
    }

    fn gate(result: &ModelResult) -> ActionabilityDecision {
        ActionabilityDecision::evaluate(Some(result), &GateThresholds::default())
    }

    #[test]
    fn no_picks_is_none() {
        let d = gate(&signal(None, None, Some(10.0)));
        assert_eq!(d.state, Actionability::None);
        assert_eq!(d.reason, REASON_NO_SIGNAL);
    }

    #[test]
    fn missing_authority_is_none() {
        let d = ActionabilityDecision::evaluate(None, &GateThresholds::default());
        assert_eq!(d.state, Actionability::None);
    }

    #[test]
    fn small_spread_edge_is_info() {
        let d = gate(&signal(Some((SpreadPick::Away, 0.5)), None, Some(0.5)));
        assert_eq!(d.state, Actionability::Info);
        assert_eq!(d.reason, REASON_BELOW);
    }

    #[test]
    fn negative_spread_edge_compared_by_magnitude() {
        let d = gate(&signal(Some((SpreadPick::Home, -1.0)), None, None));
        assert_eq!(d.state, Actionability::Action);
        assert_eq!(d.reason, REASON_EDGE);
    }

    #[test]
    fn total_edge_threshold() {
        let below = gate(&signal(None, Some((TotalPick::Under, -2.9)), None));
        assert_eq!(below.state, Actionability::Info);

        let at = gate(&signal(None, Some((TotalPick::Under, -3.0)), None));
        assert_eq!(at.state, Actionability::Action);
    }

    #[test]
    fn parlay_score_rescues_small_edges() {
        let d = gate(&signal(
            Some((SpreadPick::Away, 0.8)),
            Some((TotalPick::Over, 2.5)),
            Some(4.0),
        ));
        assert_eq!(d.state, Actionability::Action);
        assert_eq!(d.reason, REASON_PARLAY);
    }

    #[test]
    fn push_pick_counts_as_signal() {
        let d = gate(&signal(Some((SpreadPick::Push, 0.0)), None, Some(0.0)));
        assert_eq!(d.state, Actionability::Info);
    }

    #[test]
    fn thresholds_are_configurable() {
        let strict = GateThresholds {
            min_spread_edge: 5.0,
            ..GateThresholds::default()
        };
        let d = ActionabilityDecision::evaluate(
            Some(&signal(Some((SpreadPick::Home, -2.0)), None, None)),
            &strict,
        );
        assert_eq!(d.state, Actionability::Info);
    }
}
