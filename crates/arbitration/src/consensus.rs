//! Cross-model consensus per wager type.
//!
//! Each model with a directional pick and a known edge casts one vote. The
//! majority side sets `directional_pct`; every vote's edge magnitude counts
//! toward `weighted_score`, whichever side it backs.

use serde::{Deserialize, Serialize};

use bookiex_core::{round_to, ArbitrationThresholds, ModelResults, SpreadPick, TotalPick};

/// Consensus strength band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArbitrationTier {
    High,
    Medium,
    Low,
}

impl ArbitrationTier {
    /// Classifies a tier score against inclusive lower bounds.
    #[must_use]
    pub fn from_score(tier_score: f64, thresholds: &ArbitrationThresholds) -> Self {
        if tier_score >= thresholds.high_threshold {
            Self::High
        } else if tier_score >= thresholds.medium_threshold {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "Strong Conviction Consensus",
            Self::Medium => "Moderate Agreement",
            Self::Low => "Weak Consensus Edge",
        }
    }
}

/// Consensus over one wager type. `P` is the pick type voted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrationResult<P> {
    pub majority_pick: P,
    /// Models voting; the denominator of `directional_pct`.
    pub voters: usize,
    pub directional_pct: f64,
    pub weighted_score: f64,
    pub tier_score: f64,
    pub tier_level: ArbitrationTier,
    pub tier_label: String,
    pub disagreement_flag: bool,
}

/// Spread and total consensus for one game; a side is `None` when no model
/// voted on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrationPair {
    pub spread: Option<ArbitrationResult<SpreadPick>>,
    pub total: Option<ArbitrationResult<TotalPick>>,
}

/// Computes both consensus sides for one game's results.
#[must_use]
pub fn arbitrate(results: &ModelResults, thresholds: &ArbitrationThresholds) -> ArbitrationPair {
    let spread_votes: Vec<(SpreadPick, f64)> = results
        .iter()
        .filter_map(|r| match (r.spread_pick, r.spread_edge) {
            (Some(pick), Some(edge)) if pick.is_directional() => Some((pick, edge.abs())),
            _ => None,
        })
        .collect();

    let total_votes: Vec<(TotalPick, f64)> = results
        .iter()
        .filter_map(|r| match (r.total_pick, r.total_edge) {
            (Some(pick), Some(edge)) if pick.is_directional() => Some((pick, edge.abs())),
            _ => None,
        })
        .collect();

    ArbitrationPair {
        spread: tally(&spread_votes, thresholds),
        total: tally(&total_votes, thresholds),
    }
}

/// Reduces votes, in run order, to a consensus result.
///
/// The majority is the most frequent pick; on a tie the pick seen first
/// wins. Values are rounded to three places after the tier is assigned.
#[must_use]
pub fn tally<P: Copy + PartialEq>(
    votes: &[(P, f64)],
    thresholds: &ArbitrationThresholds,
) -> Option<ArbitrationResult<P>> {
    let mut counts: Vec<(P, usize)> = Vec::new();
    for (pick, _) in votes {
        match counts.iter_mut().find(|(p, _)| p == pick) {
            Some((_, count)) => *count += 1,
            None => counts.push((*pick, 1)),
        }
    }

    // Strict comparison keeps the earliest pick on ties.
    let (majority_pick, majority_count) = counts
        .iter()
        .copied()
        .fold(None, |best: Option<(P, usize)>, (pick, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((pick, count)),
        })?;

    let voters = votes.len();
    #[allow(clippy::cast_precision_loss)]
    let directional_pct = majority_count as f64 / voters as f64;
    let weighted_score: f64 = votes.iter().map(|(_, edge)| edge).sum();
    let tier_score = directional_pct * weighted_score;
    let tier = ArbitrationTier::from_score(tier_score, thresholds);

    Some(ArbitrationResult {
        majority_pick,
        voters,
        directional_pct: round_to(directional_pct, 3),
        weighted_score: round_to(weighted_score, 3),
        tier_score: round_to(tier_score, 3),
        tier_level: tier,
        tier_label: tier.label().to_string(),
        disagreement_flag: directional_pct < 1.0,
    })
}
