//! Confidence classification over spread edges.
//!
//! Separates one baseline model from a secondary cluster. The cluster is
//! aligned when every non-zero cluster edge points the same way; the tier
//! then depends on alignment and on the largest edge magnitude seen.

use serde::{Deserialize, Serialize};

use bookiex_core::{ConfidenceConfig, ModelResults};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceTier {
    Ignore,
    Low,
    Moderate,
    High,
}

impl ConfidenceTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

/// Which models back the game's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    /// The cluster agrees on a direction.
    ClusterA,
    /// Only the baseline has a direction.
    BaselineOnly,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceClassification {
    pub tier: ConfidenceTier,
    pub alignment: Alignment,
    pub disagreement_flag: bool,
    /// Edge later used to name the primary model source.
    pub reference_edge: Option<f64>,
}

/// Sign of an optional edge; zero for zero or missing.
#[must_use]
pub fn sign(edge: Option<f64>) -> i8 {
    match edge {
        Some(x) if x > 0.0 => 1,
        Some(x) if x < 0.0 => -1,
        _ => 0,
    }
}

/// Classifies one game from its model results.
///
/// Models named in `config` but absent from `results` count as having no
/// edge.
#[must_use]
pub fn classify(results: &ModelResults, config: &ConfidenceConfig) -> ConfidenceClassification {
    let baseline = results
        .get(&config.baseline_model)
        .and_then(|r| r.spread_edge);
    let cluster: Vec<Option<f64>> = config
        .cluster_models
        .iter()
        .map(|name| results.get(name).and_then(|r| r.spread_edge))
        .collect();

    let baseline_sign = sign(baseline);

    let mut cluster_signs: Vec<i8> = cluster.iter().map(|e| sign(*e)).filter(|s| *s != 0).collect();
    cluster_signs.sort_unstable();
    cluster_signs.dedup();
    let cluster_aligned = cluster_signs.len() == 1;
    let cluster_direction = if cluster_aligned { cluster_signs[0] } else { 0 };

    let disagreement_flag =
        baseline_sign != 0 && cluster_direction != 0 && baseline_sign != cluster_direction;

    let present: Vec<f64> = std::iter::once(baseline)
        .chain(cluster.iter().copied())
        .flatten()
        .collect();
    let magnitude = present.iter().map(|e| e.abs()).fold(0.0, f64::max);

    let reference_edge = if present.is_empty() {
        None
    } else {
        cluster
            .iter()
            .flatten()
            .find(|e| e.abs() == magnitude)
            .copied()
            .or_else(|| baseline.filter(|e| e.abs() == magnitude))
            // No edge matched the magnitude: keep the baseline edge regardless.
            .or(baseline)
    };

    let tier = if magnitude < config.ignore_below {
        ConfidenceTier::Ignore
    } else if cluster_aligned && magnitude >= config.high_at {
        ConfidenceTier::High
    } else if cluster_aligned {
        ConfidenceTier::Moderate
    } else {
        ConfidenceTier::Low
    };

    let alignment = if cluster_aligned && cluster_direction != 0 {
        Alignment::ClusterA
    } else if baseline_sign != 0 {
        Alignment::BaselineOnly
    } else {
        Alignment::None
    };

    ConfidenceClassification {
        tier,
        alignment,
        disagreement_flag,
        reference_edge,
    }
}
