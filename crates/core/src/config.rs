use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::OddsSource;

/// Built-in projection models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Baseline,
    Fatigue,
    Injury,
    Noise,
    MarketBlend,
}

impl ModelKind {
    /// Name results are registered under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Fatigue => "fatigue",
            Self::Injury => "injury",
            Self::Noise => "noise",
            Self::MarketBlend => "market_blend",
        }
    }

    /// Model this one adjusts, if any.
    #[must_use]
    pub const fn baseline(self) -> Option<Self> {
        match self {
            Self::Baseline => None,
            Self::Fatigue | Self::Injury | Self::Noise | Self::MarketBlend => Some(Self::Baseline),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelsConfig,
    pub arbitration: ArbitrationThresholds,
    pub confidence: ConfidenceConfig,
    pub gate: GateThresholds,
    pub decision: DecisionConfig,
    pub calibration: CalibrationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Run order; models reading a baseline must come after it.
    pub order: Vec<ModelKind>,
    pub odds_source: OddsSource,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            order: vec![
                ModelKind::Baseline,
                ModelKind::Fatigue,
                ModelKind::Injury,
                ModelKind::Noise,
            ],
            odds_source: OddsSource::Last,
        }
    }
}

/// Inclusive lower bounds on arbitration tier score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrationThresholds {
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

impl Default for ArbitrationThresholds {
    fn default() -> Self {
        Self {
            high_threshold: 200.0,
            medium_threshold: 75.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub baseline_model: String,
    /// Secondary cluster; earlier entries win reference-edge ties.
    pub cluster_models: Vec<String>,
    /// Magnitudes below this are IGNORE.
    pub ignore_below: f64,
    /// Aligned magnitudes at or above this are HIGH.
    pub high_at: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            baseline_model: ModelKind::Baseline.name().to_string(),
            cluster_models: vec![
                ModelKind::Fatigue.name().to_string(),
                ModelKind::Injury.name().to_string(),
            ],
            ignore_below: 2.0,
            high_at: 4.0,
        }
    }
}

/// Actionability policy. Edges are compared by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateThresholds {
    pub min_spread_edge: f64,
    pub min_total_edge: f64,
    pub min_parlay_edge: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_spread_edge: 1.0,
            min_total_edge: 3.0,
            min_parlay_edge: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Model whose picks become the game's picks.
    pub selection_authority: String,
    /// Minimum |spread edge| for a model source to be named primary.
    pub primary_source_min_edge: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            selection_authority: ModelKind::Baseline.name().to_string(),
            primary_source_min_edge: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Upper bounds of the edge-magnitude buckets; a final open bucket follows.
    pub bucket_bounds: Vec<f64>,
    pub percentiles: Vec<f64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            bucket_bounds: vec![1.0, 2.0, 4.0, 8.0],
            percentiles: vec![10.0, 25.0, 50.0, 75.0, 90.0],
        }
    }
}

impl AppConfig {
    /// Checks cross-field invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let order = &self.models.order;
        if order.is_empty() {
            return Err(ConfigError::EmptyModelOrder);
        }

        for (idx, kind) in order.iter().enumerate() {
            if order[..idx].contains(kind) {
                return Err(ConfigError::DuplicateModel(kind.name().to_string()));
            }
            if let Some(baseline) = kind.baseline() {
                if !order[..idx].contains(&baseline) {
                    return Err(ConfigError::DependencyOrder {
                        model: kind.name().to_string(),
                        baseline: baseline.name().to_string(),
                    });
                }
            }
        }

        let named = [
            ("confidence.baseline_model", &self.confidence.baseline_model),
            ("decision.selection_authority", &self.decision.selection_authority),
        ]
        .into_iter()
        .chain(
            self.confidence
                .cluster_models
                .iter()
                .map(|name| ("confidence.cluster_models", name)),
        );
        for (field, name) in named {
            if !order.iter().any(|kind| kind.name() == name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("model '{name}' is not in models.order"),
                });
            }
        }

        if self.arbitration.medium_threshold > self.arbitration.high_threshold {
            return Err(ConfigError::InvalidValue {
                field: "arbitration.medium_threshold",
                reason: format!(
                    "{} exceeds high_threshold {}",
                    self.arbitration.medium_threshold, self.arbitration.high_threshold
                ),
            });
        }

        if self.confidence.ignore_below > self.confidence.high_at {
            return Err(ConfigError::InvalidValue {
                field: "confidence.ignore_below",
                reason: format!(
                    "{} exceeds high_at {}",
                    self.confidence.ignore_below, self.confidence.high_at
                ),
            });
        }

        let bounds = &self.calibration.bucket_bounds;
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidValue {
                field: "calibration.bucket_bounds",
                reason: "bounds must be strictly increasing".to_string(),
            });
        }

        if let Some(p) = self
            .calibration
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(ConfigError::InvalidValue {
                field: "calibration.percentiles",
                reason: format!("{p} is outside [0, 100]"),
            });
        }

        Ok(())
    }
}
