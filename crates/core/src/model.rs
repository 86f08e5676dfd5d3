//! Model output contract.
//!
//! Every projection model produces a [`ModelResult`] with the same fixed set
//! of fields. Values may be `None` but fields are never added or omitted; the
//! struct makes that a compile-time property for in-process models, and
//! [`ModelResult::from_json`] enforces it for results read from snapshots.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ContractError;

/// Side taken against the point spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpreadPick {
    Home,
    Away,
    /// Projection sits exactly on the line.
    Push,
}

impl SpreadPick {
    /// Derives the pick from a projected home line and the market spread.
    ///
    /// The projected line is `away − home`, so a value below the market
    /// spread means the home side covers.
    #[must_use]
    pub fn from_projection(home_line_proj: Option<f64>, spread_home: Option<f64>) -> Option<Self> {
        let (proj, line) = (home_line_proj?, spread_home?);
        if proj < line {
            Some(Self::Home)
        } else if proj > line {
            Some(Self::Away)
        } else {
            Some(Self::Push)
        }
    }

    /// Returns true for HOME or AWAY.
    #[must_use]
    pub const fn is_directional(self) -> bool {
        !matches!(self, Self::Push)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Away => "AWAY",
            Self::Push => "PUSH",
        }
    }
}

/// Side taken against the game total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TotalPick {
    Over,
    Under,
    /// Projection sits exactly on the line.
    Push,
}

impl TotalPick {
    /// Derives the pick from a projected total and the market total.
    #[must_use]
    pub fn from_projection(total_proj: Option<f64>, market_total: Option<f64>) -> Option<Self> {
        let (proj, line) = (total_proj?, market_total?);
        if proj > line {
            Some(Self::Over)
        } else if proj < line {
            Some(Self::Under)
        } else {
            Some(Self::Push)
        }
    }

    /// Returns true for OVER or UNDER.
    #[must_use]
    pub const fn is_directional(self) -> bool {
        !matches!(self, Self::Push)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Over => "OVER",
            Self::Under => "UNDER",
            Self::Push => "PUSH",
        }
    }
}

/// Diagnostic values a model attaches to its result.
pub type ContextFlags = BTreeMap<String, f64>;

/// Standardized output of one model for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelResult {
    pub model_name: String,

    pub total_projection: Option<f64>,
    /// Unsigned gap used for parlay scoring.
    pub total_distance: Option<f64>,
    /// Signed `total_projection − market_total`.
    pub total_edge: Option<f64>,
    pub total_pick: Option<TotalPick>,

    /// Projected home line (`away − home`); negative favors home.
    pub home_line_proj: Option<f64>,
    /// `| |home_line_proj| − |spread_home| |`.
    pub spread_distance: Option<f64>,
    /// Signed `home_line_proj − spread_home`.
    pub spread_edge: Option<f64>,
    pub spread_pick: Option<SpreadPick>,

    /// Sum of both distances.
    pub parlay_edge_score: Option<f64>,

    pub context_flags: ContextFlags,
}

/// Field names of the model output contract, in declaration order.
pub const CONTRACT_KEYS: [&str; 11] = [
    "model_name",
    "total_projection",
    "total_distance",
    "total_edge",
    "total_pick",
    "home_line_proj",
    "spread_distance",
    "spread_edge",
    "spread_pick",
    "parlay_edge_score",
    "context_flags",
];

impl ModelResult {
    /// An all-null result carrying only the model name.
    #[must_use]
    pub fn empty(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            total_projection: None,
            total_distance: None,
            total_edge: None,
            total_pick: None,
            home_line_proj: None,
            spread_distance: None,
            spread_edge: None,
            spread_pick: None,
            parlay_edge_score: None,
            context_flags: ContextFlags::new(),
        }
    }

    /// Builds a full result from a projected margin and total against the
    /// market, deriving distances, edges, picks, and the parlay score.
    #[must_use]
    pub fn from_projections(
        model_name: impl Into<String>,
        home_line_proj: Option<f64>,
        total_projection: Option<f64>,
        spread_home: Option<f64>,
        market_total: Option<f64>,
    ) -> Self {
        let spread_distance = both(home_line_proj, spread_home, |p, l| (p.abs() - l.abs()).abs());
        let spread_edge = both(home_line_proj, spread_home, |p, l| p - l);
        let total_distance = both(total_projection, market_total, |p, l| (p - l).abs());
        let total_edge = both(total_projection, market_total, |p, l| p - l);

        let parlay_edge_score = match (spread_distance, total_distance) {
            (None, None) => None,
            (s, t) => Some(s.unwrap_or(0.0) + t.unwrap_or(0.0)),
        };

        Self {
            model_name: model_name.into(),
            total_projection,
            total_distance,
            total_edge,
            total_pick: TotalPick::from_projection(total_projection, market_total),
            home_line_proj,
            spread_distance,
            spread_edge,
            spread_pick: SpreadPick::from_projection(home_line_proj, spread_home),
            parlay_edge_score,
            context_flags: ContextFlags::new(),
        }
    }

    /// Adds a diagnostic flag.
    #[must_use]
    pub fn with_flag(mut self, key: impl Into<String>, value: f64) -> Self {
        self.context_flags.insert(key.into(), value);
        self
    }

    /// Returns true when neither projection is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_projection.is_none() && self.home_line_proj.is_none()
    }

    /// Parses a result read from a snapshot, requiring exactly the contract
    /// key set.
    ///
    /// # Errors
    /// Returns [`ContractError`] naming the game and model when keys are
    /// missing, unexpected, or carry values of the wrong shape.
    pub fn from_json(value: &serde_json::Value, game_id: &str) -> Result<Self, ContractError> {
        let model_name = value
            .get("model_name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();

        let Some(object) = value.as_object() else {
            return Err(ContractError::Malformed {
                game_id: game_id.to_string(),
                model: model_name,
                reason: "result is not an object".to_string(),
            });
        };

        let expected: BTreeSet<&str> = CONTRACT_KEYS.iter().copied().collect();
        let present: BTreeSet<&str> = object.keys().map(String::as_str).collect();

        let missing: Vec<String> = expected
            .difference(&present)
            .map(|k| (*k).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ContractError::MissingKeys {
                game_id: game_id.to_string(),
                model: model_name,
                keys: missing,
            });
        }

        let unexpected: Vec<String> = present
            .difference(&expected)
            .map(|k| (*k).to_string())
            .collect();
        if !unexpected.is_empty() {
            return Err(ContractError::UnexpectedKeys {
                game_id: game_id.to_string(),
                model: model_name,
                keys: unexpected,
            });
        }

        serde_json::from_value(value.clone()).map_err(|e| ContractError::Malformed {
            game_id: game_id.to_string(),
            model: model_name,
            reason: e.to_string(),
        })
    }
}

fn both(a: Option<f64>, b: Option<f64>, f: impl Fn(f64, f64) -> f64) -> Option<f64> {
    Some(f(a?, b?))
}
