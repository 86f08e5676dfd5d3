//! Per-game decision records.
//!
//! The selection authority's picks become the game's picks. Arbitration and
//! confidence describe how the other models line up behind them; the gate
//! says whether the game is actionable.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bookiex_core::game::points;
use bookiex_core::{
    AppConfig, ArbitrationThresholds, ConfidenceConfig, DecisionConfig, GameRecord,
    GateThresholds, MarketLines, ModelResult, ModelResults, OddsSource, SpreadPick, TotalPick,
};

use crate::confidence::{classify, Alignment, ConfidenceClassification};
use crate::consensus::{arbitrate, ArbitrationPair};
use crate::gate::ActionabilityDecision;

/// Where a game's directional conviction comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimarySource {
    ClusterA,
    Baseline,
    None,
}

/// Values the explanation was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionFactors {
    pub model_name: String,
    pub spread_edge: Option<f64>,
    pub total_edge: Option<f64>,
    pub projected_margin: Option<f64>,
    pub projected_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionExplanation {
    pub text: String,
    pub factors: DecisionFactors,
}

/// Finalized view of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub game_id: String,
    pub game_date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,

    pub odds_source: OddsSource,
    pub spread_home: Option<f64>,
    pub spread_away: Option<f64>,
    pub total: Option<f64>,
    pub moneyline_home: Option<f64>,
    pub moneyline_away: Option<f64>,

    pub selection_authority: String,
    pub spread_pick: Option<SpreadPick>,
    pub spread_edge: Option<f64>,
    pub total_pick: Option<TotalPick>,
    pub total_edge: Option<f64>,
    pub parlay_edge_score: Option<f64>,
    pub home_line_proj: Option<f64>,
    pub total_projection: Option<f64>,

    pub arbitration: ArbitrationPair,
    pub confidence: ConfidenceClassification,
    pub actionability: ActionabilityDecision,
    pub primary_model_source: PrimarySource,
    pub explanation: Option<DecisionExplanation>,

    pub models: ModelResults,

    #[serde(default, deserialize_with = "points::deserialize_option")]
    pub home_points: Option<i32>,
    #[serde(default, deserialize_with = "points::deserialize_option")]
    pub away_points: Option<i32>,
}

impl DecisionRecord {
    /// Market lines the decision was made against.
    #[must_use]
    pub fn lines(&self) -> MarketLines {
        MarketLines {
            spread_home: self.spread_home,
            spread_away: self.spread_away,
            total: self.total,
            moneyline_home: self.moneyline_home,
            moneyline_away: self.moneyline_away,
        }
    }

    /// The authority's result, when it ran.
    #[must_use]
    pub fn authority(&self) -> Option<&ModelResult> {
        self.models.get(&self.selection_authority)
    }
}

/// Builds decision records from model results.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    odds_source: OddsSource,
    arbitration: ArbitrationThresholds,
    confidence: ConfidenceConfig,
    gate: GateThresholds,
    decision: DecisionConfig,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            odds_source: config.models.odds_source,
            arbitration: config.arbitration,
            confidence: config.confidence.clone(),
            gate: config.gate,
            decision: config.decision.clone(),
        }
    }

    /// Builds the record for one game.
    #[must_use]
    pub fn decide(&self, game: &GameRecord, models: ModelResults) -> DecisionRecord {
        let lines = game.lines(self.odds_source);
        let authority_name = self.decision.selection_authority.clone();
        let authority = models.get(&authority_name);

        if authority.is_none() {
            tracing::warn!(
                game_id = %game.game_id,
                authority = %authority_name,
                "Selection authority missing from model results"
            );
        }

        let arbitration = arbitrate(&models, &self.arbitration);
        let confidence = classify(&models, &self.confidence);
        let actionability = ActionabilityDecision::evaluate(authority, &self.gate);
        let primary_model_source = self.primary_source(&models, &confidence);
        let explanation = authority.and_then(|a| explain(game, &lines, a));

        tracing::debug!(
            game_id = %game.game_id,
            actionability = actionability.state.as_str(),
            tier = ?confidence.tier,
            alignment = ?confidence.alignment,
            "Decision built"
        );

        DecisionRecord {
            game_id: game.game_id.clone(),
            game_date: game.game_date,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            odds_source: self.odds_source,
            spread_home: lines.spread_home,
            spread_away: lines.spread_away,
            total: lines.total,
            moneyline_home: lines.moneyline_home,
            moneyline_away: lines.moneyline_away,
            spread_pick: authority.and_then(|a| a.spread_pick),
            spread_edge: authority.and_then(|a| a.spread_edge),
            total_pick: authority.and_then(|a| a.total_pick),
            total_edge: authority.and_then(|a| a.total_edge),
            parlay_edge_score: authority.and_then(|a| a.parlay_edge_score),
            home_line_proj: authority.and_then(|a| a.home_line_proj),
            total_projection: authority.and_then(|a| a.total_projection),
            selection_authority: authority_name,
            arbitration,
            confidence,
            actionability,
            primary_model_source,
            explanation,
            models,
            home_points: game.home_points,
            away_points: game.away_points,
        }
    }

    /// Names the primary model source: the cluster when it is aligned with a
    /// large enough reference edge, else the baseline on its own edge.
    #[must_use]
    pub fn primary_source(
        &self,
        models: &ModelResults,
        confidence: &ConfidenceClassification,
    ) -> PrimarySource {
        let min_edge = self.decision.primary_source_min_edge;

        if confidence.alignment == Alignment::ClusterA
            && confidence.reference_edge.is_some_and(|e| e.abs() >= min_edge)
        {
            return PrimarySource::ClusterA;
        }

        let baseline_edge = models
            .get(&self.confidence.baseline_model)
            .and_then(|r| r.spread_edge);
        if baseline_edge.is_some_and(|e| e.abs() >= min_edge) {
            return PrimarySource::Baseline;
        }

        PrimarySource::None
    }
}

/// Human-readable account of the authority's picks; `None` without a pick.
#[must_use]
pub fn explain(
    game: &GameRecord,
    lines: &MarketLines,
    authority: &ModelResult,
) -> Option<DecisionExplanation> {
    if authority.spread_pick.is_none() && authority.total_pick.is_none() {
        return None;
    }

    let mut text = String::new();
    let _ = writeln!(text, "Game: {} @ {}", game.away_team, game.home_team);
    let _ = writeln!(text, "Authority: {}", authority.model_name);
    let _ = writeln!(
        text,
        "Market: Spread {} / {}, Total {}",
        show(lines.spread_home),
        show(lines.spread_away),
        show(lines.total)
    );
    let _ = write!(
        text,
        "Model Projection: Margin {}, Total {}",
        show(authority.home_line_proj),
        show(authority.total_projection)
    );
    if let Some(pick) = authority.spread_pick {
        let _ = write!(
            text,
            "\nSpread Pick: {} (edge {})",
            pick.as_str(),
            show(authority.spread_edge)
        );
    }
    if let Some(pick) = authority.total_pick {
        let _ = write!(
            text,
            "\nTotal Pick: {} (edge {})",
            pick.as_str(),
            show(authority.total_edge)
        );
    }

    Some(DecisionExplanation {
        text,
        factors: DecisionFactors {
            model_name: authority.model_name.clone(),
            spread_edge: authority.spread_edge,
            total_edge: authority.total_edge,
            projected_margin: authority.home_line_proj,
            projected_total: authority.total_projection,
        },
    })
}

fn show(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}
