//! Grades a set of decision records.
//!
//! Decisions lacking market lines, authority picks, or final scores are
//! skipped with a reason. Every other decision is graded for the authority
//! picks and separately for each model's own picks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bookiex_arbitration::{Actionability, ConfidenceTier, DecisionRecord};
use bookiex_core::game::points;
use bookiex_core::{GradingError, SpreadPick, TotalPick};

use crate::grader::{GradedOutcome, Outcome};

pub const REASON_SCORES_MISSING: &str = "Final scores missing";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("backtest failed for game {game_id}: {source}")]
    Grading {
        game_id: String,
        #[source]
        source: GradingError,
    },
}

/// A decision left out of grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGame {
    pub game_id: String,
    pub reason: String,
}

/// One model's picks and how they settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutcome {
    pub model_name: String,
    pub spread_pick: Option<SpreadPick>,
    pub spread_result: Option<Outcome>,
    pub total_pick: Option<TotalPick>,
    pub total_result: Option<Outcome>,
    pub parlay_result: Option<Outcome>,
}

/// A graded decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedGame {
    pub game_id: String,
    pub game_date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    pub spread_home: Option<f64>,
    pub spread_away: Option<f64>,
    pub total: Option<f64>,
    pub selection_authority: String,
    pub spread_pick: Option<SpreadPick>,
    pub spread_edge: Option<f64>,
    pub total_pick: Option<TotalPick>,
    pub total_edge: Option<f64>,
    pub parlay_edge_score: Option<f64>,
    pub actionability: Actionability,
    pub confidence_tier: ConfidenceTier,
    #[serde(deserialize_with = "points::deserialize")]
    pub home_points: i32,
    #[serde(deserialize_with = "points::deserialize")]
    pub away_points: i32,
    #[serde(flatten)]
    pub outcome: GradedOutcome,
    pub model_results: Vec<ModelOutcome>,
}

/// Graded games plus the ones left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    pub games: Vec<GradedGame>,
    pub skipped: Vec<SkippedGame>,
}

/// Market fields a decision needs before it can be graded, by name.
#[must_use]
pub fn missing_market_fields(decision: &DecisionRecord) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if decision.spread_home.is_none() {
        missing.push("spread_home");
    }
    if decision.spread_away.is_none() {
        missing.push("spread_away");
    }
    if decision.total.is_none() {
        missing.push("total");
    }
    if decision.spread_pick.is_none() {
        missing.push("spread_pick");
    }
    if decision.total_pick.is_none() {
        missing.push("total_pick");
    }
    missing
}

/// Grades every decision, in input order.
///
/// # Errors
/// Returns [`BacktestError::Grading`] if a decision with scores still fails
/// to grade; the whole run stops at that game.
pub fn run_backtest(decisions: &[DecisionRecord]) -> Result<BacktestRun, BacktestError> {
    let mut run = BacktestRun::default();

    for decision in decisions {
        match grade_decision(decision)? {
            Verdict::Graded(game) => run.games.push(*game),
            Verdict::Skipped(reason) => {
                tracing::debug!(game_id = %decision.game_id, %reason, "Skipping game");
                run.skipped.push(SkippedGame {
                    game_id: decision.game_id.clone(),
                    reason,
                });
            }
        }
    }

    tracing::info!(
        graded = run.games.len(),
        skipped = run.skipped.len(),
        "Backtest complete"
    );

    Ok(run)
}

enum Verdict {
    Graded(Box<GradedGame>),
    Skipped(String),
}

fn grade_decision(decision: &DecisionRecord) -> Result<Verdict, BacktestError> {
    let missing = missing_market_fields(decision);
    if !missing.is_empty() {
        return Ok(Verdict::Skipped(format!("Missing market fields: {missing:?}")));
    }

    let (Some(home_points), Some(away_points)) = (decision.home_points, decision.away_points)
    else {
        return Ok(Verdict::Skipped(REASON_SCORES_MISSING.to_string()));
    };
    let score = Some(bookiex_core::FinalScore {
        home: home_points,
        away: away_points,
    });

    let lines = decision.lines();
    let wrap = |source| BacktestError::Grading {
        game_id: decision.game_id.clone(),
        source,
    };

    let outcome = GradedOutcome::grade(decision.spread_pick, decision.total_pick, &lines, score)
        .map_err(wrap)?;

    let model_results = decision
        .models
        .iter()
        .map(|model| {
            let graded = GradedOutcome::grade(model.spread_pick, model.total_pick, &lines, score)?;
            Ok(ModelOutcome {
                model_name: model.model_name.clone(),
                spread_pick: model.spread_pick,
                spread_result: graded.spread_result,
                total_pick: model.total_pick,
                total_result: graded.total_result,
                parlay_result: graded.parlay_result,
            })
        })
        .collect::<Result<Vec<_>, GradingError>>()
        .map_err(wrap)?;

    Ok(Verdict::Graded(Box::new(GradedGame {
        game_id: decision.game_id.clone(),
        game_date: decision.game_date,
        home_team: decision.home_team.clone(),
        away_team: decision.away_team.clone(),
        spread_home: decision.spread_home,
        spread_away: decision.spread_away,
        total: decision.total,
        selection_authority: decision.selection_authority.clone(),
        spread_pick: decision.spread_pick,
        spread_edge: decision.spread_edge,
        total_pick: decision.total_pick,
        total_edge: decision.total_edge,
        parlay_edge_score: decision.parlay_edge_score,
        actionability: decision.actionability.state,
        confidence_tier: decision.confidence.tier,
        home_points,
        away_points,
        outcome,
        model_results,
    })))
}
