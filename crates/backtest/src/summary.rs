//! Aggregate backtest statistics.
//!
//! Pure reduction over graded games: the same input always yields the same
//! summary, including map ordering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bookiex_arbitration::Actionability;
use bookiex_core::round_to;

use crate::grader::Outcome;
use crate::runner::{BacktestRun, GradedGame, SkippedGame};

/// Settled counts and rates for one wager type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WagerTally {
    /// Graded bets, pushes included.
    pub bets: u32,
    #[serde(rename = "WIN")]
    pub wins: u32,
    #[serde(rename = "LOSS")]
    pub losses: u32,
    #[serde(rename = "PUSH")]
    pub pushes: u32,
    /// Wins over all bets, as a percentage rounded to two places.
    pub win_pct: f64,
    /// Mean edge magnitude of winning bets.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_edge_win: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_edge_loss: Option<f64>,
}

#[derive(Debug, Default)]
struct TallyBuilder {
    tally: WagerTally,
    win_edges: Vec<f64>,
    loss_edges: Vec<f64>,
}

impl TallyBuilder {
    fn record(&mut self, result: Option<Outcome>, edge: Option<f64>) {
        let Some(result) = result else {
            return;
        };
        self.tally.bets += 1;
        match result {
            Outcome::Win => {
                self.tally.wins += 1;
                self.win_edges.extend(edge.map(f64::abs));
            }
            Outcome::Loss => {
                self.tally.losses += 1;
                self.loss_edges.extend(edge.map(f64::abs));
            }
            Outcome::Push => self.tally.pushes += 1,
        }
    }

    fn finish(mut self, with_edges: bool) -> WagerTally {
        self.tally.win_pct = win_pct(self.tally.wins, self.tally.bets);
        if with_edges {
            self.tally.avg_edge_win = mean(&self.win_edges).map(|m| round_to(m, 3));
            self.tally.avg_edge_loss = mean(&self.loss_edges).map(|m| round_to(m, 3));
        }
        self.tally
    }
}

/// Spread, total, and parlay tallies for a group of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub spread: WagerTally,
    pub total: WagerTally,
    pub parlay: WagerTally,
}

impl GroupSummary {
    #[must_use]
    pub fn from_games<'a>(games: impl IntoIterator<Item = &'a GradedGame>) -> Self {
        let mut spread = TallyBuilder::default();
        let mut total = TallyBuilder::default();
        let mut parlay = TallyBuilder::default();

        for game in games {
            spread.record(game.outcome.spread_result, game.spread_edge);
            total.record(game.outcome.total_result, game.total_edge);
            parlay.record(game.outcome.parlay_result, None);
        }

        Self {
            spread: spread.finish(true),
            total: total.finish(true),
            parlay: parlay.finish(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub games_total: usize,
    pub games_graded: usize,
    pub games_skipped: usize,
    pub skipped_reasons: BTreeMap<String, usize>,
}

/// Win rate for one edge-magnitude decile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecileStat {
    pub bets: u32,
    pub win_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub counts: Counts,
    pub by_actionability: BTreeMap<Actionability, GroupSummary>,
    pub overall: GroupSummary,
    /// Informational check that larger edges do not lose more often.
    pub edge_checks: BTreeMap<String, DecileStat>,
}

impl BacktestSummary {
    #[must_use]
    pub fn from_run(run: &BacktestRun) -> Self {
        Self::build(&run.games, &run.skipped)
    }

    #[must_use]
    pub fn build(games: &[GradedGame], skipped: &[SkippedGame]) -> Self {
        let mut skipped_reasons = BTreeMap::new();
        for s in skipped {
            *skipped_reasons.entry(s.reason.clone()).or_insert(0) += 1;
        }

        let mut groups: BTreeMap<Actionability, Vec<&GradedGame>> = BTreeMap::new();
        for game in games {
            groups.entry(game.actionability).or_default().push(game);
        }

        Self {
            counts: Counts {
                games_total: games.len() + skipped.len(),
                games_graded: games.len(),
                games_skipped: skipped.len(),
                skipped_reasons,
            },
            by_actionability: groups
                .into_iter()
                .map(|(state, members)| (state, GroupSummary::from_games(members)))
                .collect(),
            overall: GroupSummary::from_games(games),
            edge_checks: edge_checks(games),
        }
    }
}

/// Decile index of an edge: whole points of magnitude, capped at 9.
#[must_use]
pub fn edge_decile(edge: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let decile = edge.abs().floor().min(9.0) as u8;
    decile
}

fn edge_checks(games: &[GradedGame]) -> BTreeMap<String, DecileStat> {
    let mut buckets: BTreeMap<String, (u32, u32)> = BTreeMap::new();

    for game in games {
        for (label, edge, result) in [
            ("spread", game.spread_edge, game.outcome.spread_result),
            ("total", game.total_edge, game.outcome.total_result),
        ] {
            let (Some(edge), Some(result @ (Outcome::Win | Outcome::Loss))) = (edge, result) else {
                continue;
            };
            let key = format!("{label}_edge_decile_{}", edge_decile(edge));
            let entry = buckets.entry(key).or_insert((0, 0));
            entry.0 += 1;
            if result == Outcome::Win {
                entry.1 += 1;
            }
        }
    }

    buckets
        .into_iter()
        .map(|(key, (bets, wins))| {
            (
                key,
                DecileStat {
                    bets,
                    win_pct: win_pct(wins, bets),
                },
            )
        })
        .collect()
}

/// Percentage rounded to two places; zero when there are no bets.
#[must_use]
pub fn win_pct(wins: u32, bets: u32) -> f64 {
    if bets == 0 {
        return 0.0;
    }
    round_to(f64::from(wins) / f64::from(bets) * 100.0, 2)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    Some(values.iter().sum::<f64>() / n)
}
