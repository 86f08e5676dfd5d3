//! Calibration snapshots.
//!
//! Freezes the edge distribution and bucketed win rates of a graded set so
//! later runs can be compared against a fixed reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookiex_core::{CalibrationConfig, SpreadPick, TotalPick};

use crate::grader::Outcome;
use crate::runner::GradedGame;
use crate::summary::mean;

pub const CALIBRATION_VERSION: &str = "CALIBRATION_SNAPSHOT_V1";

/// Percentile of sorted data by linear interpolation between closest ranks.
///
/// `p` is clamped to `[0, 100]`. Returns `None` for empty input.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    #[allow(clippy::cast_precision_loss)]
    let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(last);
    let weight = rank - rank.floor();
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    /// Label such as `p50`.
    pub label: String,
    pub value: f64,
}

/// Percentile table of edge magnitudes.
#[must_use]
pub fn edge_percentiles(edges: &[f64], percentiles: &[f64]) -> Vec<PercentileValue> {
    let mut sorted: Vec<f64> = edges.iter().map(|e| e.abs()).collect();
    sorted.sort_by(f64::total_cmp);

    percentiles
        .iter()
        .filter_map(|&p| {
            percentile(&sorted, p).map(|value| PercentileValue {
                label: format!("p{p}"),
                value,
            })
        })
        .collect()
}

/// Win rate within one edge-magnitude bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketWinRate {
    /// Label such as `2-4` or `8+`.
    pub bucket: String,
    pub bets: u32,
    pub wins: u32,
    /// Wins over bets as a fraction; `None` without bets.
    pub win_rate: Option<f64>,
}

/// Bucket labels for the configured upper bounds, lowest first.
#[must_use]
pub fn bucket_labels(bounds: &[f64]) -> Vec<String> {
    let mut labels = Vec::with_capacity(bounds.len() + 1);
    let mut lower = 0.0;
    for &upper in bounds {
        labels.push(format!("{lower}-{upper}"));
        lower = upper;
    }
    labels.push(format!("{lower}+"));
    labels
}

/// Index of the bucket an edge magnitude falls in.
#[must_use]
pub fn bucket_index(magnitude: f64, bounds: &[f64]) -> usize {
    bounds
        .iter()
        .position(|&upper| magnitude < upper)
        .unwrap_or(bounds.len())
}

fn bucket_win_rates(
    rows: impl Iterator<Item = (Option<f64>, Option<Outcome>)>,
    bounds: &[f64],
) -> Vec<BucketWinRate> {
    let mut buckets: Vec<BucketWinRate> = bucket_labels(bounds)
        .into_iter()
        .map(|bucket| BucketWinRate {
            bucket,
            bets: 0,
            wins: 0,
            win_rate: None,
        })
        .collect();

    for (edge, result) in rows {
        let (Some(edge), Some(result)) = (edge, result) else {
            continue;
        };
        let bucket = &mut buckets[bucket_index(edge.abs(), bounds)];
        bucket.bets += 1;
        if result == Outcome::Win {
            bucket.wins += 1;
        }
    }

    for bucket in &mut buckets {
        if bucket.bets > 0 {
            bucket.win_rate = Some(f64::from(bucket.wins) / f64::from(bucket.bets));
        }
    }
    buckets
}

/// Directional tendencies of the authority's picks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiasBaseline {
    pub over_win_rate: Option<f64>,
    pub under_win_rate: Option<f64>,
    pub favorite_win_rate: Option<f64>,
    pub dog_win_rate: Option<f64>,
}

impl BiasBaseline {
    /// A favorite pick backs the home side when it is favored
    /// (`spread_home < 0`) or the away side otherwise.
    #[must_use]
    pub fn from_games(games: &[GradedGame]) -> Self {
        let mut over = Vec::new();
        let mut under = Vec::new();
        let mut favorite = Vec::new();
        let mut dog = Vec::new();

        for game in games {
            let total_won = win_flag(game.outcome.total_result);
            match game.total_pick {
                Some(TotalPick::Over) => over.push(total_won),
                Some(TotalPick::Under) => under.push(total_won),
                Some(TotalPick::Push) | None => {}
            }

            let (Some(pick), Some(spread_home)) = (game.spread_pick, game.spread_home) else {
                continue;
            };
            if !pick.is_directional() {
                continue;
            }
            let home_favored = spread_home < 0.0;
            let spread_won = win_flag(game.outcome.spread_result);
            if home_favored == (pick == SpreadPick::Home) {
                favorite.push(spread_won);
            } else {
                dog.push(spread_won);
            }
        }

        Self {
            over_win_rate: mean(&over),
            under_win_rate: mean(&under),
            favorite_win_rate: mean(&favorite),
            dog_win_rate: mean(&dog),
        }
    }
}

fn win_flag(result: Option<Outcome>) -> f64 {
    if result == Some(Outcome::Win) {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSnapshot {
    pub calibration_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Where the graded games came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub total_games_used: usize,
    pub spread_edge_percentiles: Vec<PercentileValue>,
    pub total_edge_percentiles: Vec<PercentileValue>,
    pub spread_bucket_win_rates: Vec<BucketWinRate>,
    pub total_bucket_win_rates: Vec<BucketWinRate>,
    pub bias_baseline: BiasBaseline,
}

impl CalibrationSnapshot {
    /// Builds a snapshot over graded games.
    #[must_use]
    pub fn build(games: &[GradedGame], config: &CalibrationConfig) -> Self {
        let spread_edges: Vec<f64> = games.iter().filter_map(|g| g.spread_edge).collect();
        let total_edges: Vec<f64> = games.iter().filter_map(|g| g.total_edge).collect();
        let bounds = &config.bucket_bounds;

        Self {
            calibration_version: CALIBRATION_VERSION.to_string(),
            generated_at: None,
            source: None,
            total_games_used: games.len(),
            spread_edge_percentiles: edge_percentiles(&spread_edges, &config.percentiles),
            total_edge_percentiles: edge_percentiles(&total_edges, &config.percentiles),
            spread_bucket_win_rates: bucket_win_rates(
                games.iter().map(|g| (g.spread_edge, g.outcome.spread_result)),
                bounds,
            ),
            total_bucket_win_rates: bucket_win_rates(
                games.iter().map(|g| (g.total_edge, g.outcome.total_result)),
                bounds,
            ),
            bias_baseline: BiasBaseline::from_games(games),
        }
    }

    #[must_use]
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grader::GradedOutcome;
    use bookiex_arbitration::{Actionability, ConfidenceTier};

    fn graded(
        spread_pick: SpreadPick,
        spread_home: f64,
        spread: (f64, Outcome),
        total_pick: TotalPick,
        total: (f64, Outcome),
    ) -> GradedGame {
        GradedGame {
            game_id: "1".to_string(),
            game_date: None,
            home_team: "H".to_string(),
            away_team: "A".to_string(),
            spread_home: Some(spread_home),
            spread_away: Some(-spread_home),
            total: Some(215.0),
            selection_authority: "baseline".to_string(),
            spread_pick: Some(spread_pick),
            spread_edge: Some(spread.0),
            total_pick: Some(total_pick),
            total_edge: Some(total.0),
            parlay_edge_score: None,
            actionability: Actionability::Action,
            confidence_tier: ConfidenceTier::Moderate,
            home_points: 100,
            away_points: 100,
            outcome: GradedOutcome {
                spread_result: Some(spread.1),
                total_result: Some(total.1),
                parlay_result: None,
                actual_margin: Some(0),
                actual_total: Some(200),
            },
            model_results: Vec::new(),
        }
    }

    // ============================================
    // Percentiles
    // ============================================

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 100.0), Some(4.0));
        assert_eq!(percentile(&sorted, 50.0), Some(2.5));
        // rank 0.3 * 3 = 0.9
        assert!((percentile(&sorted, 30.0).unwrap() - 1.9).abs() < 1e-12);
    }

    #[test]
    fn percentile_edge_cases() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 90.0), Some(7.0));
        assert_eq!(percentile(&[1.0, 2.0], 150.0), Some(2.0));
    }

    #[test]
    fn edge_percentiles_use_magnitudes() {
        let table = edge_percentiles(&[-4.0, 1.0, -2.0, 3.0], &[25.0, 50.0]);
        assert_eq!(table[0].label, "p25");
        assert!((table[0].value - 1.75).abs() < 1e-12);
        assert_eq!(table[1].label, "p50");
        assert!((table[1].value - 2.5).abs() < 1e-12);
        assert!(edge_percentiles(&[], &[50.0]).is_empty());
    }

    // ============================================
    // Buckets
    // ============================================

    #[test]
    fn default_bucket_labels() {
        assert_eq!(
            bucket_labels(&CalibrationConfig::default().bucket_bounds),
            vec!["0-1", "1-2", "2-4", "4-8", "8+"]
        );
    }

    #[test]
    fn bucket_upper_bounds_are_exclusive() {
        let bounds = CalibrationConfig::default().bucket_bounds;
        assert_eq!(bucket_index(0.99, &bounds), 0);
        assert_eq!(bucket_index(1.0, &bounds), 1);
        assert_eq!(bucket_index(3.9, &bounds), 2);
        assert_eq!(bucket_index(8.0, &bounds), 4);
        assert_eq!(bucket_index(25.0, &bounds), 4);
    }

    #[test]
    fn bucket_win_rates_by_magnitude() {
        use Outcome::{Loss, Push, Win};
        let games = vec![
            graded(SpreadPick::Home, -3.5, (-2.5, Win), TotalPick::Over, (0.5, Win)),
            graded(SpreadPick::Away, -3.5, (3.0, Loss), TotalPick::Over, (0.2, Loss)),
            graded(SpreadPick::Home, -3.5, (-9.0, Push), TotalPick::Under, (-5.0, Win)),
        ];
        let snapshot = CalibrationSnapshot::build(&games, &CalibrationConfig::default());

        let spread = &snapshot.spread_bucket_win_rates;
        assert_eq!(spread[2].bucket, "2-4");
        assert_eq!(spread[2].bets, 2);
        assert_eq!(spread[2].win_rate, Some(0.5));
        assert_eq!(spread[4].win_rate, Some(0.0));
        assert_eq!(spread[0].win_rate, None);

        let total = &snapshot.total_bucket_win_rates;
        assert_eq!(total[0].win_rate, Some(0.5));
        assert_eq!(total[3].win_rate, Some(1.0));
    }

    // ============================================
    // Bias baseline
    // ============================================

    #[test]
    fn favorite_and_dog_split_on_home_line() {
        use Outcome::{Loss, Win};
        let games = vec![
            // Home favored, home pick: favorite.
            graded(SpreadPick::Home, -3.5, (-2.0, Win), TotalPick::Over, (1.0, Win)),
            // Home favored, away pick: dog.
            graded(SpreadPick::Away, -3.5, (2.0, Loss), TotalPick::Over, (1.0, Loss)),
            // Home underdog, away pick: favorite.
            graded(SpreadPick::Away, 2.5, (2.0, Loss), TotalPick::Under, (-1.0, Win)),
        ];
        let bias = BiasBaseline::from_games(&games);

        assert_eq!(bias.favorite_win_rate, Some(0.5));
        assert_eq!(bias.dog_win_rate, Some(0.0));
        assert_eq!(bias.over_win_rate, Some(0.5));
        assert_eq!(bias.under_win_rate, Some(1.0));
    }

    #[test]
    fn snapshot_is_versioned_and_repeatable() {
        use Outcome::Win;
        let games = vec![graded(SpreadPick::Home, -3.5, (-2.0, Win), TotalPick::Over, (1.0, Win))];
        let config = CalibrationConfig::default();

        let a = CalibrationSnapshot::build(&games, &config);
        let b = CalibrationSnapshot::build(&games, &config);
        assert_eq!(a, b);
        assert_eq!(a.calibration_version, "CALIBRATION_SNAPSHOT_V1");
        assert_eq!(a.total_games_used, 1);
        assert!(a.generated_at.is_none());
    }
}
