//! Fatigue adjustment over the baseline.
//!
//! A tired home side gives points on the margin; fatigue on either side
//! slows the pace and lowers the total.

use bookiex_core::{GameRecord, ModelKind, ModelResult, ModelResults, OddsSource, ProjectionModel};

use super::baseline_projection;

/// Margin points per unit of home-minus-away fatigue.
pub const SPREAD_WEIGHT: f64 = 1.75;
/// Total points removed per unit of fatigue imbalance.
pub const TOTAL_DIRECTIONAL_WEIGHT: f64 = 0.9;
/// Total points removed per unit of combined fatigue.
pub const TOTAL_PACE_WEIGHT: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct FatigueModel {
    name: String,
    odds_source: OddsSource,
}

impl Default for FatigueModel {
    fn default() -> Self {
        Self::new(OddsSource::Last)
    }
}

impl FatigueModel {
    #[must_use]
    pub fn new(odds_source: OddsSource) -> Self {
        Self {
            name: ModelKind::Fatigue.name().to_string(),
            odds_source,
        }
    }
}

impl ProjectionModel for FatigueModel {
    fn run(&self, game: &GameRecord, prior: &ModelResults) -> ModelResult {
        let Some((baseline_margin, baseline_total)) = baseline_projection(prior) else {
            return ModelResult::empty(&self.name);
        };

        let f = &game.features;
        let fatigue_diff = f.fatigue_diff_home_minus_away.unwrap_or(0.0);
        let home_fatigue = f.home_fatigue_score.unwrap_or(0.0);
        let away_fatigue = f.away_fatigue_score.unwrap_or(0.0);

        let spread_adjustment = SPREAD_WEIGHT * fatigue_diff;
        let total_adjustment = -TOTAL_DIRECTIONAL_WEIGHT * fatigue_diff.abs()
            - TOTAL_PACE_WEIGHT * (home_fatigue + away_fatigue);

        let lines = game.lines(self.odds_source);
        ModelResult::from_projections(
            &self.name,
            Some(baseline_margin + spread_adjustment),
            Some(baseline_total + total_adjustment),
            lines.spread_home,
            lines.total,
        )
        .with_flag("fatigue_diff", fatigue_diff)
        .with_flag("spread_adjustment", spread_adjustment)
        .with_flag("total_adjustment", total_adjustment)
        .with_flag("home_fatigue", home_fatigue)
        .with_flag("away_fatigue", away_fatigue)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::BaselineModel;
    use bookiex_core::{SpreadPick, TotalPick};

    fn run_with_baseline(game: &GameRecord) -> ModelResult {
        let mut prior = ModelResults::new();
        prior.push(BaselineModel::default().run(game, &prior));
        FatigueModel::default().run(game, &prior)
    }

    fn game() -> GameRecord {
        GameRecord::new("1", "BOS", "NYK")
            .with_scoring(110.0, 112.0, 104.0, 108.0)
            .with_last_lines(-3.5, 215.0)
    }

    #[test]
    fn no_fatigue_matches_baseline() {
        let result = run_with_baseline(&game());

        assert_eq!(result.home_line_proj, Some(-1.0));
        assert_eq!(result.total_projection, Some(217.0));
        assert_eq!(result.context_flags["fatigue_diff"], 0.0);
        assert_eq!(result.context_flags["spread_adjustment"], 0.0);
    }

    #[test]
    fn tired_home_side_moves_margin_toward_away() {
        // diff = 1.0 -> margin -1 + 1.75; total 217 - 0.9 - 0.6 * 1.0
        let result = run_with_baseline(&game().with_fatigue(1.0, 0.0));

        assert!((result.home_line_proj.unwrap() - 0.75).abs() < 1e-9);
        assert!((result.total_projection.unwrap() - 215.5).abs() < 1e-9);
        assert_eq!(result.spread_pick, Some(SpreadPick::Away));
        assert_eq!(result.total_pick, Some(TotalPick::Over));
        assert!((result.context_flags["total_adjustment"] + 1.5).abs() < 1e-9);
    }

    #[test]
    fn tired_away_side_favors_home() {
        // diff = -2.0 -> margin -1 - 3.5 = -4.5 < -3.5
        let result = run_with_baseline(&game().with_fatigue(0.0, 2.0));

        assert!((result.home_line_proj.unwrap() + 4.5).abs() < 1e-9);
        assert_eq!(result.spread_pick, Some(SpreadPick::Home));
        // 217 - 1.8 - 1.2
        assert!((result.total_projection.unwrap() - 214.0).abs() < 1e-9);
        assert_eq!(result.total_pick, Some(TotalPick::Under));
    }

    #[test]
    fn missing_baseline_yields_empty_result() {
        let result = FatigueModel::default().run(&game(), &ModelResults::new());

        assert_eq!(result.model_name, "fatigue");
        assert!(result.is_empty());
        assert!(result.context_flags.is_empty());
    }

    #[test]
    fn null_baseline_projection_yields_empty_result() {
        let mut g = game();
        g.features.home_avg_points_for = None;

        let result = run_with_baseline(&g.with_fatigue(1.0, 0.0));
        assert!(result.is_empty());
        assert!(result.context_flags.is_empty());
    }
}
