//! Baseline scoring model.
//!
//! Projects each side's score as the average of its own rolling scoring rate
//! and the opponent's rolling points allowed. Every other built-in model
//! adjusts this one, so it must stand alone on game features.

use bookiex_core::{GameRecord, ModelKind, ModelResult, ModelResults, OddsSource, ProjectionModel};

/// Symmetric average-based projection.
#[derive(Debug, Clone)]
pub struct BaselineModel {
    name: String,
    odds_source: OddsSource,
}

impl Default for BaselineModel {
    fn default() -> Self {
        Self::new(OddsSource::Last)
    }
}

impl BaselineModel {
    #[must_use]
    pub fn new(odds_source: OddsSource) -> Self {
        Self {
            name: ModelKind::Baseline.name().to_string(),
            odds_source,
        }
    }

    /// Projected (home, away) points, when all four averages are present.
    #[must_use]
    pub fn project_scores(game: &GameRecord) -> Option<(f64, f64)> {
        let f = &game.features;
        let home = avg(f.home_avg_points_for, f.away_avg_points_against)?;
        let away = avg(f.home_avg_points_against, f.away_avg_points_for)?;
        Some((home, away))
    }
}

impl ProjectionModel for BaselineModel {
    fn run(&self, game: &GameRecord, _prior: &ModelResults) -> ModelResult {
        let lines = game.lines(self.odds_source);

        let Some((proj_home, proj_away)) = Self::project_scores(game) else {
            return ModelResult::from_projections(&self.name, None, None, lines.spread_home, lines.total);
        };

        let total = proj_home + proj_away;
        let margin = proj_away - proj_home;

        ModelResult::from_projections(&self.name, Some(margin), Some(total), lines.spread_home, lines.total)
            .with_flag("proj_home", proj_home)
            .with_flag("proj_away", proj_away)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn avg(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a? + b?) / 2.0)
}
