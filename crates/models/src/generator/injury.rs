//! Injury adjustment over the baseline.

use bookiex_core::{GameRecord, ModelKind, ModelResult, ModelResults, OddsSource, ProjectionModel};

use super::baseline_projection;

/// Margin points per unit of home-minus-away injury impact.
pub const SPREAD_WEIGHT: f64 = 1.75;
/// Total points removed per unit of injury imbalance.
pub const TOTAL_WEIGHT: f64 = 0.5;

/// Moves the margin by the home-minus-away injury impact and trims the total
/// by the size of the imbalance.
#[derive(Debug, Clone)]
pub struct InjuryModel {
    name: String,
    odds_source: OddsSource,
}

impl Default for InjuryModel {
    fn default() -> Self {
        Self::new(OddsSource::Last)
    }
}

impl InjuryModel {
    #[must_use]
    pub fn new(odds_source: OddsSource) -> Self {
        Self {
            name: ModelKind::Injury.name().to_string(),
            odds_source,
        }
    }
}

impl ProjectionModel for InjuryModel {
    fn run(&self, game: &GameRecord, prior: &ModelResults) -> ModelResult {
        let Some((baseline_margin, baseline_total)) = baseline_projection(prior) else {
            return ModelResult::empty(&self.name);
        };

        let home_injury = game.features.home_injury_impact.unwrap_or(0.0);
        let away_injury = game.features.away_injury_impact.unwrap_or(0.0);
        let injury_diff = home_injury - away_injury;

        let spread_adjustment = -SPREAD_WEIGHT * injury_diff;
        let total_adjustment = -TOTAL_WEIGHT * injury_diff.abs();

        let lines = game.lines(self.odds_source);
        ModelResult::from_projections(
            &self.name,
            Some(baseline_margin + spread_adjustment),
            Some(baseline_total + total_adjustment),
            lines.spread_home,
            lines.total,
        )
        .with_flag("home_injury", home_injury)
        .with_flag("away_injury", away_injury)
        .with_flag("injury_diff", injury_diff)
        .with_flag("spread_adjustment", spread_adjustment)
        .with_flag("total_adjustment", total_adjustment)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
