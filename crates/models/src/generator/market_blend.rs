//! Market-pressure blend over the baseline.
//!
//! Pulls the baseline projections a fixed share of the way toward the
//! market. Registered for research runs; not part of the default order.

use bookiex_core::{GameRecord, ModelKind, ModelResult, ModelResults, OddsSource, ProjectionModel};

use super::baseline_projection;

/// Share of the projection-to-line gap closed.
pub const MARKET_PULL: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct MarketBlendModel {
    name: String,
    odds_source: OddsSource,
    pull: f64,
}

impl Default for MarketBlendModel {
    fn default() -> Self {
        Self::new(OddsSource::Last)
    }
}

impl MarketBlendModel {
    #[must_use]
    pub fn new(odds_source: OddsSource) -> Self {
        Self {
            name: ModelKind::MarketBlend.name().to_string(),
            odds_source,
            pull: MARKET_PULL,
        }
    }

    /// Overrides the pull share.
    #[must_use]
    pub fn with_pull(mut self, pull: f64) -> Self {
        self.pull = pull;
        self
    }
}

impl ProjectionModel for MarketBlendModel {
    fn run(&self, game: &GameRecord, prior: &ModelResults) -> ModelResult {
        let Some((baseline_margin, baseline_total)) = baseline_projection(prior) else {
            return ModelResult::empty(&self.name);
        };

        let lines = game.lines(self.odds_source);
        // No line, no pull.
        let spread_adjustment = lines
            .spread_home
            .map_or(0.0, |line| (line - baseline_margin) * self.pull);
        let total_adjustment = lines
            .total
            .map_or(0.0, |line| (line - baseline_total) * self.pull);

        ModelResult::from_projections(
            &self.name,
            Some(baseline_margin + spread_adjustment),
            Some(baseline_total + total_adjustment),
            lines.spread_home,
            lines.total,
        )
        .with_flag("spread_adjustment", spread_adjustment)
        .with_flag("total_adjustment", total_adjustment)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
