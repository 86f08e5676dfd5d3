//! Built-in projection models.
//!
//! The baseline computes from game features alone; every other model here
//! adjusts the baseline's margin and total and re-derives the market
//! metrics from the adjusted values.

mod baseline;
mod fatigue;
mod injury;
mod market_blend;
mod noise;

pub use baseline::BaselineModel;
pub use fatigue::FatigueModel;
pub use injury::InjuryModel;
pub use market_blend::MarketBlendModel;
pub use noise::{seed_for_game, NoiseModel, NOISE_RANGE};

use bookiex_core::{ModelKind, ModelResults};

/// Baseline (margin, total) a dependent model adjusts.
///
/// `None` when the baseline has not run or either projection is null; the
/// dependent model then returns an all-null result.
pub(crate) fn baseline_projection(prior: &ModelResults) -> Option<(f64, f64)> {
    let baseline = prior.get(ModelKind::Baseline.name())?;
    Some((baseline.home_line_proj?, baseline.total_projection?))
}
