//! Random-noise control model.
//!
//! Adds independent uniform noise to the baseline total and margin. It is a
//! control: any model that does not beat it over a backtest has no signal.
//! The generator is seeded from the game id so reruns are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use bookiex_core::{
    round_to, GameRecord, ModelKind, ModelResult, ModelResults, OddsSource, ProjectionModel,
};

use super::baseline_projection;

/// Half-width of the uniform noise interval.
pub const NOISE_RANGE: f64 = 10.0;

/// Derives the per-game seed.
///
/// Numeric ids (the usual league format) seed directly; any other id seeds
/// from the first eight bytes of its SHA-256 digest.
#[must_use]
pub fn seed_for_game(game_id: &str) -> u64 {
    if let Ok(seed) = game_id.trim().parse::<u64>() {
        return seed;
    }
    let digest = Sha256::digest(game_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

#[derive(Debug, Clone)]
pub struct NoiseModel {
    name: String,
    odds_source: OddsSource,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self::new(OddsSource::Last)
    }
}

impl NoiseModel {
    #[must_use]
    pub fn new(odds_source: OddsSource) -> Self {
        Self {
            name: ModelKind::Noise.name().to_string(),
            odds_source,
        }
    }

    /// Runs with an explicit generator. The total draw is taken first, then
    /// the spread draw.
    pub fn run_with_rng<R: Rng>(
        &self,
        game: &GameRecord,
        prior: &ModelResults,
        rng: &mut R,
    ) -> ModelResult {
        let Some((baseline_margin, baseline_total)) = baseline_projection(prior) else {
            return ModelResult::empty(&self.name);
        };

        let total_adjustment = rng.gen_range(-NOISE_RANGE..NOISE_RANGE);
        let spread_adjustment = rng.gen_range(-NOISE_RANGE..NOISE_RANGE);

        let lines = game.lines(self.odds_source);
        ModelResult::from_projections(
            &self.name,
            Some(baseline_margin + spread_adjustment),
            Some(baseline_total + total_adjustment),
            lines.spread_home,
            lines.total,
        )
        .with_flag("total_adjustment", round_to(total_adjustment, 4))
        .with_flag("spread_adjustment", round_to(spread_adjustment, 4))
    }
}

impl ProjectionModel for NoiseModel {
    fn run(&self, game: &GameRecord, prior: &ModelResults) -> ModelResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed_for_game(&game.game_id));
        self.run_with_rng(game, prior, &mut rng)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
