//! Ordered model execution.
//!
//! The runner applies every registered model to a game in run order, handing
//! each one the results produced so far, and checks the output contract as
//! it goes. A violation aborts the game; in a batch the remaining games
//! still run and the failures are reported alongside the results.

use serde::{Deserialize, Serialize};

use bookiex_core::{ContractError, GameRecord, ModelResults};

use crate::registry::ModelRegistry;

/// Models output for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameModels {
    pub game: GameRecord,
    pub models: ModelResults,
}

/// Result of running a batch of games.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    /// Completed games, ordered by game id.
    pub games: Vec<GameModels>,
    /// One error per aborted game.
    pub failures: Vec<ContractError>,
}

impl BatchOutput {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct ModelRunner {
    registry: ModelRegistry,
}

impl Default for ModelRunner {
    fn default() -> Self {
        Self::new(ModelRegistry::default())
    }
}

impl ModelRunner {
    #[must_use]
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    /// Runs every registered model against `game`.
    ///
    /// # Errors
    /// Returns [`ContractError::NameMismatch`] when a model labels its result
    /// with a name other than the one it is registered under, and
    /// [`ContractError::DuplicateModel`] when a name repeats within the game.
    pub fn run_game(&self, game: &GameRecord) -> Result<ModelResults, ContractError> {
        let mut results = ModelResults::new();

        for model in self.registry.iter() {
            let registered = model.name();
            let result = model.run(game, &results);

            if result.model_name != registered {
                return Err(ContractError::NameMismatch {
                    game_id: game.game_id.clone(),
                    registered: registered.to_string(),
                    returned: result.model_name,
                });
            }
            if results.contains(registered) {
                return Err(ContractError::DuplicateModel {
                    game_id: game.game_id.clone(),
                    model: registered.to_string(),
                });
            }

            tracing::debug!(
                game_id = %game.game_id,
                model = registered,
                spread_pick = ?result.spread_pick,
                spread_edge = ?result.spread_edge,
                total_pick = ?result.total_pick,
                total_edge = ?result.total_edge,
                "Model run complete"
            );

            results.push(result);
        }

        Ok(results)
    }

    /// Runs every game, ordered by game id.
    ///
    /// A contract violation aborts only the affected game.
    #[must_use]
    pub fn run_batch(&self, games: &[GameRecord]) -> BatchOutput {
        let mut ordered: Vec<&GameRecord> = games.iter().collect();
        ordered.sort_by(|a, b| a.game_id.cmp(&b.game_id));

        let mut output = BatchOutput::default();
        for game in ordered {
            match self.run_game(game) {
                Ok(models) => output.games.push(GameModels {
                    game: game.clone(),
                    models,
                }),
                Err(e) => {
                    tracing::warn!(game_id = %game.game_id, error = %e, "Game aborted");
                    output.failures.push(e);
                }
            }
        }

        tracing::info!(
            games = output.games.len(),
            failed = output.failures.len(),
            models = self.registry.len(),
            "Model batch complete"
        );

        output
    }
}
