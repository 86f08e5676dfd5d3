//! Builds decision records from a multi-model snapshot.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde_json::Value;

use bookiex_arbitration::{Actionability, DecisionEngine, DecisionRecord};
use bookiex_core::{AppConfig, ContractError, GameRecord, ModelResult, ModelResults};

use crate::snapshot::{read_json, write_json, DecisionSnapshot};

/// Arguments for the decide command.
#[derive(Args, Debug, Clone)]
pub struct DecideArgs {
    /// Multi-model snapshot written by run-models
    #[arg(short, long, default_value = "multi_model.json")]
    pub input: PathBuf,

    /// Decision snapshot to write
    #[arg(short, long, default_value = "decisions.json")]
    pub output: PathBuf,
}

/// Runs the decide command.
///
/// Model results are re-validated against the contract key set on the way
/// in; a game whose results fail is logged and left out.
///
/// # Errors
/// Returns an error if the input is unreadable or not a model snapshot, or
/// the output cannot be written.
pub async fn run_decide(args: DecideArgs, config: &AppConfig) -> Result<()> {
    let snapshot: Value = read_json(&args.input).await?;
    let entries = snapshot
        .get("games")
        .and_then(Value::as_array)
        .context("Model snapshot has no games array")?;

    let engine = DecisionEngine::new(config);
    let mut decisions = Vec::with_capacity(entries.len());

    for entry in entries {
        let game: GameRecord = serde_json::from_value(entry.get("game").cloned().unwrap_or_default())
            .context("Malformed game record in model snapshot")?;

        match parse_models(entry.get("models"), &game.game_id) {
            Ok(models) => decisions.push(engine.decide(&game, models)),
            Err(e) => tracing::warn!(game_id = %game.game_id, error = %e, "Game left out"),
        }
    }
    decisions.sort_by(|a, b| a.game_id.cmp(&b.game_id));

    log_tally(&decisions);

    let out = DecisionSnapshot {
        generated_at: Utc::now(),
        games: decisions,
    };
    write_json(&args.output, &out).await?;
    tracing::info!(output = %args.output.display(), "Wrote decisions");
    Ok(())
}

fn parse_models(models: Option<&Value>, game_id: &str) -> Result<ModelResults, ContractError> {
    let Some(items) = models.and_then(Value::as_array) else {
        return Err(ContractError::Malformed {
            game_id: game_id.to_string(),
            model: "<all>".to_string(),
            reason: "models is not a list".to_string(),
        });
    };

    let mut results = ModelResults::new();
    for item in items {
        let result = ModelResult::from_json(item, game_id)?;
        if results.contains(&result.model_name) {
            return Err(ContractError::DuplicateModel {
                game_id: game_id.to_string(),
                model: result.model_name,
            });
        }
        results.push(result);
    }
    Ok(results)
}

fn log_tally(decisions: &[DecisionRecord]) {
    let mut tally: BTreeMap<Actionability, usize> = BTreeMap::new();
    for d in decisions {
        *tally.entry(d.actionability.state).or_insert(0) += 1;
    }
    tracing::info!(
        games = decisions.len(),
        action = tally.get(&Actionability::Action).copied().unwrap_or(0),
        info = tally.get(&Actionability::Info).copied().unwrap_or(0),
        none = tally.get(&Actionability::None).copied().unwrap_or(0),
        "Decisions built"
    );
}
