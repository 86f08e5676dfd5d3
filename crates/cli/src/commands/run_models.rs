//! Runs the configured projection models over a game list.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use bookiex_core::{AppConfig, GameRecord};
use bookiex_models::{GameModels, ModelRegistry, ModelRunner};

use crate::snapshot::{cell, read_json, write_csv, write_json, MultiModelSnapshot, MODEL_VERSION};

/// Arguments for the run-models command.
#[derive(Args, Debug, Clone)]
pub struct RunModelsArgs {
    /// JSON array of game records
    #[arg(short, long)]
    pub input: PathBuf,

    /// Multi-model snapshot to write
    #[arg(short, long, default_value = "multi_model.json")]
    pub output: PathBuf,

    /// Optional per-model CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

const CSV_HEADER: [&str; 9] = [
    "game_id",
    "model_name",
    "total_projection",
    "home_line_proj",
    "spread_pick",
    "total_pick",
    "spread_edge",
    "total_edge",
    "parlay_edge_score",
];

/// Runs the run-models command.
///
/// # Errors
/// Returns an error if the input cannot be read or an output cannot be
/// written. Games failing the model contract are logged and left out.
pub async fn run_run_models(args: RunModelsArgs, config: &AppConfig) -> Result<()> {
    let games: Vec<GameRecord> = read_json(&args.input).await?;
    tracing::info!(games = games.len(), input = %args.input.display(), "Loaded games");

    let runner = ModelRunner::new(ModelRegistry::from_config(&config.models));
    let batch = runner.run_batch(&games);
    for failure in &batch.failures {
        tracing::warn!(game_id = failure.game_id(), error = %failure, "Game left out");
    }

    let snapshot = MultiModelSnapshot {
        version: MODEL_VERSION.to_string(),
        generated_at: Utc::now(),
        games: batch.games,
    };
    write_json(&args.output, &snapshot).await?;

    if let Some(path) = &args.csv {
        write_model_csv(path, &snapshot.games).await?;
    }

    tracing::info!(
        games = snapshot.games.len(),
        failures = batch.failures.len(),
        output = %args.output.display(),
        "Wrote model snapshot"
    );
    Ok(())
}

async fn write_model_csv(path: &Path, games: &[GameModels]) -> Result<()> {
    let mut rows: Vec<Vec<String>> = games
        .iter()
        .flat_map(|g| {
            g.models.iter().map(move |m| {
                vec![
                    g.game.game_id.clone(),
                    m.model_name.clone(),
                    cell(m.total_projection),
                    cell(m.home_line_proj),
                    cell(m.spread_pick.map(|p| p.as_str())),
                    cell(m.total_pick.map(|p| p.as_str())),
                    cell(m.spread_edge),
                    cell(m.total_edge),
                    cell(m.parlay_edge_score),
                ]
            })
        })
        .collect();
    rows.sort_by(|a, b| (&a[0], &a[1]).cmp(&(&b[0], &b[1])));

    write_csv(path, &CSV_HEADER, &rows).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_snapshot_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("games.json");
        let games = vec![
            GameRecord::new("2", "A", "B").with_last_lines(-1.0, 210.0),
            GameRecord::new("1", "BOS", "NYK")
                .with_scoring(110.0, 112.0, 104.0, 108.0)
                .with_last_lines(-3.5, 215.0),
        ];
        write_json(&input, &games).await.unwrap();

        let args = RunModelsArgs {
            input,
            output: dir.path().join("multi_model.json"),
            csv: Some(dir.path().join("models.csv")),
        };
        run_run_models(args.clone(), &AppConfig::default()).await.unwrap();

        let snapshot: MultiModelSnapshot = read_json(&args.output).await.unwrap();
        assert_eq!(snapshot.version, "MULTI_MODEL_V1");
        let ids: Vec<&str> = snapshot.games.iter().map(|g| g.game.game_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(snapshot.games[0].models.len(), 4);

        let csv = tokio::fs::read_to_string(dir.path().join("models.csv")).await.unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
        assert_eq!(lines.next(), Some("1,baseline,217,-1,AWAY,OVER,2.5,2,4.5"));
        assert_eq!(csv.lines().count(), 9);
    }
}
