//! Grades decisions against final scores.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use bookiex_backtest::{run_backtest, BacktestSummary, GradedGame, Outcome};

use crate::snapshot::{
    cell, read_json, write_csv, write_json, BacktestGamesSnapshot, BacktestSummarySnapshot,
    DecisionSnapshot,
};

/// Arguments for the backtest command.
#[derive(Args, Debug, Clone)]
pub struct BacktestArgs {
    /// Decision snapshot written by decide
    #[arg(short, long, default_value = "decisions.json")]
    pub input: PathBuf,

    /// Directory for backtest_games.json, backtest_games.csv and backtest_summary.json
    #[arg(long, default_value = "backtest")]
    pub output_dir: PathBuf,
}

const CSV_HEADER: [&str; 17] = [
    "game_id",
    "game_date",
    "home_team",
    "away_team",
    "spread_home",
    "total",
    "actionability",
    "confidence_tier",
    "spread_pick",
    "spread_edge",
    "spread_result",
    "total_pick",
    "total_edge",
    "total_result",
    "parlay_result",
    "home_points",
    "away_points",
];

/// Runs the backtest command.
///
/// # Errors
/// Returns an error if the input cannot be read, a placed bet cannot be
/// graded, or an output cannot be written.
pub async fn run_backtest_command(args: BacktestArgs) -> Result<()> {
    let decisions: DecisionSnapshot = read_json(&args.input).await?;
    let run = run_backtest(&decisions.games)?;
    let summary = BacktestSummary::from_run(&run);
    let generated_at = Utc::now();

    write_games_csv(&args.output_dir.join("backtest_games.csv"), &run.games).await?;
    write_json(
        &args.output_dir.join("backtest_summary.json"),
        &BacktestSummarySnapshot {
            generated_at,
            summary,
        },
    )
    .await?;

    let graded = run.games.len();
    let skipped = run.skipped.len();
    write_json(
        &args.output_dir.join("backtest_games.json"),
        &BacktestGamesSnapshot {
            generated_at,
            games: run.games,
            skipped: run.skipped,
        },
    )
    .await?;

    tracing::info!(
        graded,
        skipped,
        output_dir = %args.output_dir.display(),
        "Wrote backtest results"
    );
    Ok(())
}

async fn write_games_csv(path: &Path, games: &[GradedGame]) -> Result<()> {
    let result = |o: Option<Outcome>| cell(o.map(Outcome::as_str));
    let rows: Vec<Vec<String>> = games
        .iter()
        .map(|g| {
            vec![
                g.game_id.clone(),
                cell(g.game_date),
                g.home_team.clone(),
                g.away_team.clone(),
                cell(g.spread_home),
                cell(g.total),
                g.actionability.as_str().to_string(),
                g.confidence_tier.as_str().to_string(),
                cell(g.spread_pick.map(|p| p.as_str())),
                cell(g.spread_edge),
                result(g.outcome.spread_result),
                cell(g.total_pick.map(|p| p.as_str())),
                cell(g.total_edge),
                result(g.outcome.total_result),
                result(g.outcome.parlay_result),
                g.home_points.to_string(),
                g.away_points.to_string(),
            ]
        })
        .collect();

    write_csv(path, &CSV_HEADER, &rows).await
}
