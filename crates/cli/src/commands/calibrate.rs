//! Freezes a calibration snapshot from graded games.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use bookiex_backtest::CalibrationSnapshot;
use bookiex_core::AppConfig;

use crate::snapshot::{read_json, write_json, BacktestGamesSnapshot};

/// Arguments for the calibrate command.
#[derive(Args, Debug, Clone)]
pub struct CalibrateArgs {
    /// Graded games written by backtest
    #[arg(short, long, default_value = "backtest/backtest_games.json")]
    pub input: PathBuf,

    /// Calibration snapshot to write
    #[arg(short, long, default_value = "calibration_snapshot.json")]
    pub output: PathBuf,
}

/// Runs the calibrate command.
///
/// # Errors
/// Returns an error if the input cannot be read or the snapshot cannot be
/// written.
pub async fn run_calibrate(args: CalibrateArgs, config: &AppConfig) -> Result<()> {
    let graded: BacktestGamesSnapshot = read_json(&args.input).await?;
    if graded.games.is_empty() {
        tracing::warn!(input = %args.input.display(), "No graded games; snapshot will be empty");
    }

    let snapshot = CalibrationSnapshot::build(&graded.games, &config.calibration)
        .with_generated_at(Utc::now())
        .with_source(args.input.display().to_string());
    write_json(&args.output, &snapshot).await?;

    tracing::info!(
        games = snapshot.total_games_used,
        version = %snapshot.calibration_version,
        output = %args.output.display(),
        "Wrote calibration snapshot"
    );
    Ok(())
}
