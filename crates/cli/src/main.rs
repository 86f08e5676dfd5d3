use clap::{Parser, Subcommand};

mod commands;
mod snapshot;

use bookiex_core::{AppConfig, ConfigLoader};
use commands::{BacktestArgs, CalibrateArgs, DecideArgs, FingerprintArgs, RunModelsArgs};

#[derive(Parser, Debug)]
#[command(name = "bookiex")]
#[command(about = "Multi-model decision engine for NBA spread and total markets", long_about = None)]
struct Cli {
    /// Config file path (defaults to config/Config.toml when present)
    #[arg(short, long, global = true, conflicts_with = "profile")]
    config: Option<String>,

    /// Config profile layered over the base file (config/Config.{profile}.toml)
    #[arg(short, long, global = true, env = "BOOKIEX_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the projection models over a game list
    RunModels(RunModelsArgs),
    /// Build per-game decisions from a model snapshot
    Decide(DecideArgs),
    /// Grade decisions against final scores
    Backtest(BacktestArgs),
    /// Freeze a calibration snapshot from graded games
    Calibrate(CalibrateArgs),
    /// Print the determinism digest of a snapshot file
    Fingerprint(FingerprintArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config(cli.config.as_deref(), cli.profile.as_deref())?;

    match cli.command {
        Commands::RunModels(args) => commands::run_run_models(args, &config).await?,
        Commands::Decide(args) => commands::run_decide(args, &config).await?,
        Commands::Backtest(args) => commands::run_backtest_command(args).await?,
        Commands::Calibrate(args) => commands::run_calibrate(args, &config).await?,
        Commands::Fingerprint(args) => {
            commands::run_fingerprint(args).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>, profile: Option<&str>) -> anyhow::Result<AppConfig> {
    use anyhow::Context;

    match (path, profile) {
        (Some(path), _) => ConfigLoader::load_from(path)
            .with_context(|| format!("Failed to load configuration from {path}")),
        (None, Some(profile)) => ConfigLoader::load_with_profile(profile)
            .with_context(|| format!("Failed to load configuration profile {profile}")),
        (None, None) => ConfigLoader::load().context("Failed to load configuration"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_profile_are_exclusive() {
        let result = Cli::try_parse_from([
            "bookiex",
            "--config",
            "custom.toml",
            "--profile",
            "strict",
            "fingerprint",
            "--input",
            "a.json",
        ]);
        assert_eq!(
            result.err().map(|e| e.kind()),
            Some(clap::error::ErrorKind::ArgumentConflict)
        );
    }

    #[test]
    fn either_config_flag_alone_parses() {
        let cli = Cli::try_parse_from(["bookiex", "fingerprint", "-i", "a.json", "--profile", "strict"])
            .unwrap();
        assert_eq!(cli.profile.as_deref(), Some("strict"));
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["bookiex", "--config", "custom.toml", "fingerprint", "-i", "a.json"])
            .unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }
}
