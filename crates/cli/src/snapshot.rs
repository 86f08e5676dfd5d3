//! Snapshot files exchanged between pipeline stages.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bookiex_arbitration::DecisionRecord;
use bookiex_backtest::{BacktestSummary, GradedGame, SkippedGame};
use bookiex_models::GameModels;

pub const MODEL_VERSION: &str = "MULTI_MODEL_V1";

/// Output of `run-models`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultiModelSnapshot {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub games: Vec<GameModels>,
}

/// Output of `decide`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub generated_at: DateTime<Utc>,
    pub games: Vec<DecisionRecord>,
}

/// Per-game output of `backtest`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BacktestGamesSnapshot {
    pub generated_at: DateTime<Utc>,
    pub games: Vec<GradedGame>,
    #[serde(default)]
    pub skipped: Vec<SkippedGame>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BacktestSummarySnapshot {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: BacktestSummary,
}

/// Reads and parses a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse as `T`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Writes pretty-printed JSON, creating parent directories as needed.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value).context("Failed to serialize snapshot")?;
    write_bytes(path, body).await
}

/// Writes a CSV file from a header and string rows.
///
/// # Errors
/// Returns an error if encoding or the write fails.
pub async fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))?;
    write_bytes(path, body).await
}

async fn write_bytes(path: &Path, body: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// CSV cell for an optional value; empty when absent.
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
