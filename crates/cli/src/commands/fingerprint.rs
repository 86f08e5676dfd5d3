//! Prints the determinism digest of a snapshot file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::snapshot::read_json;

/// Arguments for the fingerprint command.
#[derive(Args, Debug, Clone)]
pub struct FingerprintArgs {
    /// JSON snapshot to digest
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Runs the fingerprint command, printing the digest to stdout.
///
/// # Errors
/// Returns an error if the input is not readable JSON.
pub async fn run_fingerprint(args: FingerprintArgs) -> Result<String> {
    let document: Value = read_json(&args.input).await?;
    let digest = bookiex_core::fingerprint(&document);
    println!("{digest}");
    Ok(digest)
}
