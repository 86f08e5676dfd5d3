//! CLI commands for the BookieX pipeline.

pub mod backtest;
pub mod calibrate;
pub mod decide;
pub mod fingerprint;
pub mod run_models;

pub use backtest::{run_backtest_command, BacktestArgs};
pub use calibrate::{run_calibrate, CalibrateArgs};
pub use decide::{run_decide, DecideArgs};
pub use fingerprint::{run_fingerprint, FingerprintArgs};
pub use run_models::{run_run_models, RunModelsArgs};
