pub mod calibration;
pub mod grader;
pub mod runner;
pub mod summary;

pub use calibration::{
    bucket_index, bucket_labels, edge_percentiles, percentile, BiasBaseline, BucketWinRate,
    CalibrationSnapshot, PercentileValue, CALIBRATION_VERSION,
};
pub use grader::{grade_parlay, grade_spread, grade_total, GradedOutcome, Outcome};
pub use runner::{
    missing_market_fields, run_backtest, BacktestError, BacktestRun, GradedGame, ModelOutcome,
    SkippedGame, REASON_SCORES_MISSING,
};
pub use summary::{
    edge_decile, win_pct, BacktestSummary, Counts, DecileStat, GroupSummary, WagerTally,
};
