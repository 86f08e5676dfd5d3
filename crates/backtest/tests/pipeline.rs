//! Games through models, decisions, grading, summary, and calibration.

use bookiex_arbitration::{Actionability, DecisionEngine, DecisionRecord};
use bookiex_backtest::{
    run_backtest, BacktestSummary, CalibrationSnapshot, Outcome, REASON_SCORES_MISSING,
};
use bookiex_core::{fingerprint, AppConfig, GameRecord};
use bookiex_models::{ModelRegistry, ModelRunner};

fn scenario(id: &str) -> GameRecord {
    GameRecord::new(id, "Boston Celtics", "New York Knicks")
        .with_scoring(110.0, 112.0, 104.0, 108.0)
        .with_last_lines(-3.5, 215.0)
}

fn decisions() -> Vec<DecisionRecord> {
    let games = vec![
        scenario("1").with_final_score(100, 104),
        scenario("2"),
        GameRecord::new("3", "A", "B").with_last_lines(-2.0, 220.0).with_final_score(99, 98),
    ];

    let config = AppConfig::default();
    let batch = ModelRunner::new(ModelRegistry::from_config(&config.models)).run_batch(&games);
    assert!(batch.is_clean());

    let engine = DecisionEngine::new(&config);
    batch
        .games
        .into_iter()
        .map(|output| engine.decide(&output.game, output.models))
        .collect()
}

#[test]
fn grades_authority_and_skips_incomplete_games() {
    let run = run_backtest(&decisions()).unwrap();

    assert_eq!(run.games.len(), 1);
    let game = &run.games[0];
    assert_eq!(game.game_id, "1");
    assert_eq!(game.actionability, Actionability::Action);
    // margin -4 + spread -3.5 = -7.5: the AWAY pick covers. 204 under 215.
    assert_eq!(game.outcome.spread_result, Some(Outcome::Win));
    assert_eq!(game.outcome.total_result, Some(Outcome::Loss));
    assert_eq!(game.outcome.parlay_result, Some(Outcome::Loss));
    assert_eq!(game.outcome.actual_margin, Some(-4));
    assert_eq!(game.outcome.actual_total, Some(204));

    let names: Vec<&str> = game.model_results.iter().map(|m| m.model_name.as_str()).collect();
    assert_eq!(names, vec!["baseline", "fatigue", "injury", "noise"]);
    assert_eq!(game.model_results[0].spread_result, Some(Outcome::Win));

    assert_eq!(run.skipped.len(), 2);
    assert_eq!(run.skipped[0].game_id, "2");
    assert_eq!(run.skipped[0].reason, REASON_SCORES_MISSING);
    assert_eq!(run.skipped[1].game_id, "3");
    assert_eq!(
        run.skipped[1].reason,
        "Missing market fields: [\"spread_pick\", \"total_pick\"]"
    );
}

#[test]
fn summary_counts_and_tallies() {
    let run = run_backtest(&decisions()).unwrap();
    let summary = BacktestSummary::from_run(&run);

    assert_eq!(summary.counts.games_total, 3);
    assert_eq!(summary.counts.games_graded, 1);
    assert_eq!(summary.counts.games_skipped, 2);
    assert_eq!(summary.counts.skipped_reasons[REASON_SCORES_MISSING], 1);

    assert_eq!(summary.overall.spread.wins, 1);
    assert!((summary.overall.spread.win_pct - 100.0).abs() < f64::EPSILON);
    assert_eq!(summary.overall.total.losses, 1);
    assert_eq!(summary.overall.parlay.losses, 1);
    assert!(summary.by_actionability.contains_key(&Actionability::Action));
}

#[test]
fn calibration_snapshot_over_graded_games() {
    let run = run_backtest(&decisions()).unwrap();
    let snapshot = CalibrationSnapshot::build(&run.games, &AppConfig::default().calibration);

    assert_eq!(snapshot.total_games_used, 1);
    assert!(snapshot
        .spread_edge_percentiles
        .iter()
        .all(|p| (p.value - 2.5).abs() < 1e-12));

    let bucket = &snapshot.spread_bucket_win_rates[2];
    assert_eq!(bucket.bucket, "2-4");
    assert_eq!(bucket.win_rate, Some(1.0));

    // Home is favored at -3.5, so the AWAY pick is on the underdog.
    assert_eq!(snapshot.bias_baseline.dog_win_rate, Some(1.0));
    assert_eq!(snapshot.bias_baseline.favorite_win_rate, None);
    assert_eq!(snapshot.bias_baseline.over_win_rate, Some(0.0));
}

#[test]
fn repeated_runs_share_a_fingerprint() {
    let first = BacktestSummary::from_run(&run_backtest(&decisions()).unwrap());
    let second = BacktestSummary::from_run(&run_backtest(&decisions()).unwrap());

    assert_eq!(
        fingerprint(&serde_json::to_value(&first).unwrap()),
        fingerprint(&serde_json::to_value(&second).unwrap())
    );
}
