//! Outcome grading against final scores.
//!
//! Spread grading adds the home spread to the realized home margin: a
//! positive result means the home side covered. Missing picks or lines mean
//! no bet and grade to `None`; a bet with missing scores is an error.

use serde::{Deserialize, Serialize};

use bookiex_core::{FinalScore, GradingError, MarketLines, SpreadPick, TotalPick, Wager};

/// Settled result of a single wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

impl Outcome {
    fn from_win(win: bool) -> Self {
        if win {
            Self::Win
        } else {
            Self::Loss
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win => "WIN",
            Self::Loss => "LOSS",
            Self::Push => "PUSH",
        }
    }
}

/// Grades a spread pick.
///
/// An explicit PUSH pick grades PUSH without looking at the score.
///
/// # Errors
/// Returns [`GradingError::MissingScores`] when a pick and line are present
/// but the final score is not.
pub fn grade_spread(
    pick: Option<SpreadPick>,
    spread_home: Option<f64>,
    score: Option<FinalScore>,
) -> Result<Option<Outcome>, GradingError> {
    let (Some(pick), Some(spread_home)) = (pick, spread_home) else {
        return Ok(None);
    };
    if pick == SpreadPick::Push {
        return Ok(Some(Outcome::Push));
    }
    let score = score.ok_or(GradingError::MissingScores {
        wager: Wager::Spread,
    })?;

    let adjusted = f64::from(score.margin()) + spread_home;
    if adjusted == 0.0 {
        return Ok(Some(Outcome::Push));
    }
    Ok(Some(Outcome::from_win(
        (pick == SpreadPick::Home) == (adjusted > 0.0),
    )))
}

/// Grades a total pick.
///
/// # Errors
/// Returns [`GradingError::MissingScores`] when a pick and line are present
/// but the final score is not.
pub fn grade_total(
    pick: Option<TotalPick>,
    market_total: Option<f64>,
    score: Option<FinalScore>,
) -> Result<Option<Outcome>, GradingError> {
    let (Some(pick), Some(line)) = (pick, market_total) else {
        return Ok(None);
    };
    if pick == TotalPick::Push {
        return Ok(Some(Outcome::Push));
    }
    let score = score.ok_or(GradingError::MissingScores {
        wager: Wager::Total,
    })?;

    let actual = f64::from(score.total());
    if actual == line {
        return Ok(Some(Outcome::Push));
    }
    Ok(Some(Outcome::from_win(
        (pick == TotalPick::Over) == (actual > line),
    )))
}

/// Combines both legs. A loss on either leg loses the parlay.
#[must_use]
pub fn grade_parlay(spread: Option<Outcome>, total: Option<Outcome>) -> Option<Outcome> {
    let (spread, total) = (spread?, total?);
    if spread == Outcome::Loss || total == Outcome::Loss {
        Some(Outcome::Loss)
    } else if spread == Outcome::Push || total == Outcome::Push {
        Some(Outcome::Push)
    } else {
        Some(Outcome::Win)
    }
}

/// Grades for one set of picks against one game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradedOutcome {
    pub spread_result: Option<Outcome>,
    pub total_result: Option<Outcome>,
    pub parlay_result: Option<Outcome>,
    pub actual_margin: Option<i32>,
    pub actual_total: Option<i32>,
}

impl GradedOutcome {
    /// Grades both picks and the parlay.
    ///
    /// # Errors
    /// Returns [`GradingError`] when either leg is a bet without scores.
    pub fn grade(
        spread_pick: Option<SpreadPick>,
        total_pick: Option<TotalPick>,
        lines: &MarketLines,
        score: Option<FinalScore>,
    ) -> Result<Self, GradingError> {
        let spread_result = grade_spread(spread_pick, lines.spread_home, score)?;
        let total_result = grade_total(total_pick, lines.total, score)?;

        Ok(Self {
            spread_result,
            total_result,
            parlay_result: grade_parlay(spread_result, total_result),
            actual_margin: score.map(|s| s.margin()),
            actual_total: score.map(|s| s.total()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(home: i32, away: i32) -> Option<FinalScore> {
        Some(FinalScore { home, away })
    }

    // ============================================
    // Spread
    // ============================================

    #[test]
    fn home_favorite_covers() {
        // margin 7 - 3.5 > 0
        assert_eq!(
            grade_spread(Some(SpreadPick::Home), Some(-3.5), score(110, 103)),
            Ok(Some(Outcome::Win))
        );
        assert_eq!(
            grade_spread(Some(SpreadPick::Away), Some(-3.5), score(110, 103)),
            Ok(Some(Outcome::Loss))
        );
    }

    #[test]
    fn home_favorite_fails_to_cover() {
        // margin 2 - 3.5 < 0
        assert_eq!(
            grade_spread(Some(SpreadPick::Home), Some(-3.5), score(105, 103)),
            Ok(Some(Outcome::Loss))
        );
        assert_eq!(
            grade_spread(Some(SpreadPick::Away), Some(-3.5), score(105, 103)),
            Ok(Some(Outcome::Win))
        );
    }

    #[test]
    fn home_underdog_covers_in_a_close_loss() {
        // margin -3 + 4.5 > 0
        assert_eq!(
            grade_spread(Some(SpreadPick::Home), Some(4.5), score(100, 103)),
            Ok(Some(Outcome::Win))
        );
    }

    #[test]
    fn spread_push_on_exact_line_for_either_side() {
        for (home, away, line) in [(107, 100, -7.0), (100, 104, 4.0), (99, 99, 0.0)] {
            for pick in [SpreadPick::Home, SpreadPick::Away] {
                assert_eq!(
                    grade_spread(Some(pick), Some(line), score(home, away)),
                    Ok(Some(Outcome::Push)),
                    "{pick:?} {home}-{away} {line}"
                );
            }
        }
    }

    #[test]
    fn explicit_push_pick_grades_push_without_scores() {
        assert_eq!(
            grade_spread(Some(SpreadPick::Push), Some(-3.5), None),
            Ok(Some(Outcome::Push))
        );
    }

    #[test]
    fn no_pick_or_line_is_no_bet() {
        assert_eq!(grade_spread(None, Some(-3.5), score(1, 0)), Ok(None));
        assert_eq!(grade_spread(Some(SpreadPick::Home), None, None), Ok(None));
    }

    #[test]
    fn spread_bet_without_scores_is_error() {
        assert_eq!(
            grade_spread(Some(SpreadPick::Home), Some(-3.5), None),
            Err(GradingError::MissingScores {
                wager: Wager::Spread
            })
        );
    }

    // ============================================
    // Total
    // ============================================

    #[test]
    fn total_over_and_under() {
        assert_eq!(
            grade_total(Some(TotalPick::Over), Some(215.5), score(110, 106)),
            Ok(Some(Outcome::Win))
        );
        assert_eq!(
            grade_total(Some(TotalPick::Under), Some(215.5), score(110, 106)),
            Ok(Some(Outcome::Loss))
        );
        assert_eq!(
            grade_total(Some(TotalPick::Under), Some(220.0), score(110, 106)),
            Ok(Some(Outcome::Win))
        );
    }

    #[test]
    fn total_push_on_exact_line() {
        assert_eq!(
            grade_total(Some(TotalPick::Over), Some(216.0), score(110, 106)),
            Ok(Some(Outcome::Push))
        );
        assert_eq!(
            grade_total(Some(TotalPick::Push), Some(216.0), None),
            Ok(Some(Outcome::Push))
        );
    }

    #[test]
    fn total_bet_without_scores_is_error() {
        let err = grade_total(Some(TotalPick::Over), Some(216.0), None).unwrap_err();
        assert_eq!(err, GradingError::MissingScores { wager: Wager::Total });
        assert_eq!(grade_total(None, Some(216.0), None), Ok(None));
    }

    // ============================================
    // Parlay
    // ============================================

    #[test]
    fn parlay_loss_dominates() {
        use Outcome::{Loss, Push, Win};
        assert_eq!(grade_parlay(Some(Win), Some(Loss)), Some(Loss));
        assert_eq!(grade_parlay(Some(Loss), Some(Push)), Some(Loss));
        assert_eq!(grade_parlay(Some(Push), Some(Win)), Some(Push));
        assert_eq!(grade_parlay(Some(Win), Some(Win)), Some(Win));
        assert_eq!(grade_parlay(None, Some(Win)), None);
        assert_eq!(grade_parlay(Some(Loss), None), None);
    }

    #[test]
    fn graded_outcome_carries_actuals() {
        let lines = MarketLines {
            spread_home: Some(-3.5),
            total: Some(215.0),
            ..MarketLines::default()
        };
        let graded = GradedOutcome::grade(
            Some(SpreadPick::Away),
            Some(TotalPick::Over),
            &lines,
            score(100, 104),
        )
        .unwrap();

        assert_eq!(graded.spread_result, Some(Outcome::Win));
        assert_eq!(graded.total_result, Some(Outcome::Loss));
        assert_eq!(graded.parlay_result, Some(Outcome::Loss));
        assert_eq!(graded.actual_margin, Some(-4));
        assert_eq!(graded.actual_total, Some(204));
    }
}
