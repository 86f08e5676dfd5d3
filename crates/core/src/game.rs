//! Per-event input records.
//!
//! A [`GameRecord`] is produced by the ingestion and feature pipelines and is
//! read-only inside the engine. Every market, feature, and score field is
//! optional: absence is expected data, not an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which bookmaker snapshot supplies the market lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsSource {
    /// Most recent line from the tracked book.
    #[default]
    Last,
    /// Cross-book consensus line.
    Consensus,
}

/// Market state for one game, in both snapshot variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketOdds {
    #[serde(default)]
    pub spread_home_last: Option<f64>,
    #[serde(default)]
    pub spread_away_last: Option<f64>,
    #[serde(default)]
    pub total_last: Option<f64>,
    #[serde(default)]
    pub moneyline_home_last: Option<f64>,
    #[serde(default)]
    pub moneyline_away_last: Option<f64>,
    #[serde(default)]
    pub spread_home_consensus: Option<f64>,
    #[serde(default)]
    pub spread_away_consensus: Option<f64>,
    #[serde(default)]
    pub total_consensus: Option<f64>,
    #[serde(default)]
    pub moneyline_home_consensus: Option<f64>,
    #[serde(default)]
    pub moneyline_away_consensus: Option<f64>,
}

impl MarketOdds {
    /// Resolves the lines for the requested snapshot.
    #[must_use]
    pub fn lines(&self, source: OddsSource) -> MarketLines {
        match source {
            OddsSource::Last => MarketLines {
                spread_home: self.spread_home_last,
                spread_away: self.spread_away_last,
                total: self.total_last,
                moneyline_home: self.moneyline_home_last,
                moneyline_away: self.moneyline_away_last,
            },
            OddsSource::Consensus => MarketLines {
                spread_home: self.spread_home_consensus,
                spread_away: self.spread_away_consensus,
                total: self.total_consensus,
                moneyline_home: self.moneyline_home_consensus,
                moneyline_away: self.moneyline_away_consensus,
            },
        }
    }
}

/// Lines resolved from a single snapshot.
///
/// `spread_home` follows the usual convention: negative means the home team
/// is favored by that many points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketLines {
    pub spread_home: Option<f64>,
    pub spread_away: Option<f64>,
    pub total: Option<f64>,
    pub moneyline_home: Option<f64>,
    pub moneyline_away: Option<f64>,
}

/// Precomputed team features supplied by the feature pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameFeatures {
    #[serde(default)]
    pub home_avg_points_for: Option<f64>,
    #[serde(default)]
    pub home_avg_points_against: Option<f64>,
    #[serde(default)]
    pub away_avg_points_for: Option<f64>,
    #[serde(default)]
    pub away_avg_points_against: Option<f64>,
    #[serde(default)]
    pub home_fatigue_score: Option<f64>,
    #[serde(default)]
    pub away_fatigue_score: Option<f64>,
    #[serde(default)]
    pub fatigue_diff_home_minus_away: Option<f64>,
    #[serde(default)]
    pub home_injury_impact: Option<f64>,
    #[serde(default)]
    pub away_injury_impact: Option<f64>,
}

/// Realized final score of a completed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub home: i32,
    pub away: i32,
}

impl FinalScore {
    /// Home minus away.
    #[must_use]
    pub const fn margin(&self) -> i32 {
        self.home - self.away
    }

    /// Combined points.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.home + self.away
    }
}

/// Immutable per-event input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Event identifier, unique per game.
    pub game_id: String,
    #[serde(default)]
    pub game_date: Option<NaiveDate>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(flatten)]
    pub odds: MarketOdds,
    #[serde(flatten)]
    pub features: GameFeatures,
    /// Final home points, absent until the game is complete.
    #[serde(default, deserialize_with = "points::deserialize_option")]
    pub home_points: Option<i32>,
    /// Final away points, absent until the game is complete.
    #[serde(default, deserialize_with = "points::deserialize_option")]
    pub away_points: Option<i32>,
}

/// Serde helpers for final points.
///
/// Upstream tables carry scores in nullable float columns, so `110.0` must
/// read as `110`. Fractional or out-of-range values are rejected.
pub mod points {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    fn whole<E: Error>(value: f64) -> Result<i32, E> {
        if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
            return Err(E::custom(format!("points must be a whole number, got {value}")));
        }
        #[allow(clippy::cast_possible_truncation)]
        let points = value as i32;
        Ok(points)
    }

    /// Reads points written as an integer or an integral float.
    ///
    /// # Errors
    /// Fails on non-numeric or fractional input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        whole(f64::deserialize(deserializer)?)
    }

    /// Optional variant of [`deserialize`]; `null` reads as `None`.
    ///
    /// # Errors
    /// Fails on non-numeric or fractional input.
    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i32>, D::Error> {
        Option::<f64>::deserialize(deserializer)?.map(whole).transpose()
    }
}

impl GameRecord {
    /// Creates a record with identity only; market, features, and scores empty.
    #[must_use]
    pub fn new(
        game_id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            game_date: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            odds: MarketOdds::default(),
            features: GameFeatures::default(),
            home_points: None,
            away_points: None,
        }
    }

    /// Sets the game date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.game_date = Some(date);
        self
    }

    /// Sets the "last" spread (home side; away is mirrored) and total.
    #[must_use]
    pub fn with_last_lines(mut self, spread_home: f64, total: f64) -> Self {
        self.odds.spread_home_last = Some(spread_home);
        self.odds.spread_away_last = Some(-spread_home);
        self.odds.total_last = Some(total);
        self
    }

    /// Sets the consensus spread (home side; away is mirrored) and total.
    #[must_use]
    pub fn with_consensus_lines(mut self, spread_home: f64, total: f64) -> Self {
        self.odds.spread_home_consensus = Some(spread_home);
        self.odds.spread_away_consensus = Some(-spread_home);
        self.odds.total_consensus = Some(total);
        self
    }

    /// Sets the rolling scoring averages.
    #[must_use]
    pub fn with_scoring(
        mut self,
        home_for: f64,
        home_against: f64,
        away_for: f64,
        away_against: f64,
    ) -> Self {
        self.features.home_avg_points_for = Some(home_for);
        self.features.home_avg_points_against = Some(home_against);
        self.features.away_avg_points_for = Some(away_for);
        self.features.away_avg_points_against = Some(away_against);
        self
    }

    /// Sets fatigue scores; the differential is derived as home minus away.
    #[must_use]
    pub fn with_fatigue(mut self, home: f64, away: f64) -> Self {
        self.features.home_fatigue_score = Some(home);
        self.features.away_fatigue_score = Some(away);
        self.features.fatigue_diff_home_minus_away = Some(home - away);
        self
    }

    /// Sets injury impact scores.
    #[must_use]
    pub fn with_injuries(mut self, home: f64, away: f64) -> Self {
        self.features.home_injury_impact = Some(home);
        self.features.away_injury_impact = Some(away);
        self
    }

    /// Sets the final score.
    #[must_use]
    pub fn with_final_score(mut self, home: i32, away: i32) -> Self {
        self.home_points = Some(home);
        self.away_points = Some(away);
        self
    }

    /// Market lines for the requested snapshot.
    #[must_use]
    pub fn lines(&self, source: OddsSource) -> MarketLines {
        self.odds.lines(source)
    }

    /// Final score, present only when both sides are known.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        match (self.home_points, self.away_points) {
            (Some(home), Some(away)) => Some(FinalScore { home, away }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_resolve_by_source() {
        let game = GameRecord::new("1", "BOS", "NYK")
            .with_last_lines(-3.5, 215.0)
            .with_consensus_lines(-4.0, 214.5);

        let last = game.lines(OddsSource::Last);
        assert_eq!(last.spread_home, Some(-3.5));
        assert_eq!(last.spread_away, Some(3.5));
        assert_eq!(last.total, Some(215.0));

        let consensus = game.lines(OddsSource::Consensus);
        assert_eq!(consensus.spread_home, Some(-4.0));
        assert_eq!(consensus.total, Some(214.5));
    }

    #[test]
    fn final_score_requires_both_sides() {
        let mut game = GameRecord::new("1", "BOS", "NYK");
        assert!(game.final_score().is_none());

        game.home_points = Some(101);
        assert!(game.final_score().is_none());

        game.away_points = Some(99);
        let score = game.final_score().unwrap();
        assert_eq!(score.margin(), 2);
        assert_eq!(score.total(), 200);
    }

    #[test]
    fn deserializes_flat_snapshot_with_missing_fields() {
        let json = r#"{
            "game_id": "0022400061",
            "game_date": "2024-10-22",
            "home_team": "Boston Celtics",
            "away_team": "New York Knicks",
            "spread_home_last": -6.5,
            "total_last": 223.5,
            "home_avg_points_for": 120.1,
            "home_points": null
        }"#;

        let game: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(game.game_id, "0022400061");
        assert_eq!(game.game_date, NaiveDate::from_ymd_opt(2024, 10, 22));
        assert_eq!(game.odds.spread_home_last, Some(-6.5));
        assert_eq!(game.odds.spread_away_last, None);
        assert_eq!(game.features.home_avg_points_for, Some(120.1));
        assert_eq!(game.features.away_avg_points_for, None);
        assert!(game.final_score().is_none());
    }

    // ============================================
    // Numeric shapes from upstream tables
    // ============================================

    #[test]
    fn fractional_consensus_moneyline_is_accepted() {
        let json = r#"{
            "game_id": "1",
            "moneyline_home_consensus": -112.5,
            "moneyline_away_consensus": 102,
            "moneyline_home_last": -110
        }"#;

        let game: GameRecord = serde_json::from_str(json).unwrap();
        let consensus = game.lines(OddsSource::Consensus);
        assert_eq!(consensus.moneyline_home, Some(-112.5));
        assert_eq!(consensus.moneyline_away, Some(102.0));
        assert_eq!(game.lines(OddsSource::Last).moneyline_home, Some(-110.0));
    }

    #[test]
    fn float_and_integer_scores_are_accepted() {
        let floats: GameRecord =
            serde_json::from_str(r#"{"game_id": "1", "home_points": 110.0, "away_points": 104.0}"#)
                .unwrap();
        let ints: GameRecord =
            serde_json::from_str(r#"{"game_id": "1", "home_points": 110, "away_points": 104}"#)
                .unwrap();

        assert_eq!(floats.final_score(), Some(FinalScore { home: 110, away: 104 }));
        assert_eq!(floats, ints);
    }

    #[test]
    fn fractional_score_is_rejected() {
        let result =
            serde_json::from_str::<GameRecord>(r#"{"game_id": "1", "home_points": 110.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn scores_round_trip_as_integers() {
        let game = GameRecord::new("1", "BOS", "NYK").with_final_score(110, 104);
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["home_points"], 110);

        let back: GameRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, game);
    }
}
