use serde::{Deserialize, Serialize};

use crate::game::GameRecord;
use crate::model::ModelResult;

/// Model results for one game, keyed by model name, in run order.
///
/// While the runner is working it holds the results produced so far and
/// dependent models read their baseline from it by shared reference. Once
/// the game completes it is the game's name-to-result map; iteration order
/// is the run order, which arbitration relies on for tie-breaks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelResults {
    results: Vec<ModelResult>,
}

impl ModelResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a result by model name.
    #[must_use]
    pub fn get(&self, model_name: &str) -> Option<&ModelResult> {
        self.results.iter().find(|r| r.model_name == model_name)
    }

    #[must_use]
    pub fn contains(&self, model_name: &str) -> bool {
        self.get(model_name).is_some()
    }

    /// Appends a result. Callers are responsible for name uniqueness.
    pub fn push(&mut self, result: ModelResult) {
        self.results.push(result);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelResult> {
        self.results.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl From<Vec<ModelResult>> for ModelResults {
    fn from(results: Vec<ModelResult>) -> Self {
        Self { results }
    }
}

/// A projection model: a pure function of the game and earlier results.
///
/// Implementations must not fail on missing features; they return a result
/// with `None` values instead.
pub trait ProjectionModel: Send + Sync {
    /// Produces this model's result for `game`.
    fn run(&self, game: &GameRecord, prior: &ModelResults) -> ModelResult;

    /// Name the result is registered under.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_order_preserved() {
        let mut results = ModelResults::new();
        results.push(ModelResult::empty("baseline"));
        results.push(ModelResult::empty("fatigue"));

        assert!(results.contains("fatigue"));
        assert!(results.get("injury").is_none());
        let names: Vec<&str> = results.iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(names, vec!["baseline", "fatigue"]);
    }

    #[test]
    fn serializes_as_list() {
        let results = ModelResults::from(vec![ModelResult::empty("baseline")]);
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.is_array());

        let back: ModelResults = serde_json::from_value(json).unwrap();
        assert_eq!(back, results);
    }
}
