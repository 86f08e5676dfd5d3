//! Ordered registry of projection models.
//!
//! Run order matters: a dependent model reads its baseline from the results
//! produced earlier in the same game, so the registry keeps registration
//! order rather than keying by name.

use bookiex_core::{ModelKind, ModelsConfig, OddsSource, ProjectionModel};

use crate::generator::{BaselineModel, FatigueModel, InjuryModel, MarketBlendModel, NoiseModel};

/// Models in run order.
pub struct ModelRegistry {
    models: Vec<Box<dyn ProjectionModel>>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::from_config(&ModelsConfig::default())
    }
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { models: Vec::new() }
    }

    /// Builds the built-in models in the configured order.
    #[must_use]
    pub fn from_config(config: &ModelsConfig) -> Self {
        let mut registry = Self::new();
        for kind in &config.order {
            registry.register(build(*kind, config.odds_source));
        }
        registry
    }

    /// Appends a model to the run order.
    ///
    /// Names are not checked here; a repeated name is reported by the runner
    /// as a contract violation for every game.
    pub fn register(&mut self, model: Box<dyn ProjectionModel>) {
        self.models.push(model);
    }

    /// Returns a model by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ProjectionModel> {
        self.models.iter().find(|m| m.name() == name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ProjectionModel> {
        self.models.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.names())
            .finish()
    }
}

fn build(kind: ModelKind, odds_source: OddsSource) -> Box<dyn ProjectionModel> {
    match kind {
        ModelKind::Baseline => Box::new(BaselineModel::new(odds_source)),
        ModelKind::Fatigue => Box::new(FatigueModel::new(odds_source)),
        ModelKind::Injury => Box::new(InjuryModel::new(odds_source)),
        ModelKind::Noise => Box::new(NoiseModel::new(odds_source)),
        ModelKind::MarketBlend => Box::new(MarketBlendModel::new(odds_source)),
    }
}
