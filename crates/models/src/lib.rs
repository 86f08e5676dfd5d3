//! Projection models and the ordered model runner.

pub mod generator;
pub mod registry;
pub mod runner;

pub use generator::{
    seed_for_game, BaselineModel, FatigueModel, InjuryModel, MarketBlendModel, NoiseModel,
    NOISE_RANGE,
};
pub use registry::ModelRegistry;
pub use runner::{BatchOutput, GameModels, ModelRunner};
