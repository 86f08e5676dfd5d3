pub mod config;
pub mod config_loader;
pub mod error;
pub mod fingerprint;
pub mod game;
pub mod model;
pub mod traits;

pub use config::{
    AppConfig, ArbitrationThresholds, CalibrationConfig, ConfidenceConfig, DecisionConfig,
    GateThresholds, ModelKind, ModelsConfig,
};
pub use config_loader::ConfigLoader;
pub use error::{ConfigError, ContractError, GradingError, Wager};
pub use fingerprint::{fingerprint, round_to};
pub use game::{FinalScore, GameFeatures, GameRecord, MarketLines, MarketOdds, OddsSource};
pub use model::{ContextFlags, ModelResult, SpreadPick, TotalPick, CONTRACT_KEYS};
pub use traits::{ModelResults, ProjectionModel};
