//! Typed failures of the engine.
//!
//! Data absence is never an error: it flows through as `None`. The variants
//! here are contract violations that indicate a defect upstream.

use thiserror::Error;

/// A model result that breaks the output contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("[ModelContractError] game {game_id}: model '{registered}' returned result named '{returned}'")]
    NameMismatch {
        game_id: String,
        registered: String,
        returned: String,
    },

    #[error("[ModelContractError] game {game_id}: model '{model}' produced more than one result")]
    DuplicateModel { game_id: String, model: String },

    #[error("[ModelContractError] game {game_id}: model '{model}' missing keys {keys:?}")]
    MissingKeys {
        game_id: String,
        model: String,
        keys: Vec<String>,
    },

    #[error("[ModelContractError] game {game_id}: model '{model}' unexpected keys {keys:?}")]
    UnexpectedKeys {
        game_id: String,
        model: String,
        keys: Vec<String>,
    },

    #[error("[ModelContractError] game {game_id}: model '{model}' malformed result: {reason}")]
    Malformed {
        game_id: String,
        model: String,
        reason: String,
    },
}

impl ContractError {
    /// Game the violation occurred in.
    #[must_use]
    pub fn game_id(&self) -> &str {
        match self {
            Self::NameMismatch { game_id, .. }
            | Self::DuplicateModel { game_id, .. }
            | Self::MissingKeys { game_id, .. }
            | Self::UnexpectedKeys { game_id, .. }
            | Self::Malformed { game_id, .. } => game_id,
        }
    }
}

/// Wager type a grading call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wager {
    Spread,
    Total,
}

impl std::fmt::Display for Wager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spread => write!(f, "spread"),
            Self::Total => write!(f, "total"),
        }
    }
}

/// Grading was requested for a placed bet without the data to settle it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    #[error("final scores missing for {wager} grading")]
    MissingScores { wager: Wager },
}

/// Invalid engine configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("model order must not be empty")]
    EmptyModelOrder,

    #[error("model '{0}' appears more than once in the run order")]
    DuplicateModel(String),

    #[error("model '{model}' depends on '{baseline}', which must run before it")]
    DependencyOrder { model: String, baseline: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
