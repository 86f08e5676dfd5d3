//! Cross-model arbitration, confidence classification, actionability gating,
//! and per-game decision records.

pub mod confidence;
pub mod consensus;
pub mod decision;
pub mod gate;

pub use confidence::{classify, sign, Alignment, ConfidenceClassification, ConfidenceTier};
pub use consensus::{arbitrate, tally, ArbitrationPair, ArbitrationResult, ArbitrationTier};
pub use decision::{
    explain, DecisionEngine, DecisionExplanation, DecisionFactors, DecisionRecord, PrimarySource,
};
pub use gate::{Actionability, ActionabilityDecision};
