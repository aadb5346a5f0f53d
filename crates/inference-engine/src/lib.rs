//! Certainty Factor Inference Engine
//!
//! Ranks the rules of a [`KnowledgeBase`] against a set of observed symptoms.
//! Each matched symptom contributes the same evidence term, the terms are
//! merged with the certainty factor combination rule, and the resulting
//! diagnoses are ordered by confidence.

mod certainty;
mod engine;

pub use certainty::{combine, combine_repeated, to_percent, USER_CERTAINTY};
pub use engine::{DiagnosisResult, EngineConfig, InferenceEngine, ObservedSymptoms};
pub use knowledge_base::{KnowledgeBase, Rule, RuleId};

use thiserror::Error;

/// Errors during engine construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("User certainty {0} is out of range (0, 1]")]
    InvalidUserCertainty(f64),
}
