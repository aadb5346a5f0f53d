//! Inference Engine Implementation

use crate::certainty::{combine_repeated, to_percent, USER_CERTAINTY};
use crate::InferenceError;
use knowledge_base::{KnowledgeBase, Rule, RuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Certainty assigned to each observed symptom (default: 0.8)
    pub user_certainty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_certainty: USER_CERTAINTY,
        }
    }
}

/// Symptoms reported for one diagnosis request
///
/// Duplicates collapse; names unknown to the knowledge base are kept but
/// never match a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedSymptoms {
    symptoms: HashSet<String>,
}

impl ObservedSymptoms {
    /// Create an empty symptom set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symptom, returning false if it was already present
    pub fn insert(&mut self, symptom: impl Into<String>) -> bool {
        self.symptoms.insert(symptom.into())
    }

    /// Whether the symptom was observed
    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.contains(symptom)
    }

    /// Number of distinct symptoms
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    /// Check if no symptom was observed
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ObservedSymptoms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symptoms: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One ranked fault hypothesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Matched rule id
    pub rule_id: RuleId,
    /// Matched rule name
    pub rule_name: String,
    /// Recommended action
    pub remedy: String,
    /// Combined confidence, rounded to 0-100
    pub confidence_percent: u8,
    /// Observed symptoms that belong to the rule
    pub matched_symptom_count: usize,
    /// Symptoms defining the rule
    pub total_symptom_count: usize,
}

/// Certainty factor inference engine
///
/// Holds no mutable state; a single engine can serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    /// Rule table
    knowledge_base: Arc<KnowledgeBase>,
    /// Configuration
    config: EngineConfig,
}

impl InferenceEngine {
    /// Create an engine with the default user certainty
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        info!(
            "Creating inference engine: rules={}, user_certainty={}",
            knowledge_base.len(),
            USER_CERTAINTY
        );
        Self {
            knowledge_base,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with a custom configuration
    pub fn with_config(
        knowledge_base: Arc<KnowledgeBase>,
        config: EngineConfig,
    ) -> Result<Self, InferenceError> {
        let certainty = config.user_certainty;
        if !(certainty > 0.0 && certainty <= 1.0) {
            return Err(InferenceError::InvalidUserCertainty(certainty));
        }

        info!(
            "Creating inference engine: rules={}, user_certainty={}",
            knowledge_base.len(),
            certainty
        );
        Ok(Self {
            knowledge_base,
            config,
        })
    }

    /// Rank every rule sharing at least one symptom with `observed`.
    ///
    /// Results are ordered by confidence, highest first; equal confidences
    /// keep the knowledge base declaration order. An empty result means no
    /// rule matched and is not an error.
    pub fn diagnose(&self, observed: &ObservedSymptoms) -> Vec<DiagnosisResult> {
        let mut results: Vec<DiagnosisResult> = self
            .knowledge_base
            .all_rules()
            .iter()
            .filter_map(|rule| self.evaluate(rule, observed))
            .collect();

        // Stable: ties stay in declaration order
        results.sort_by(|a, b| b.confidence_percent.cmp(&a.confidence_percent));

        debug!(
            "Diagnosis complete: {} observed symptoms, {} matching rules",
            observed.len(),
            results.len()
        );
        results
    }

    /// Score a single rule, or `None` if none of its symptoms were observed
    fn evaluate(&self, rule: &Rule, observed: &ObservedSymptoms) -> Option<DiagnosisResult> {
        let matched = rule
            .symptoms
            .iter()
            .filter(|symptom| observed.contains(symptom))
            .count();

        if matched == 0 {
            return None;
        }

        let evidence = rule.base_confidence * self.config.user_certainty;
        let combined = combine_repeated(evidence, matched);

        Some(DiagnosisResult {
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            remedy: rule.remedy.clone(),
            confidence_percent: to_percent(combined),
            matched_symptom_count: matched,
            total_symptom_count: rule.symptom_count(),
        })
    }

    /// Get the knowledge base
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Get the configured user certainty
    pub fn user_certainty(&self) -> f64 {
        self.config.user_certainty
    }
}
