//! Fault Rule Definition

use crate::KnowledgeBaseError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rule identifier, unique within a knowledge base
pub type RuleId = u32;

/// A fault hypothesis with its defining symptoms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier
    pub id: RuleId,
    /// Human-readable fault label
    pub name: String,
    /// Symptoms defining this fault (order irrelevant)
    pub symptoms: Vec<String>,
    /// Prior confidence that the fault is present, in (0, 1]
    pub base_confidence: f64,
    /// Recommended action
    pub remedy: String,
}

impl Rule {
    /// Create a new rule
    pub fn new(
        id: RuleId,
        name: &str,
        symptoms: &[&str],
        base_confidence: f64,
        remedy: &str,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            base_confidence,
            remedy: remedy.to_string(),
        }
    }

    /// Check the rule's own invariants
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        if self.symptoms.is_empty() {
            return Err(KnowledgeBaseError::EmptySymptoms { rule_id: self.id });
        }

        // NaN fails both comparisons, so test for the valid range instead
        if !(self.base_confidence > 0.0 && self.base_confidence <= 1.0) {
            return Err(KnowledgeBaseError::ConfidenceOutOfRange {
                rule_id: self.id,
                value: self.base_confidence,
            });
        }

        let mut seen = HashSet::with_capacity(self.symptoms.len());
        for symptom in &self.symptoms {
            if !seen.insert(symptom.as_str()) {
                return Err(KnowledgeBaseError::DuplicateSymptom {
                    rule_id: self.id,
                    symptom: symptom.clone(),
                });
            }
        }

        Ok(())
    }

    /// Whether the rule lists the given symptom
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    /// Number of defining symptoms
    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rule() {
        let rule = Rule::new(1, "RAM rusak", &["Bunyi beep 3 kali"], 0.9, "Ganti RAM");
        assert!(rule.validate().is_ok());
        assert!(rule.has_symptom("Bunyi beep 3 kali"));
        assert!(!rule.has_symptom("Kipas bising"));
    }

    #[test]
    fn test_empty_symptoms_rejected() {
        let rule = Rule::new(7, "Kosong", &[], 0.5, "-");
        assert_eq!(
            rule.validate(),
            Err(KnowledgeBaseError::EmptySymptoms { rule_id: 7 })
        );
    }

    #[test]
    fn test_confidence_bounds() {
        assert!(Rule::new(1, "a", &["x"], 1.0, "-").validate().is_ok());
        assert!(Rule::new(1, "a", &["x"], 0.0, "-").validate().is_err());
        assert!(Rule::new(1, "a", &["x"], -0.2, "-").validate().is_err());
        assert!(Rule::new(1, "a", &["x"], 1.01, "-").validate().is_err());
        assert!(Rule::new(1, "a", &["x"], f64::NAN, "-").validate().is_err());
    }

    #[test]
    fn test_duplicate_symptom_rejected() {
        let rule = Rule::new(3, "a", &["x", "y", "x"], 0.5, "-");
        assert!(matches!(
            rule.validate(),
            Err(KnowledgeBaseError::DuplicateSymptom { rule_id: 3, .. })
        ));
    }
}
