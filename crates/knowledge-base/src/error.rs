//! Knowledge Base Error Types

use crate::rule::RuleId;
use thiserror::Error;

/// Errors raised while validating a rule table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnowledgeBaseError {
    /// Rule table has no rules at all
    #[error("Knowledge base contains no rules")]
    EmptyTable,

    /// Rule defines no symptoms
    #[error("Rule {rule_id} has an empty symptom set")]
    EmptySymptoms { rule_id: RuleId },

    /// Base confidence outside (0, 1]
    #[error("Rule {rule_id} base confidence {value} is out of range (0, 1]")]
    ConfidenceOutOfRange { rule_id: RuleId, value: f64 },

    /// Two rules share an id
    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(RuleId),

    /// Same symptom listed twice in one rule
    #[error("Rule {rule_id} lists symptom '{symptom}' more than once")]
    DuplicateSymptom { rule_id: RuleId, symptom: String },

    /// Rule table could not be parsed
    #[error("Invalid rule table: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for KnowledgeBaseError {
    fn from(err: serde_json::Error) -> Self {
        KnowledgeBaseError::Parse(err.to_string())
    }
}
