//! Fault Knowledge Base
//!
//! Holds the immutable table of PC fault rules used by the certainty factor
//! inference engine. The table is validated once at construction and never
//! mutated afterwards, so it can be shared freely between threads.

mod base;
mod error;
mod rule;

pub use base::KnowledgeBase;
pub use error::KnowledgeBaseError;
pub use rule::{Rule, RuleId};
