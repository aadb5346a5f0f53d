//! Knowledge Base Implementation

use crate::rule::{Rule, RuleId};
use crate::KnowledgeBaseError;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

/// Validated, read-only table of fault rules
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    /// Rules in declaration order
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// Create a knowledge base from a rule table, validating every rule
    pub fn new(rules: Vec<Rule>) -> Result<Self, KnowledgeBaseError> {
        if rules.is_empty() {
            return Err(KnowledgeBaseError::EmptyTable);
        }

        let mut ids = HashSet::with_capacity(rules.len());
        for rule in &rules {
            rule.validate()?;
            if !ids.insert(rule.id) {
                return Err(KnowledgeBaseError::DuplicateRuleId(rule.id));
            }
        }

        info!("Knowledge base loaded: {} rules", rules.len());
        Ok(Self { rules })
    }

    /// Create the built-in PC fault knowledge base
    ///
    /// The table is a compile-time constant; a malformed entry is a build
    /// defect and aborts initialization.
    pub fn builtin() -> Self {
        match Self::new(builtin_rules()) {
            Ok(kb) => kb,
            Err(e) => panic!("Built-in knowledge base is malformed: {}", e),
        }
    }

    /// Load a rule table from a JSON array of rules
    pub fn from_json(json: &str) -> Result<Self, KnowledgeBaseError> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        debug!("Parsed {} rules from JSON", rules.len());
        Self::new(rules)
    }

    /// All rules in declaration order
    pub fn all_rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Sorted, deduplicated union of every symptom referenced by a rule
    pub fn all_symptom_names(&self) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.symptoms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Look up a rule by id
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false for a constructed knowledge base
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            1,
            "Komputer tidak menyala",
            &["Indikator Power mati", "Kipas diam", "LED pada motherboard mati"],
            0.8,
            "Periksa PSU dan kabel power. Cek koneksi tombol power ke motherboard.",
        ),
        Rule::new(
            2,
            "RAM rusak",
            &["Bunyi beep 3 kali", "Layar black screen/blank", "Komputer restart sendiri"],
            0.9,
            "Lepas dan bersihkan RAM, lalu pasang kembali. Coba slot RAM berbeda.",
        ),
        Rule::new(
            3,
            "Hard disk bermasalah",
            &["Bunyi klik", "Booting lambat", "Blue screen"],
            0.85,
            "Backup data segera. Periksa kabel SATA dan ganti hard disk jika perlu.",
        ),
        Rule::new(
            4,
            "Overheat processor",
            &["Komputer restart sendiri", "Kipas bising", "Performa lambat"],
            0.75,
            "Bersihkan heatsink dan ganti thermal paste. Periksa sistem pendingin.",
        ),
        Rule::new(
            5,
            "VGA Card rusak",
            &["Layar black screen/blank", "Muncul artefak pada layar", "Blue screen"],
            0.82,
            "Bersihkan slot VGA. Coba VGA di komputer lain atau ganti VGA.",
        ),
        Rule::new(
            6,
            "Motherboard bermasalah",
            &["Bunyi beep 3 kali", "Slot RAM tidak berfungsi", "Komputer restart sendiri"],
            0.7,
            "Periksa kapasitor yang menggembung. Mungkin perlu ganti motherboard.",
        ),
    ]
}
