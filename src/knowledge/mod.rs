pub mod base;
pub mod rule;
pub mod validation;

pub use base::KnowledgeBase;
pub use rule::{Category, Condition, EvalError, Rule, RuleOutcome, Threshold};
pub use validation::validate_knowledge_base;

use serde::Serialize;

/// Serializable view of one rule, for listing the knowledge base.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleEntry {
    pub id: String,
    pub priority: i32,
    pub certainty: f64,
    pub conclusion: String,
    pub explanation: String,
    pub category: Category,
    pub condition: String,
}

impl From<&Rule> for RuleEntry {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.to_string(),
            priority: rule.priority,
            certainty: rule.certainty,
            conclusion: rule.conclusion.to_string(),
            explanation: rule.explanation.to_string(),
            category: rule.category,
            condition: rule.condition.to_string(),
        }
    }
}

/// The full rule listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleCatalog {
    pub total_rules: usize,
    pub rules: Vec<RuleEntry>,
}

impl RuleCatalog {
    pub fn new(kb: &KnowledgeBase) -> Self {
        let rules: Vec<RuleEntry> = kb.rules().iter().map(RuleEntry::from).collect();
        Self {
            total_rules: rules.len(),
            rules,
        }
    }
}
