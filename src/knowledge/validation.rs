use std::collections::HashSet;

use super::base::KnowledgeBase;

/// Validate the knowledge base at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_knowledge_base(kb: &KnowledgeBase) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    if kb.is_empty() {
        errors.push("knowledge base: contains no rules".to_string());
    }

    for (i, rule) in kb.rules().iter().enumerate() {
        if rule.id.trim().is_empty() {
            errors.push(format!("rules[{}].id: must not be empty", i));
        } else if !seen.insert(rule.id) {
            errors.push(format!("rules[{}].id: duplicate id '{}'", i, rule.id));
        }

        if !(0.0..=1.0).contains(&rule.certainty) {
            errors.push(format!(
                "rules[{}] ({}).certainty: must be within [0, 1] (got {})",
                i, rule.id, rule.certainty
            ));
        }

        if rule.conclusion.trim().is_empty() {
            errors.push(format!("rules[{}] ({}).conclusion: must not be empty", i, rule.id));
        }
        if rule.explanation.trim().is_empty() {
            errors.push(format!("rules[{}] ({}).explanation: must not be empty", i, rule.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactKey;
    use crate::knowledge::{Category, Condition, Rule, Threshold};

    fn rule(id: &'static str, certainty: f64) -> Rule {
        Rule {
            id,
            priority: 1,
            certainty,
            condition: Condition::fact(FactKey::NumberOfCtas, Threshold::GreaterThan(1.0)),
            conclusion: "conclusion",
            explanation: "explanation",
            category: Category::Visibility,
        }
    }

    #[test]
    fn test_standard_is_valid() {
        assert!(validate_knowledge_base(&KnowledgeBase::standard()).is_ok());
    }

    #[test]
    fn test_empty_knowledge_base() {
        let errors = validate_knowledge_base(&KnowledgeBase::from_rules(vec![])).unwrap_err();
        assert!(errors[0].contains("no rules"));
    }

    #[test]
    fn test_duplicate_id() {
        let kb = KnowledgeBase::from_rules(vec![rule("A", 0.5), rule("A", 0.6)]);
        let errors = validate_knowledge_base(&kb).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("rules[1].id: duplicate id 'A'"));
    }

    #[test]
    fn test_certainty_out_of_range() {
        let kb = KnowledgeBase::from_rules(vec![rule("A", 1.2)]);
        let errors = validate_knowledge_base(&kb).unwrap_err();
        assert!(errors[0].contains("certainty"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut blank = rule("", -0.1);
        blank.conclusion = "";
        let kb = KnowledgeBase::from_rules(vec![blank]);
        let errors = validate_knowledge_base(&kb).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
