use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::facts::{FactKey, FactSet, Label};

/// Which score a rule speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Visibility,
    Clickability,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Visibility => f.write_str("visibility"),
            Category::Clickability => f.write_str("clickability"),
        }
    }
}

/// A numeric threshold test against a single fact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Threshold::LessThan(n) => value < *n,
            Threshold::LessEqual(n) => value <= *n,
            Threshold::GreaterThan(n) => value > *n,
            Threshold::GreaterEqual(n) => value >= *n,
            Threshold::Equal(n) => value == *n,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::LessThan(n) => write!(f, "< {}", n),
            Threshold::LessEqual(n) => write!(f, "<= {}", n),
            Threshold::GreaterThan(n) => write!(f, "> {}", n),
            Threshold::GreaterEqual(n) => write!(f, ">= {}", n),
            Threshold::Equal(n) => write!(f, "== {}", n),
        }
    }
}

/// Why a condition could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("fact '{0}' is missing")]
    MissingFact(FactKey),
    #[error("fact '{0}' is not a finite number ({1})")]
    NonFinite(FactKey, f64),
}

/// A rule's premise, as a small expression tree over the fact set.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Fact(FactKey, Threshold),
    Is(Label),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn fact(key: FactKey, threshold: Threshold) -> Self {
        Condition::Fact(key, threshold)
    }

    pub fn is(label: Label) -> Self {
        Condition::Is(label)
    }

    /// Evaluate against a fact set.
    ///
    /// `All` and `Any` short-circuit left to right, so a missing fact only
    /// fails the evaluation when it is actually reached.
    pub fn evaluate(&self, facts: &FactSet<'_>) -> Result<bool, EvalError> {
        match self {
            Condition::Fact(key, threshold) => {
                let value = facts.raw.get(*key).ok_or(EvalError::MissingFact(*key))?;
                if !value.is_finite() {
                    return Err(EvalError::NonFinite(*key, value));
                }
                Ok(threshold.matches(value))
            }
            Condition::Is(label) => Ok(facts.labels.has(*label)),
            Condition::All(parts) => {
                for part in parts {
                    if !part.evaluate(facts)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any(parts) => {
                for part in parts {
                    if part.evaluate(facts)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, parts: &[Condition], sep: &str) -> fmt::Result {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                match part {
                    Condition::All(_) | Condition::Any(_) => write!(f, "({})", part)?,
                    _ => write!(f, "{}", part)?,
                }
            }
            Ok(())
        }

        match self {
            Condition::Fact(key, threshold) => write!(f, "{} {}", key, threshold),
            Condition::Is(label) => write!(f, "{}", label),
            Condition::All(parts) => join(f, parts, " AND "),
            Condition::Any(parts) => join(f, parts, " OR "),
        }
    }
}

/// A weighted heuristic in the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: &'static str,
    /// Higher fires (and is reported) first
    pub priority: i32,
    /// A-priori confidence in [0, 1] when the rule activates
    pub certainty: f64,
    pub condition: Condition,
    pub conclusion: &'static str,
    pub explanation: &'static str,
    pub category: Category,
}

/// Result of evaluating one rule against one fact set.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Activated,
    NotActivated,
    Failed(EvalError),
}

impl Rule {
    pub fn evaluate(&self, facts: &FactSet<'_>) -> RuleOutcome {
        match self.condition.evaluate(facts) {
            Ok(true) => RuleOutcome::Activated,
            Ok(false) => RuleOutcome::NotActivated,
            Err(e) => RuleOutcome::Failed(e),
        }
    }
}
