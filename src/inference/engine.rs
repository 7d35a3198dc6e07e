use tracing::{debug, trace};

use super::certainty::combine_all;
use super::scoring::{clickability_score, visibility_score, ScoreBreakdown};
use crate::facts::{FactSet, QualitativeLabels, RawFacts};
use crate::knowledge::{EvalError, KnowledgeBase, Rule, RuleOutcome};

/// Number of activated rules turned into recommendations.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// A rule whose condition held for the analyzed facts.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivatedRule<'kb> {
    pub rule: &'kb Rule,
    /// Certainty at activation time (currently the rule's own certainty)
    pub certainty: f64,
}

/// A rule whose condition could not be evaluated; treated as not activated.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRule<'kb> {
    pub rule: &'kb Rule,
    pub error: EvalError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput<'kb> {
    /// Sorted by priority descending, ties in declaration order
    pub activated_rules: Vec<ActivatedRule<'kb>>,
    pub failed_rules: Vec<FailedRule<'kb>>,
    pub visibility: ScoreBreakdown,
    pub clickability: ScoreBreakdown,
    pub overall_certainty: f64,
    pub recommendations: Vec<String>,
    pub qualitative_inputs: QualitativeLabels,
}

impl EngineOutput<'_> {
    pub fn visibility_score(&self) -> u32 {
        self.visibility.score
    }

    pub fn clickability_score(&self) -> u32 {
        self.clickability.score
    }
}

/// Forward-chaining evaluator over a borrowed knowledge base.
///
/// Holds no per-call state, so one engine (or many engines over the same
/// knowledge base) can serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine<'kb> {
    kb: &'kb KnowledgeBase,
}

impl<'kb> InferenceEngine<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    pub fn evaluate(&self, raw: &RawFacts) -> EngineOutput<'kb> {
        let facts = FactSet::new(raw);

        let mut activated_rules = Vec::new();
        let mut failed_rules = Vec::new();

        for rule in self.kb.rules() {
            match rule.evaluate(&facts) {
                RuleOutcome::Activated => {
                    trace!(rule = rule.id, "rule activated");
                    activated_rules.push(ActivatedRule {
                        rule,
                        certainty: rule.certainty,
                    });
                }
                RuleOutcome::NotActivated => {
                    trace!(rule = rule.id, "rule not activated");
                }
                RuleOutcome::Failed(error) => {
                    debug!(
                        rule = rule.id,
                        %error,
                        "rule evaluation failed, treating as not activated"
                    );
                    failed_rules.push(FailedRule { rule, error });
                }
            }
        }

        // sort_by is stable: equal priorities keep declaration order
        activated_rules.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority));

        let overall_certainty = combine_all(activated_rules.iter().map(|a| a.certainty));

        let recommendations = activated_rules
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|a| a.rule.conclusion.to_string())
            .collect();

        EngineOutput {
            activated_rules,
            failed_rules,
            visibility: visibility_score(raw),
            clickability: clickability_score(raw),
            overall_certainty,
            recommendations,
            qualitative_inputs: facts.labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactKey;
    use crate::knowledge::{Category, Condition, Threshold};

    fn ids(output: &EngineOutput<'_>) -> Vec<&'static str> {
        output.activated_rules.iter().map(|a| a.rule.id).collect()
    }

    fn with(pairs: &[(FactKey, f64)]) -> RawFacts {
        let mut facts = RawFacts::defaults();
        for (key, value) in pairs {
            facts.set(*key, *value);
        }
        facts
    }

    #[test]
    fn test_defaults_activate_nothing() {
        let kb = KnowledgeBase::standard();
        let output = InferenceEngine::new(&kb).evaluate(&RawFacts::defaults());

        assert!(output.activated_rules.is_empty());
        assert!(output.failed_rules.is_empty());
        assert_eq!(output.visibility_score(), 100);
        assert_eq!(output.clickability_score(), 100);
        assert_eq!(output.overall_certainty, 0.5);
        assert!(output.recommendations.is_empty());
    }

    #[test]
    fn test_below_fold_low_contrast() {
        let kb = KnowledgeBase::standard();
        let facts = with(&[
            (FactKey::CtaPositionY, 900.0),
            (FactKey::ScrollDepth, 40.0),
            (FactKey::ContrastRatio, 2.5),
        ]);
        let output = InferenceEngine::new(&kb).evaluate(&facts);

        assert_eq!(ids(&output), vec!["V1", "V2"]);
        assert_eq!(output.visibility_score(), 45);
        assert_eq!(output.clickability_score(), 100);
        assert_eq!(output.overall_certainty, 0.99);
        assert_eq!(
            output.recommendations,
            vec![
                kb.get("V1").unwrap().conclusion.to_string(),
                kb.get("V2").unwrap().conclusion.to_string()
            ]
        );
    }

    #[test]
    fn test_single_rule_certainty() {
        let kb = KnowledgeBase::standard();
        let facts = with(&[(FactKey::NumberOfCtas, 2.0)]);
        let output = InferenceEngine::new(&kb).evaluate(&facts);

        assert_eq!(ids(&output), vec!["V4"]);
        assert_eq!(output.overall_certainty, 0.80);
    }

    #[test]
    fn test_equal_priorities_keep_declaration_order() {
        let kb = KnowledgeBase::standard();
        // V1 and C1 share priority 10; V2, C2 and M1 share priority 9
        let facts = with(&[
            (FactKey::CtaPositionY, 900.0),
            (FactKey::ScrollDepth, 40.0),
            (FactKey::ContrastRatio, 2.5),
            (FactKey::CtaWidth, 150.0),
            (FactKey::CtaTextLength, 28.0),
            (FactKey::TimeToCta, 15.0),
            (FactKey::ContentWordCount, 500.0),
        ]);
        let output = InferenceEngine::new(&kb).evaluate(&facts);
        let order = ids(&output);

        assert_eq!(&order[..5], &["V1", "C1", "V2", "C2", "M1"]);
        for pair in output.activated_rules.windows(2) {
            assert!(pair[0].rule.priority >= pair[1].rule.priority);
        }
    }

    #[test]
    fn test_recommendations_capped_at_five() {
        let kb = KnowledgeBase::standard();
        let facts = with(&[
            (FactKey::CtaPositionY, 900.0),
            (FactKey::ScrollDepth, 40.0),
            (FactKey::ContrastRatio, 2.5),
            (FactKey::WhitespaceAroundCta, 10.0),
            (FactKey::NumberOfCtas, 3.0),
            (FactKey::CtaWidth, 150.0),
            (FactKey::CtaTextLength, 30.0),
        ]);
        let output = InferenceEngine::new(&kb).evaluate(&facts);

        assert!(output.activated_rules.len() > MAX_RECOMMENDATIONS);
        assert_eq!(output.recommendations.len(), MAX_RECOMMENDATIONS);
        assert_eq!(output.recommendations[0], output.activated_rules[0].rule.conclusion);
    }

    #[test]
    fn test_small_cta() {
        let kb = KnowledgeBase::standard();
        let facts = with(&[(FactKey::CtaWidth, 150.0), (FactKey::CtaHeight, 40.0)]);
        let output = InferenceEngine::new(&kb).evaluate(&facts);

        assert!(ids(&output).contains(&"C1"));
        // -30 for size, +5 for the default text length
        assert_eq!(output.clickability_score(), 75);
    }

    #[test]
    fn test_missing_facts_degrade_gracefully() {
        let kb = KnowledgeBase::standard();
        let mut facts = RawFacts::default();
        facts.set(FactKey::NumberOfCtas, 3.0);
        let output = InferenceEngine::new(&kb).evaluate(&facts);

        // V4 still fires; rules on absent facts fail without aborting
        assert!(ids(&output).contains(&"V4"));
        let missing_contrast = EvalError::MissingFact(FactKey::ContrastRatio);
        assert!(output
            .failed_rules
            .iter()
            .any(|f| f.rule.id == "V2" && f.error == missing_contrast));
        // Label-only rules never fail
        assert!(output.failed_rules.iter().all(|f| f.rule.id != "V5"));
    }

    #[test]
    fn test_deterministic() {
        let kb = KnowledgeBase::standard();
        let engine = InferenceEngine::new(&kb);
        let facts = with(&[(FactKey::CtaClickRate, 1.0), (FactKey::ContrastRatio, 3.5)]);
        assert_eq!(engine.evaluate(&facts), engine.evaluate(&facts));
    }

    #[test]
    fn test_custom_knowledge_base() {
        let kb = KnowledgeBase::from_rules(vec![Rule {
            id: "X1",
            priority: 1,
            certainty: 0.4,
            condition: Condition::fact(FactKey::TimeToCta, Threshold::GreaterEqual(0.0)),
            conclusion: "always",
            explanation: "always",
            category: Category::Visibility,
        }]);
        let output = InferenceEngine::new(&kb).evaluate(&RawFacts::defaults());
        assert_eq!(output.overall_certainty, 0.4);
        assert_eq!(output.recommendations, vec!["always".to_string()]);
    }

    #[test]
    fn test_rule_thresholds() {
        use FactKey::*;

        // (rule, facts layered on defaults, should fire)
        let cases: &[(&str, &[(FactKey, f64)], bool)] = &[
            ("V1", &[(CtaPositionY, 801.0), (ScrollDepth, 49.0)], true),
            ("V1", &[(CtaPositionY, 800.0), (ScrollDepth, 49.0)], false),
            ("V1", &[(CtaPositionY, 801.0), (ScrollDepth, 50.0)], false),
            ("V2", &[(ContrastRatio, 2.9)], true),
            ("V2", &[(ContrastRatio, 3.0)], false),
            ("V3", &[(WhitespaceAroundCta, 29.0)], true),
            ("V3", &[(WhitespaceAroundCta, 30.0)], false),
            ("V4", &[(NumberOfCtas, 2.0)], true),
            ("V4", &[(NumberOfCtas, 1.0)], false),
            ("V5", &[(SimilarColorElements, 3.0)], true),
            ("V5", &[(SimilarColorElements, 2.0)], false),
            (
                "V6",
                &[(CtaWidth, 200.0), (CtaHeight, 50.0), (LargestOtherElementSize, 10000.0)],
                true,
            ),
            (
                "V6",
                &[(CtaWidth, 200.0), (CtaHeight, 50.0), (LargestOtherElementSize, 9000.0)],
                false,
            ),
            ("C1", &[(CtaWidth, 179.0)], true),
            ("C1", &[(CtaWidth, 180.0)], false),
            ("C1", &[(CtaHeight, 43.0)], true),
            ("C1", &[(CtaHeight, 44.0)], false),
            ("C2", &[(CtaTextLength, 26.0)], true),
            ("C2", &[(CtaTextLength, 25.0)], false),
            ("C3", &[(CtaTextLength, 5.0)], true),
            ("C3", &[(CtaTextLength, 6.0)], false),
            ("C3", &[(CtaTextLength, 26.0)], true),
            ("C3", &[(CtaTextLength, 25.0)], false),
            ("C4", &[(ClickableElementsBeforeCta, 6.0)], true),
            ("C4", &[(ClickableElementsBeforeCta, 5.0)], false),
            ("C5", &[(CtaMobileWidth, 179.0), (CtaMobileHeight, 48.0)], true),
            ("C5", &[(CtaMobileWidth, 180.0), (CtaMobileHeight, 48.0)], false),
            ("C5", &[(CtaMobileWidth, 180.0), (CtaMobileHeight, 47.0)], true),
            ("C6", &[(HasLoadingAnimation, 0.0)], true),
            ("C6", &[(HasLoadingAnimation, 1.0)], false),
            ("M1", &[(TimeToCta, 13.0), (ContentWordCount, 400.0)], true),
            ("M1", &[(TimeToCta, 12.0), (ContentWordCount, 400.0)], false),
            ("M1", &[(TimeToCta, 13.0), (ContentWordCount, 399.0)], false),
            ("M2", &[(CtaClickRate, 1.9), (ContrastRatio, 3.9)], true),
            ("M2", &[(CtaClickRate, 2.0), (ContrastRatio, 3.9)], false),
            ("M2", &[(CtaClickRate, 1.9), (ContrastRatio, 4.0)], false),
            ("M3", &[(CtaPositionY, 499.0), (ScrollDepth, 71.0)], true),
            ("M3", &[(CtaPositionY, 500.0), (ScrollDepth, 71.0)], false),
            ("M3", &[(CtaPositionY, 499.0), (ScrollDepth, 70.0)], false),
            ("M4", &[(CtaClickRate, 5.1), (CtaWidth, 200.0)], true),
            ("M4", &[(CtaClickRate, 5.0), (CtaWidth, 200.0)], false),
            ("M4", &[(CtaClickRate, 5.1), (CtaWidth, 199.0)], false),
        ];

        let kb = KnowledgeBase::standard();
        let engine = InferenceEngine::new(&kb);
        for (rule, pairs, fires) in cases {
            let output = engine.evaluate(&with(pairs));
            assert_eq!(
                ids(&output).iter().any(|id| id == rule),
                *fires,
                "{} with {:?}",
                rule,
                pairs
            );
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let kb = KnowledgeBase::standard();
        let facts = with(&[(FactKey::NumberOfCtas, 2.0)]);
        let expected = InferenceEngine::new(&kb).evaluate(&facts).overall_certainty;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| InferenceEngine::new(&kb).evaluate(&facts).overall_certainty)
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
