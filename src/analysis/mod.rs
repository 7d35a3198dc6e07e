//! Orchestrates conversion, inference and explanation into the report
//! returned to callers.

pub mod report;

pub use report::{
    ActivatedRuleReport, AnalysisReport, CertaintyLevel, Diagnostics, SimpleReport, Summary,
    SIMPLE_RECOMMENDATIONS,
};

use tracing::debug;

use crate::explain;
use crate::facts::RawFacts;
use crate::inference::InferenceEngine;
use crate::knowledge::KnowledgeBase;

/// Owns the knowledge base and analyzes pages against it.
///
/// Immutable after construction; wrap it in an `Arc` to share it between
/// threads or tasks.
#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    kb: KnowledgeBase,
}

impl AnalysisService {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn analyze(&self, facts: &RawFacts) -> AnalysisReport {
        let output = InferenceEngine::new(&self.kb).evaluate(facts);
        let detailed_explanation = explain::render(&output, facts);
        let summary = Summary::new(
            output.visibility_score(),
            output.clickability_score(),
            output.overall_certainty,
        );

        debug!(
            activated = output.activated_rules.len(),
            failed = output.failed_rules.len(),
            visibility = output.visibility_score(),
            clickability = output.clickability_score(),
            certainty = output.overall_certainty,
            "analysis complete"
        );

        AnalysisReport {
            visibility_score: output.visibility_score(),
            clickability_score: output.clickability_score(),
            overall_certainty: output.overall_certainty,
            activated_rules: output
                .activated_rules
                .iter()
                .map(ActivatedRuleReport::from)
                .collect(),
            recommendations: output.recommendations.clone(),
            qualitative_inputs: output.qualitative_inputs,
            detailed_explanation,
            summary,
            diagnostics: Diagnostics {
                visibility: output.visibility.clone(),
                clickability: output.clickability.clone(),
                failed_rules: output
                    .failed_rules
                    .iter()
                    .map(|failed| (failed.rule.id.to_string(), failed.error.to_string()))
                    .collect(),
            },
        }
    }

    pub fn analyze_simple(&self, facts: &RawFacts) -> SimpleReport {
        SimpleReport::from(&self.analyze(facts))
    }
}
