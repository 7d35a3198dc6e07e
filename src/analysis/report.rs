use serde::Serialize;
use std::fmt;

use crate::explain::QualityTier;
use crate::facts::QualitativeLabels;
use crate::inference::{ActivatedRule, ScoreBreakdown};
use crate::knowledge::Category;

/// Number of recommendations kept in a [`SimpleReport`].
pub const SIMPLE_RECOMMENDATIONS: usize = 3;

/// One activated rule, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatedRuleReport {
    pub rule_id: String,
    pub priority: i32,
    pub certainty: f64,
    pub conclusion: String,
    pub explanation: String,
    pub category: Category,
}

impl From<&ActivatedRule<'_>> for ActivatedRuleReport {
    fn from(activated: &ActivatedRule<'_>) -> Self {
        Self {
            rule_id: activated.rule.id.to_string(),
            priority: activated.rule.priority,
            certainty: activated.certainty,
            conclusion: activated.rule.conclusion.to_string(),
            explanation: activated.rule.explanation.to_string(),
            category: activated.rule.category,
        }
    }
}

/// Qualitative reading of the combined certainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertaintyLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl CertaintyLevel {
    pub fn from_certainty(cf: f64) -> Self {
        if cf >= 0.9 {
            CertaintyLevel::VeryHigh
        } else if cf >= 0.8 {
            CertaintyLevel::High
        } else if cf >= 0.6 {
            CertaintyLevel::Medium
        } else {
            CertaintyLevel::Low
        }
    }

    /// Same text as the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            CertaintyLevel::VeryHigh => "very_high",
            CertaintyLevel::High => "high",
            CertaintyLevel::Medium => "medium",
            CertaintyLevel::Low => "low",
        }
    }
}

impl fmt::Display for CertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status labels derived from the two scores and the certainty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub visibility_status: QualityTier,
    pub clickability_status: QualityTier,
    pub certainty_level: CertaintyLevel,
    pub overall_status: String,
    /// Tier of the average score
    pub status: QualityTier,
    /// Average of both scores, one decimal
    pub average_score: String,
}

impl Summary {
    pub fn new(visibility: u32, clickability: u32, certainty: f64) -> Self {
        let average = (visibility + clickability) as f64 / 2.0;
        let status = QualityTier::from_score(average);
        let overall_status = match status {
            QualityTier::Excellent => "Excellent - the design is well optimized",
            QualityTier::Good => "Good - minor improvements needed",
            QualityTier::Medium => "Medium - needs improvement",
            QualityTier::Weak => "Weak - a redesign is recommended",
        };

        Self {
            visibility_status: QualityTier::from_score(visibility as f64),
            clickability_status: QualityTier::from_score(clickability as f64),
            certainty_level: CertaintyLevel::from_certainty(certainty),
            overall_status: overall_status.to_string(),
            status,
            average_score: format!("{:.1}", average),
        }
    }
}

/// Engine details that are useful for diagnostics but not part of the
/// report contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub visibility: ScoreBreakdown,
    pub clickability: ScoreBreakdown,
    /// (rule id, reason) for rules whose condition could not be evaluated
    pub failed_rules: Vec<(String, String)>,
}

/// Full result of analyzing one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub visibility_score: u32,
    pub clickability_score: u32,
    pub overall_certainty: f64,
    pub activated_rules: Vec<ActivatedRuleReport>,
    pub recommendations: Vec<String>,
    pub qualitative_inputs: QualitativeLabels,
    pub detailed_explanation: String,
    pub summary: Summary,
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

/// Condensed result: scores, certainty, top recommendations and summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleReport {
    pub visibility_score: u32,
    pub clickability_score: u32,
    pub overall_certainty: f64,
    pub recommendations: Vec<String>,
    pub summary: Summary,
}

impl From<&AnalysisReport> for SimpleReport {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            visibility_score: report.visibility_score,
            clickability_score: report.clickability_score,
            overall_certainty: report.overall_certainty,
            recommendations: report
                .recommendations
                .iter()
                .take(SIMPLE_RECOMMENDATIONS)
                .cloned()
                .collect(),
            summary: report.summary.clone(),
        }
    }
}
