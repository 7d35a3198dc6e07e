use std::fmt;

use super::tier::QualityTier;
use crate::facts::{FactKey, RawFacts};
use crate::inference::EngineOutput;

const RULE: &str = "==================================================";

/// Display label and unit for each echoed raw fact.
const ECHOED_FACTS: [(FactKey, &str, &str); 17] = [
    (FactKey::CtaPositionY, "CTA position", " px"),
    (FactKey::CtaWidth, "CTA width", " px"),
    (FactKey::CtaHeight, "CTA height", " px"),
    (FactKey::ContrastRatio, "Contrast ratio", ":1"),
    (FactKey::WhitespaceAroundCta, "Whitespace around CTA", " px"),
    (FactKey::ScrollDepth, "Scroll depth", "%"),
    (FactKey::CtaClickRate, "Click rate", "%"),
    (FactKey::NumberOfCtas, "Number of CTAs", ""),
    (FactKey::CtaTextLength, "CTA text length", " chars"),
    (FactKey::TimeToCta, "Time to CTA", " s"),
    (FactKey::ClickableElementsBeforeCta, "Clickable elements before CTA", ""),
    (FactKey::ContentWordCount, "Content word count", ""),
    (FactKey::SimilarColorElements, "Similar-color elements", ""),
    (FactKey::LargestOtherElementSize, "Largest other element", " px²"),
    (FactKey::CtaMobileWidth, "Mobile CTA width", " px"),
    (FactKey::CtaMobileHeight, "Mobile CTA height", " px"),
    (FactKey::HasLoadingAnimation, "Loading animation", ""),
];

/// Human-readable reasoning trace for one analysis.
///
/// Formatting only: scores, certainty and ordering come from the engine
/// output as-is.
pub struct Trace<'a> {
    output: &'a EngineOutput<'a>,
    facts: &'a RawFacts,
}

impl<'a> Trace<'a> {
    pub fn new(output: &'a EngineOutput<'a>, facts: &'a RawFacts) -> Self {
        Self { output, facts }
    }
}

/// Render the reasoning trace as text.
pub fn render(output: &EngineOutput<'_>, facts: &RawFacts) -> String {
    Trace::new(output, facts).to_string()
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self.output;

        writeln!(f, "Reasoning trace")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;

        writeln!(f, "Input facts (quantitative):")?;
        for (key, label, unit) in ECHOED_FACTS {
            match self.facts.get(key) {
                Some(value) => writeln!(f, "  - {}: {}{}", label, value, unit)?,
                None => writeln!(f, "  - {}: N/A", label)?,
            }
        }
        writeln!(f)?;

        let labels = &output.qualitative_inputs;
        writeln!(f, "Derived facts (qualitative):")?;
        writeln!(f, "  - Content length: {}", labels.content_length)?;
        writeln!(f, "  - CTA text clarity: {}", labels.cta_text_clarity)?;
        writeln!(f, "  - CTA color uniqueness: {}", labels.cta_color_uniqueness)?;
        writeln!(f, "  - Visual hierarchy: {}", labels.visual_hierarchy)?;
        writeln!(f, "  - Mobile friendly: {}", labels.mobile_friendly)?;
        writeln!(f, "  - Loading feedback: {}", labels.loading_feedback)?;
        writeln!(f)?;

        writeln!(f, "Activated rules (by priority):")?;
        writeln!(f)?;
        if output.activated_rules.is_empty() {
            writeln!(f, "   No serious issues detected.")?;
            writeln!(f)?;
        }
        for (i, activated) in output.activated_rules.iter().enumerate() {
            let rule = activated.rule;
            writeln!(
                f,
                "{}. Rule {} (priority: {}, certainty: {})",
                i + 1,
                rule.id,
                rule.priority,
                activated.certainty
            )?;
            writeln!(f, "   Category: {}", rule.category)?;
            writeln!(f, "   -> {}", rule.conclusion)?;
            writeln!(f, "   Why: {}", rule.explanation)?;
            writeln!(f)?;
        }

        let visibility = output.visibility_score();
        let clickability = output.clickability_score();
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Results:")?;
        writeln!(f)?;
        writeln!(f, "  - Visibility score: {}/100", visibility)?;
        writeln!(f, "  - Clickability score: {}/100", clickability)?;
        writeln!(
            f,
            "  - Overall certainty (CF): {:.0}%",
            output.overall_certainty * 100.0
        )?;
        writeln!(f)?;

        writeln!(f, "Assessment:")?;
        writeln!(
            f,
            "  - CTA visibility: {}",
            QualityTier::from_score(visibility as f64)
        )?;
        writeln!(
            f,
            "  - CTA clickability: {}",
            QualityTier::from_score(clickability as f64)
        )?;
        writeln!(f)?;

        writeln!(f, "{}", RULE)?;
        writeln!(f, "Prioritized recommendations:")?;
        writeln!(f)?;
        if output.recommendations.is_empty() {
            writeln!(f, "The design looks great. No immediate improvements needed.")?;
        }
        for (i, recommendation) in output.recommendations.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, recommendation)?;
        }

        Ok(())
    }
}
