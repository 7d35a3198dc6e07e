use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the quantitative facts measured on a landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKey {
    CtaPositionY,
    CtaWidth,
    CtaHeight,
    ContrastRatio,
    WhitespaceAroundCta,
    ScrollDepth,
    CtaClickRate,
    NumberOfCtas,
    CtaTextLength,
    TimeToCta,
    ClickableElementsBeforeCta,
    ContentWordCount,
    SimilarColorElements,
    LargestOtherElementSize,
    CtaMobileWidth,
    CtaMobileHeight,
    HasLoadingAnimation,
}

impl FactKey {
    /// Every fact, in input-schema order.
    pub const ALL: [FactKey; 17] = [
        FactKey::CtaPositionY,
        FactKey::CtaWidth,
        FactKey::CtaHeight,
        FactKey::ContrastRatio,
        FactKey::WhitespaceAroundCta,
        FactKey::ScrollDepth,
        FactKey::CtaClickRate,
        FactKey::NumberOfCtas,
        FactKey::CtaTextLength,
        FactKey::TimeToCta,
        FactKey::ClickableElementsBeforeCta,
        FactKey::ContentWordCount,
        FactKey::SimilarColorElements,
        FactKey::LargestOtherElementSize,
        FactKey::CtaMobileWidth,
        FactKey::CtaMobileHeight,
        FactKey::HasLoadingAnimation,
    ];

    /// Field name as it appears in fact files and `--set` overrides.
    pub fn name(self) -> &'static str {
        match self {
            FactKey::CtaPositionY => "cta_position_y",
            FactKey::CtaWidth => "cta_width",
            FactKey::CtaHeight => "cta_height",
            FactKey::ContrastRatio => "contrast_ratio",
            FactKey::WhitespaceAroundCta => "whitespace_around_cta",
            FactKey::ScrollDepth => "scroll_depth",
            FactKey::CtaClickRate => "cta_click_rate",
            FactKey::NumberOfCtas => "number_of_ctas",
            FactKey::CtaTextLength => "cta_text_length",
            FactKey::TimeToCta => "time_to_cta",
            FactKey::ClickableElementsBeforeCta => "clickable_elements_before_cta",
            FactKey::ContentWordCount => "content_word_count",
            FactKey::SimilarColorElements => "similar_color_elements",
            FactKey::LargestOtherElementSize => "largest_other_element_size",
            FactKey::CtaMobileWidth => "cta_mobile_width",
            FactKey::CtaMobileHeight => "cta_mobile_height",
            FactKey::HasLoadingAnimation => "has_loading_animation",
        }
    }

    /// Value assumed for this fact when the caller does not supply one.
    pub fn default_value(self) -> f64 {
        match self {
            FactKey::CtaPositionY => 500.0,
            FactKey::CtaWidth => 200.0,
            FactKey::CtaHeight => 50.0,
            FactKey::ContrastRatio => 4.5,
            FactKey::WhitespaceAroundCta => 40.0,
            FactKey::ScrollDepth => 60.0,
            FactKey::CtaClickRate => 3.5,
            FactKey::NumberOfCtas => 1.0,
            FactKey::CtaTextLength => 15.0,
            FactKey::TimeToCta => 8.0,
            FactKey::ClickableElementsBeforeCta => 3.0,
            FactKey::ContentWordCount => 300.0,
            FactKey::SimilarColorElements => 0.0,
            FactKey::LargestOtherElementSize => 8000.0,
            FactKey::CtaMobileWidth => 200.0,
            FactKey::CtaMobileHeight => 48.0,
            FactKey::HasLoadingAnimation => 1.0,
        }
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FactKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        FactKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown fact '{}'", s))
    }
}

/// Quantitative facts about one landing page.
///
/// Every field is optional: a fact file may describe only part of a page.
/// Use [`RawFacts::defaults`] and [`RawFacts::overlay`] to build a complete set.
///
/// Example YAML:
/// ```yaml
/// cta_position_y: 900
/// scroll_depth: 40
/// contrast_ratio: 2.5
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawFacts {
    /// CTA position, pixels from the top of the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_position_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_height: Option<f64>,
    /// Foreground/background contrast ratio (x:1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitespace_around_cta: Option<f64>,
    /// Percentage of the page users scroll through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_depth: Option<f64>,
    /// CTA click-through rate (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_click_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_ctas: Option<f64>,
    /// CTA label length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text_length: Option<f64>,
    /// Seconds until a user reaches the CTA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_cta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clickable_elements_before_cta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_word_count: Option<f64>,
    /// Elements sharing the CTA's color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_color_elements: Option<f64>,
    /// Area of the largest non-CTA element (square pixels)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub largest_other_element_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_mobile_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_mobile_height: Option<f64>,
    /// 1 if the CTA shows a loading animation after click, 0 otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_loading_animation: Option<f64>,
}

impl RawFacts {
    /// A fact set with every field at its default value.
    pub fn defaults() -> Self {
        let mut facts = RawFacts::default();
        for key in FactKey::ALL {
            facts.set(key, key.default_value());
        }
        facts
    }

    pub fn get(&self, key: FactKey) -> Option<f64> {
        *self.slot(key)
    }

    pub fn set(&mut self, key: FactKey, value: f64) {
        *self.slot_mut(key) = Some(value);
    }

    /// Value of `key`, falling back to its default when absent or non-finite.
    pub fn value_or_default(&self, key: FactKey) -> f64 {
        match self.get(key) {
            Some(v) if v.is_finite() => v,
            _ => key.default_value(),
        }
    }

    /// Layer `other` on top of `self`: every fact present in `other` wins.
    pub fn overlay(mut self, other: &RawFacts) -> Self {
        for key in FactKey::ALL {
            if let Some(value) = other.get(key) {
                self.set(key, value);
            }
        }
        self
    }

    /// Keys that have no value.
    pub fn missing(&self) -> Vec<FactKey> {
        FactKey::ALL
            .iter()
            .copied()
            .filter(|key| self.get(*key).is_none())
            .collect()
    }

    /// Apply a `key=value` override such as `cta_position_y=900`.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((key, value)) = assignment.split_once('=') else {
            bail!("Expected key=value, got '{}'", assignment);
        };
        let key: FactKey = key.parse()?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid number for {}: '{}'", key, value.trim()))?;
        self.set(key, value);
        Ok(())
    }

    fn slot(&self, key: FactKey) -> &Option<f64> {
        match key {
            FactKey::CtaPositionY => &self.cta_position_y,
            FactKey::CtaWidth => &self.cta_width,
            FactKey::CtaHeight => &self.cta_height,
            FactKey::ContrastRatio => &self.contrast_ratio,
            FactKey::WhitespaceAroundCta => &self.whitespace_around_cta,
            FactKey::ScrollDepth => &self.scroll_depth,
            FactKey::CtaClickRate => &self.cta_click_rate,
            FactKey::NumberOfCtas => &self.number_of_ctas,
            FactKey::CtaTextLength => &self.cta_text_length,
            FactKey::TimeToCta => &self.time_to_cta,
            FactKey::ClickableElementsBeforeCta => &self.clickable_elements_before_cta,
            FactKey::ContentWordCount => &self.content_word_count,
            FactKey::SimilarColorElements => &self.similar_color_elements,
            FactKey::LargestOtherElementSize => &self.largest_other_element_size,
            FactKey::CtaMobileWidth => &self.cta_mobile_width,
            FactKey::CtaMobileHeight => &self.cta_mobile_height,
            FactKey::HasLoadingAnimation => &self.has_loading_animation,
        }
    }

    fn slot_mut(&mut self, key: FactKey) -> &mut Option<f64> {
        match key {
            FactKey::CtaPositionY => &mut self.cta_position_y,
            FactKey::CtaWidth => &mut self.cta_width,
            FactKey::CtaHeight => &mut self.cta_height,
            FactKey::ContrastRatio => &mut self.contrast_ratio,
            FactKey::WhitespaceAroundCta => &mut self.whitespace_around_cta,
            FactKey::ScrollDepth => &mut self.scroll_depth,
            FactKey::CtaClickRate => &mut self.cta_click_rate,
            FactKey::NumberOfCtas => &mut self.number_of_ctas,
            FactKey::CtaTextLength => &mut self.cta_text_length,
            FactKey::TimeToCta => &mut self.time_to_cta,
            FactKey::ClickableElementsBeforeCta => &mut self.clickable_elements_before_cta,
            FactKey::ContentWordCount => &mut self.content_word_count,
            FactKey::SimilarColorElements => &mut self.similar_color_elements,
            FactKey::LargestOtherElementSize => &mut self.largest_other_element_size,
            FactKey::CtaMobileWidth => &mut self.cta_mobile_width,
            FactKey::CtaMobileHeight => &mut self.cta_mobile_height,
            FactKey::HasLoadingAnimation => &mut self.has_loading_animation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_every_fact() {
        let facts = RawFacts::defaults();
        assert!(facts.missing().is_empty());
        assert_eq!(facts.cta_position_y, Some(500.0));
        assert_eq!(facts.contrast_ratio, Some(4.5));
        assert_eq!(facts.largest_other_element_size, Some(8000.0));
        assert_eq!(facts.has_loading_animation, Some(1.0));
    }

    #[test]
    fn test_fact_key_names_roundtrip() {
        for key in FactKey::ALL {
            let parsed: FactKey = key.name().parse().unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn test_unknown_fact_key() {
        let err = "cta_color".parse::<FactKey>().unwrap_err();
        assert!(err.to_string().contains("cta_color"));
    }

    #[test]
    fn test_overlay_only_replaces_present_facts() {
        let mut top = RawFacts::default();
        top.set(FactKey::CtaPositionY, 900.0);

        let merged = RawFacts::defaults().overlay(&top);
        assert_eq!(merged.cta_position_y, Some(900.0));
        assert_eq!(merged.scroll_depth, Some(60.0));
    }

    #[test]
    fn test_value_or_default() {
        let mut facts = RawFacts::default();
        assert_eq!(facts.value_or_default(FactKey::CtaWidth), 200.0);
        facts.set(FactKey::CtaWidth, f64::NAN);
        assert_eq!(facts.value_or_default(FactKey::CtaWidth), 200.0);
        facts.set(FactKey::CtaWidth, 150.0);
        assert_eq!(facts.value_or_default(FactKey::CtaWidth), 150.0);
    }

    #[test]
    fn test_apply_assignment() {
        let mut facts = RawFacts::default();
        facts.apply_assignment("scroll_depth = 40").unwrap();
        assert_eq!(facts.scroll_depth, Some(40.0));

        assert!(facts.apply_assignment("scroll_depth").is_err());
        assert!(facts.apply_assignment("scroll_depth=deep").is_err());
        assert!(facts.apply_assignment("page_color=1").is_err());
    }

    #[test]
    fn test_partial_yaml_parse() {
        let yaml = r#"
cta_position_y: 900
contrast_ratio: 2.5
"#;
        let facts: RawFacts = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(facts.cta_position_y, Some(900.0));
        assert_eq!(facts.contrast_ratio, Some(2.5));
        assert_eq!(facts.missing().len(), 15);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "cta_colour: 3\n";
        assert!(serde_saphyr::from_str::<RawFacts>(yaml).is_err());
    }

    #[test]
    fn test_serialize_skips_absent_facts() {
        let mut facts = RawFacts::default();
        facts.set(FactKey::TimeToCta, 12.0);
        let json = serde_json::to_string(&facts).unwrap();
        assert_eq!(json, r#"{"time_to_cta":12.0}"#);
    }
}
