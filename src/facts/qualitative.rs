use serde::{Deserialize, Serialize};
use std::fmt;

use super::raw::{FactKey, RawFacts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextClarity {
    Good,
    Medium,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorUniqueness {
    Unique,
    Medium,
    Similar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualHierarchy {
    Strong,
    Medium,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

macro_rules! label_display {
    ($($ty:ident => { $($variant:ident => $text:literal),+ $(,)? })+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(match self {
                        $($ty::$variant => $text),+
                    })
                }
            }
        )+
    };
}

label_display! {
    ContentLength => { Short => "short", Medium => "medium", Long => "long" }
    TextClarity => { Good => "good", Medium => "medium", Poor => "poor" }
    ColorUniqueness => { Unique => "unique", Medium => "medium", Similar => "similar" }
    VisualHierarchy => { Strong => "strong", Medium => "medium", Weak => "weak" }
    YesNo => { Yes => "yes", No => "no" }
}

/// A single qualitative finding a rule condition can test for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    ContentLength(ContentLength),
    CtaTextClarity(TextClarity),
    CtaColorUniqueness(ColorUniqueness),
    VisualHierarchy(VisualHierarchy),
    MobileFriendly(YesNo),
    LoadingFeedback(YesNo),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::ContentLength(v) => write!(f, "content_length == {}", v),
            Label::CtaTextClarity(v) => write!(f, "cta_text_clarity == {}", v),
            Label::CtaColorUniqueness(v) => write!(f, "cta_color_uniqueness == {}", v),
            Label::VisualHierarchy(v) => write!(f, "visual_hierarchy == {}", v),
            Label::MobileFriendly(v) => write!(f, "mobile_friendly == {}", v),
            Label::LoadingFeedback(v) => write!(f, "loading_feedback == {}", v),
        }
    }
}

/// The six categorical labels derived from a page's raw facts.
///
/// Serializes to exactly six keys; raw inputs are never echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct QualitativeLabels {
    pub content_length: ContentLength,
    pub cta_text_clarity: TextClarity,
    pub cta_color_uniqueness: ColorUniqueness,
    pub visual_hierarchy: VisualHierarchy,
    pub mobile_friendly: YesNo,
    pub loading_feedback: YesNo,
}

impl QualitativeLabels {
    /// Whether the derived labels include `label`.
    pub fn has(&self, label: Label) -> bool {
        match label {
            Label::ContentLength(v) => self.content_length == v,
            Label::CtaTextClarity(v) => self.cta_text_clarity == v,
            Label::CtaColorUniqueness(v) => self.cta_color_uniqueness == v,
            Label::VisualHierarchy(v) => self.visual_hierarchy == v,
            Label::MobileFriendly(v) => self.mobile_friendly == v,
            Label::LoadingFeedback(v) => self.loading_feedback == v,
        }
    }
}

// Fallbacks for absent facts. These belong to the converter alone and differ
// from the input defaults for largest_other_element_size.
const WORD_COUNT_FALLBACK: f64 = 300.0;
const TEXT_LENGTH_FALLBACK: f64 = 15.0;
const SIMILAR_COLORS_FALLBACK: f64 = 0.0;
const CTA_WIDTH_FALLBACK: f64 = 200.0;
const CTA_HEIGHT_FALLBACK: f64 = 50.0;
const LARGEST_OTHER_FALLBACK: f64 = 150.0;
const MOBILE_WIDTH_FALLBACK: f64 = 200.0;
const MOBILE_HEIGHT_FALLBACK: f64 = 48.0;
const LOADING_ANIMATION_FALLBACK: f64 = 1.0;

/// Convert quantitative facts into qualitative labels.
///
/// Pure: the result depends only on `facts`.
pub fn convert(facts: &RawFacts) -> QualitativeLabels {
    let read = |key: FactKey, fallback: f64| match facts.get(key) {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    };

    let words = read(FactKey::ContentWordCount, WORD_COUNT_FALLBACK);
    let content_length = if words < 200.0 {
        ContentLength::Short
    } else if words < 400.0 {
        ContentLength::Medium
    } else {
        ContentLength::Long
    };

    let text_len = read(FactKey::CtaTextLength, TEXT_LENGTH_FALLBACK);
    let cta_text_clarity = if text_len > 5.0 && text_len <= 15.0 {
        TextClarity::Good
    } else if text_len > 15.0 && text_len <= 25.0 {
        TextClarity::Medium
    } else {
        TextClarity::Poor
    };

    let similar = read(FactKey::SimilarColorElements, SIMILAR_COLORS_FALLBACK);
    let cta_color_uniqueness = if similar == 0.0 {
        ColorUniqueness::Unique
    } else if similar <= 2.0 {
        ColorUniqueness::Medium
    } else {
        ColorUniqueness::Similar
    };

    let width = read(FactKey::CtaWidth, CTA_WIDTH_FALLBACK);
    let height = read(FactKey::CtaHeight, CTA_HEIGHT_FALLBACK);
    let area = width * height;
    let largest_other = read(FactKey::LargestOtherElementSize, LARGEST_OTHER_FALLBACK);
    let visual_hierarchy = if area > largest_other * 1.5 {
        VisualHierarchy::Strong
    } else if area > largest_other * 1.1 {
        VisualHierarchy::Medium
    } else {
        VisualHierarchy::Weak
    };

    let mobile_width = read(FactKey::CtaMobileWidth, MOBILE_WIDTH_FALLBACK);
    let mobile_height = read(FactKey::CtaMobileHeight, MOBILE_HEIGHT_FALLBACK);
    let mobile_friendly = YesNo::from(mobile_width >= 180.0 && mobile_height >= 48.0);

    let loading_feedback =
        YesNo::from(read(FactKey::HasLoadingAnimation, LOADING_ANIMATION_FALLBACK) > 0.0);

    QualitativeLabels {
        content_length,
        cta_text_clarity,
        cta_color_uniqueness,
        visual_hierarchy,
        mobile_friendly,
        loading_feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_with(key: FactKey, value: f64) -> RawFacts {
        let mut facts = RawFacts::defaults();
        facts.set(key, value);
        facts
    }

    #[test]
    fn test_defaults_convert() {
        let labels = convert(&RawFacts::defaults());
        assert_eq!(labels.content_length, ContentLength::Medium);
        assert_eq!(labels.cta_text_clarity, TextClarity::Good);
        assert_eq!(labels.cta_color_uniqueness, ColorUniqueness::Unique);
        // 200x50 = 10000 vs 8000: above 1.1x, below 1.5x
        assert_eq!(labels.visual_hierarchy, VisualHierarchy::Medium);
        assert_eq!(labels.mobile_friendly, YesNo::Yes);
        assert_eq!(labels.loading_feedback, YesNo::Yes);
    }

    #[test]
    fn test_content_length_boundaries() {
        let at = |n| convert(&facts_with(FactKey::ContentWordCount, n)).content_length;
        assert_eq!(at(199.0), ContentLength::Short);
        assert_eq!(at(200.0), ContentLength::Medium);
        assert_eq!(at(399.0), ContentLength::Medium);
        assert_eq!(at(400.0), ContentLength::Long);
    }

    #[test]
    fn test_text_clarity_boundaries() {
        let at = |n| convert(&facts_with(FactKey::CtaTextLength, n)).cta_text_clarity;
        assert_eq!(at(5.0), TextClarity::Poor);
        assert_eq!(at(6.0), TextClarity::Good);
        assert_eq!(at(15.0), TextClarity::Good);
        assert_eq!(at(16.0), TextClarity::Medium);
        assert_eq!(at(25.0), TextClarity::Medium);
        assert_eq!(at(26.0), TextClarity::Poor);
    }

    #[test]
    fn test_color_uniqueness_boundaries() {
        let at = |n| convert(&facts_with(FactKey::SimilarColorElements, n)).cta_color_uniqueness;
        assert_eq!(at(0.0), ColorUniqueness::Unique);
        assert_eq!(at(1.0), ColorUniqueness::Medium);
        assert_eq!(at(2.0), ColorUniqueness::Medium);
        assert_eq!(at(3.0), ColorUniqueness::Similar);
    }

    #[test]
    fn test_visual_hierarchy() {
        let at = |other| {
            convert(&facts_with(FactKey::LargestOtherElementSize, other)).visual_hierarchy
        };
        // CTA area is 10000
        assert_eq!(at(6000.0), VisualHierarchy::Strong);
        assert_eq!(at(8000.0), VisualHierarchy::Medium);
        assert_eq!(at(10000.0), VisualHierarchy::Weak);
    }

    #[test]
    fn test_mobile_friendly_requires_both_dimensions() {
        let mut facts = RawFacts::defaults();
        facts.set(FactKey::CtaMobileWidth, 179.0);
        assert_eq!(convert(&facts).mobile_friendly, YesNo::No);

        facts.set(FactKey::CtaMobileWidth, 180.0);
        facts.set(FactKey::CtaMobileHeight, 47.0);
        assert_eq!(convert(&facts).mobile_friendly, YesNo::No);

        facts.set(FactKey::CtaMobileHeight, 48.0);
        assert_eq!(convert(&facts).mobile_friendly, YesNo::Yes);
    }

    #[test]
    fn test_loading_feedback() {
        assert_eq!(
            convert(&facts_with(FactKey::HasLoadingAnimation, 0.0)).loading_feedback,
            YesNo::No
        );
    }

    #[test]
    fn test_absent_facts_use_converter_fallbacks() {
        let labels = convert(&RawFacts::default());
        assert_eq!(labels.content_length, ContentLength::Medium);
        assert_eq!(labels.cta_text_clarity, TextClarity::Good);
        // 200x50 against a 150px fallback element
        assert_eq!(labels.visual_hierarchy, VisualHierarchy::Strong);
        assert_eq!(labels.mobile_friendly, YesNo::Yes);
        assert_eq!(labels.loading_feedback, YesNo::Yes);
    }

    #[test]
    fn test_convert_is_pure() {
        let mut facts = RawFacts::defaults();
        facts.set(FactKey::ContentWordCount, 900.0);
        let first = convert(&facts);
        convert(&RawFacts::default());
        assert_eq!(convert(&facts), first);
    }

    #[test]
    fn test_serializes_only_six_labels() {
        let value = serde_json::to_value(convert(&RawFacts::defaults())).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map["content_length"], "medium");
        assert_eq!(map["mobile_friendly"], "yes");
        assert!(!map.contains_key("cta_width"));
    }

    #[test]
    fn test_label_lookup() {
        let labels = convert(&RawFacts::defaults());
        assert!(labels.has(Label::VisualHierarchy(VisualHierarchy::Medium)));
        assert!(!labels.has(Label::MobileFriendly(YesNo::No)));
    }
}
