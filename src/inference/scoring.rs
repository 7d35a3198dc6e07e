use serde::Serialize;

use crate::facts::{FactKey, RawFacts};

const BASE_SCORE: i32 = 100;

/// One applied deduction or bonus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub factor: &'static str, // e.g. "Position", "Contrast"
    pub detail: String,       // e.g. "cta_position_y 900 > 800"
    pub delta: i32,
}

/// How a score was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Sum before clamping (may leave [0, 100])
    pub raw: i32,
    /// Final score, clamped to [0, 100]
    pub score: u32,
    pub adjustments: Vec<Adjustment>,
}

struct Tally {
    score: i32,
    adjustments: Vec<Adjustment>,
}

impl Tally {
    fn new() -> Self {
        Self {
            score: BASE_SCORE,
            adjustments: Vec::new(),
        }
    }

    fn apply(&mut self, factor: &'static str, detail: String, delta: i32) {
        self.score += delta;
        self.adjustments.push(Adjustment {
            factor,
            detail,
            delta,
        });
    }

    fn finish(self) -> ScoreBreakdown {
        ScoreBreakdown {
            raw: self.score,
            score: self.score.clamp(0, 100) as u32,
            adjustments: self.adjustments,
        }
    }
}

/// Score how easily users see the CTA (0-100).
///
/// Reads raw facts only; an absent fact takes its input default.
pub fn visibility_score(facts: &RawFacts) -> ScoreBreakdown {
    let mut tally = Tally::new();

    let position = facts.value_or_default(FactKey::CtaPositionY);
    if position > 800.0 {
        tally.apply("Position", format!("cta_position_y {} > 800", position), -30);
    } else if position > 600.0 {
        tally.apply("Position", format!("cta_position_y {} > 600", position), -15);
    } else if position <= 400.0 {
        tally.apply("Position", format!("cta_position_y {} <= 400", position), 5);
    }

    let contrast = facts.value_or_default(FactKey::ContrastRatio);
    if contrast < 3.0 {
        tally.apply("Contrast", format!("contrast_ratio {} < 3", contrast), -25);
    } else if contrast < 4.5 {
        tally.apply("Contrast", format!("contrast_ratio {} < 4.5", contrast), -10);
    } else if contrast >= 7.0 {
        tally.apply("Contrast", format!("contrast_ratio {} >= 7", contrast), 5);
    }

    let whitespace = facts.value_or_default(FactKey::WhitespaceAroundCta);
    if whitespace < 30.0 {
        tally.apply("Whitespace", format!("whitespace_around_cta {} < 30", whitespace), -20);
    } else if whitespace < 40.0 {
        tally.apply("Whitespace", format!("whitespace_around_cta {} < 40", whitespace), -10);
    }

    let ctas = facts.value_or_default(FactKey::NumberOfCtas);
    if ctas > 2.0 {
        tally.apply("CTA count", format!("number_of_ctas {} > 2", ctas), -15);
    } else if ctas > 1.0 {
        tally.apply("CTA count", format!("number_of_ctas {} > 1", ctas), -8);
    }

    let similar = facts.value_or_default(FactKey::SimilarColorElements);
    if similar > 2.0 {
        tally.apply("Color", format!("similar_color_elements {} > 2", similar), -10);
    } else if similar > 0.0 {
        tally.apply("Color", format!("similar_color_elements {} > 0", similar), -5);
    }

    tally.finish()
}

/// Score how easily users click the CTA (0-100).
///
/// Reads raw facts only; an absent fact takes its input default.
pub fn clickability_score(facts: &RawFacts) -> ScoreBreakdown {
    let mut tally = Tally::new();

    let width = facts.value_or_default(FactKey::CtaWidth);
    let height = facts.value_or_default(FactKey::CtaHeight);
    if width < 180.0 || height < 44.0 {
        tally.apply("Size", format!("{}x{} below 180x44", width, height), -30);
    } else if width < 200.0 || height < 50.0 {
        tally.apply("Size", format!("{}x{} below 200x50", width, height), -15);
    } else if width >= 250.0 && height >= 60.0 {
        tally.apply("Size", format!("{}x{} at least 250x60", width, height), 5);
    }

    let text_len = facts.value_or_default(FactKey::CtaTextLength);
    if text_len > 30.0 {
        tally.apply("Text length", format!("cta_text_length {} > 30", text_len), -25);
    } else if text_len > 25.0 {
        tally.apply("Text length", format!("cta_text_length {} > 25", text_len), -15);
    } else if text_len > 20.0 {
        tally.apply("Text length", format!("cta_text_length {} > 20", text_len), -8);
    } else if text_len <= 15.0 && text_len > 5.0 {
        tally.apply("Text length", format!("cta_text_length {} within 6-15", text_len), 5);
    }

    let clickables = facts.value_or_default(FactKey::ClickableElementsBeforeCta);
    if clickables > 7.0 {
        tally.apply(
            "Distractions",
            format!("clickable_elements_before_cta {} > 7", clickables),
            -20,
        );
    } else if clickables > 5.0 {
        tally.apply(
            "Distractions",
            format!("clickable_elements_before_cta {} > 5", clickables),
            -10,
        );
    }

    let mobile_width = facts.value_or_default(FactKey::CtaMobileWidth);
    let mobile_height = facts.value_or_default(FactKey::CtaMobileHeight);
    if mobile_width < 180.0 || mobile_height < 48.0 {
        tally.apply(
            "Mobile",
            format!("{}x{} below 180x48", mobile_width, mobile_height),
            -15,
        );
    } else if mobile_width < 200.0 {
        tally.apply("Mobile", format!("cta_mobile_width {} < 200", mobile_width), -8);
    }

    if facts.value_or_default(FactKey::HasLoadingAnimation) == 0.0 {
        tally.apply("Feedback", "no loading animation".to_string(), -10);
    }

    tally.finish()
}
