use crate::facts::{
    ColorUniqueness, ContentLength, FactKey, Label, TextClarity, VisualHierarchy, YesNo,
};

use super::rule::{Category, Condition, Rule, Threshold};

/// The fixed, ordered rule table.
///
/// Built once and read-only afterwards, so one instance can be shared across
/// threads without locking. Declaration order is the tie-break for rules of
/// equal priority.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// The standard CTA knowledge base (16 rules).
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    /// Build a knowledge base from an arbitrary rule list.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.category == category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::standard()
    }
}

fn fact(key: FactKey, threshold: Threshold) -> Condition {
    Condition::fact(key, threshold)
}

fn standard_rules() -> Vec<Rule> {
    use FactKey::*;
    use Threshold::*;

    vec![
        // Visibility
        Rule {
            id: "V1",
            priority: 10,
            certainty: 0.95,
            condition: Condition::All(vec![
                fact(CtaPositionY, GreaterThan(800.0)),
                fact(ScrollDepth, LessThan(50.0)),
            ]),
            conclusion: "CTA is poorly placed: it sits below the fold and users do not reach it",
            explanation: "57% of users never scroll 800 pixels deep. The CTA should sit within the first 600 pixels.",
            category: Category::Visibility,
        },
        Rule {
            id: "V2",
            priority: 9,
            certainty: 0.90,
            condition: fact(ContrastRatio, LessThan(3.0)),
            conclusion: "CTA color contrast is very weak - it is hard to see",
            explanation: "A contrast ratio below 3:1 makes the CTA blend into the background.",
            category: Category::Visibility,
        },
        Rule {
            id: "V3",
            priority: 8,
            certainty: 0.85,
            condition: fact(WhitespaceAroundCta, LessThan(30.0)),
            conclusion: "Not enough whitespace around the CTA - it gets lost",
            explanation: "Less than 40 pixels of whitespace lets the CTA disappear among the surrounding elements.",
            category: Category::Visibility,
        },
        Rule {
            id: "V4",
            priority: 7,
            certainty: 0.80,
            condition: fact(NumberOfCtas, GreaterThan(1.0)),
            conclusion: "Several CTAs compete and confuse the user",
            explanation: "Studies show that offering more than one CTA cuts conversion by 26%.",
            category: Category::Visibility,
        },
        Rule {
            id: "V5",
            priority: 6,
            certainty: 0.75,
            condition: Condition::is(Label::CtaColorUniqueness(ColorUniqueness::Similar)),
            conclusion: "CTA color matches other elements - it does not stand out",
            explanation: "The CTA should use a color that no other element on the page shares.",
            category: Category::Visibility,
        },
        Rule {
            id: "V6",
            priority: 5,
            certainty: 0.70,
            condition: Condition::is(Label::VisualHierarchy(VisualHierarchy::Weak)),
            conclusion: "Weak visual hierarchy - the CTA is not prominent",
            explanation: "The CTA should be the largest and most prominent clickable element on the page.",
            category: Category::Visibility,
        },
        // Clickability
        Rule {
            id: "C1",
            priority: 10,
            certainty: 0.95,
            condition: Condition::Any(vec![
                fact(CtaWidth, LessThan(180.0)),
                fact(CtaHeight, LessThan(44.0)),
            ]),
            conclusion: "CTA is too small - it is hard to click",
            explanation: "Recommended minimum CTA size is 200x50 pixels (48x48 on mobile).",
            category: Category::Clickability,
        },
        Rule {
            id: "C2",
            priority: 9,
            certainty: 0.90,
            condition: fact(CtaTextLength, GreaterThan(25.0)),
            conclusion: "CTA text is too long",
            explanation: "CTA text should be two or three words at most. Lead with a short imperative verb.",
            category: Category::Clickability,
        },
        Rule {
            id: "C3",
            priority: 8,
            certainty: 0.85,
            condition: Condition::is(Label::CtaTextClarity(TextClarity::Poor)),
            conclusion: "CTA text is neither clear nor motivating",
            explanation: "Prefer value-driven phrases such as 'Start free' over generic ones such as 'Sign up'.",
            category: Category::Clickability,
        },
        Rule {
            id: "C4",
            priority: 7,
            certainty: 0.80,
            condition: fact(ClickableElementsBeforeCta, GreaterThan(5.0)),
            conclusion: "Too many clickable elements appear before the CTA",
            explanation: "Every extra clickable element lowers the chance of a CTA click by 8%.",
            category: Category::Clickability,
        },
        Rule {
            id: "C5",
            priority: 6,
            certainty: 0.75,
            condition: Condition::is(Label::MobileFriendly(YesNo::No)),
            conclusion: "CTA is not optimized for mobile",
            explanation: "60% of traffic is mobile. The mobile CTA must be at least 48x48 pixels.",
            category: Category::Clickability,
        },
        Rule {
            id: "C6",
            priority: 5,
            certainty: 0.70,
            condition: Condition::is(Label::LoadingFeedback(YesNo::No)),
            conclusion: "No visual feedback after the click",
            explanation: "Users should see immediate feedback (a loading state or color change) once they click.",
            category: Category::Clickability,
        },
        // Combined
        Rule {
            id: "M1",
            priority: 9,
            certainty: 0.88,
            condition: Condition::All(vec![
                fact(TimeToCta, GreaterThan(12.0)),
                Condition::is(Label::ContentLength(ContentLength::Long)),
            ]),
            conclusion: "It takes too long to reach the CTA",
            explanation: "Users decide within the first 8-10 seconds. Trim the content above the CTA.",
            category: Category::Visibility,
        },
        Rule {
            id: "M2",
            priority: 8,
            certainty: 0.82,
            condition: Condition::All(vec![
                fact(CtaClickRate, LessThan(2.0)),
                fact(ContrastRatio, LessThan(4.0)),
            ]),
            conclusion: "Low click rate caused by weak contrast",
            explanation: "Raising contrast to 4.5:1 can lift conversion by up to 35%.",
            category: Category::Clickability,
        },
        Rule {
            id: "M3",
            priority: 7,
            certainty: 0.78,
            condition: Condition::All(vec![
                fact(ScrollDepth, GreaterThan(70.0)),
                fact(CtaPositionY, LessThan(500.0)),
            ]),
            conclusion: "CTA position is optimal - users reach it",
            explanation: "A CTA within the first 500 pixels combined with deep scrolling signals a good layout.",
            category: Category::Visibility,
        },
        Rule {
            id: "M4",
            priority: 6,
            certainty: 0.75,
            condition: Condition::All(vec![
                fact(CtaClickRate, GreaterThan(5.0)),
                fact(CtaWidth, GreaterEqual(200.0)),
            ]),
            conclusion: "CTA size is appropriate - the click rate is good",
            explanation: "A well-sized CTA has produced a higher click rate.",
            category: Category::Clickability,
        },
    ]
}
