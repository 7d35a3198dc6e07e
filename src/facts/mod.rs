//! Page facts: the raw quantitative measurements, the qualitative labels
//! derived from them, and the merged fact set rules are evaluated against.

pub mod loader;
pub mod qualitative;
pub mod raw;
pub mod validation;

pub use loader::{load_facts, parse_facts, read_facts_from_stdin, FactFormat};
pub use qualitative::{
    convert, ColorUniqueness, ContentLength, Label, QualitativeLabels, TextClarity,
    VisualHierarchy, YesNo,
};
pub use raw::{FactKey, RawFacts};
pub use validation::validate_facts;

/// Raw facts merged with their derived labels.
///
/// Built once per analysis and read-only afterwards. The two halves live in
/// separate types, so raw and qualitative keys can never collide.
#[derive(Debug, Clone, Copy)]
pub struct FactSet<'a> {
    pub raw: &'a RawFacts,
    pub labels: QualitativeLabels,
}

impl<'a> FactSet<'a> {
    pub fn new(raw: &'a RawFacts) -> Self {
        Self {
            raw,
            labels: convert(raw),
        }
    }
}
