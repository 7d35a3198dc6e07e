pub mod certainty;
pub mod engine;
pub mod scoring;

pub use certainty::{combine, combine_all, NO_EVIDENCE};
pub use engine::{ActivatedRule, EngineOutput, FailedRule, InferenceEngine, MAX_RECOMMENDATIONS};
pub use scoring::{clickability_score, visibility_score, Adjustment, ScoreBreakdown};
