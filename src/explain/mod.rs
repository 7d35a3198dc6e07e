pub mod tier;
pub mod trace;

pub use tier::QualityTier;
pub use trace::{render, Trace};
