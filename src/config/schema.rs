use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::facts::RawFacts;

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// output:
///   format: text
///   color: auto
///   recommendations: 5
/// defaults:
///   largest_other_element_size: 9000
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    /// Baseline facts layered under every analyzed page
    #[serde(default)]
    pub defaults: Option<RawFacts>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format when `--format` is not given
    #[serde(default)]
    pub format: Option<OutputFormat>,

    #[serde(default)]
    pub color: Option<ColorMode>,

    /// Recommendations shown in terminal output (1-5)
    #[serde(default)]
    pub recommendations: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}
