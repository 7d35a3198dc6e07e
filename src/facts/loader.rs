use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use super::raw::RawFacts;

/// Format of a fact document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactFormat {
    Yaml,
    Json,
}

impl FactFormat {
    /// Pick a format from a file extension. Anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FactFormat::Json,
            _ => FactFormat::Yaml,
        }
    }
}

/// Parse a fact document. Unknown keys are rejected.
pub fn parse_facts(content: &str, format: FactFormat) -> Result<RawFacts> {
    let facts = match format {
        FactFormat::Json => serde_json::from_str(content).context("Invalid JSON fact document")?,
        FactFormat::Yaml => {
            if content.trim().is_empty() {
                return Ok(RawFacts::default());
            }
            serde_saphyr::from_str(content).context("Invalid YAML fact document")?
        }
    };
    Ok(facts)
}

/// Load a fact file from disk.
pub async fn load_facts(path: &Path) -> Result<RawFacts> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fact file at {}", path.display()))?;
    parse_facts(&content, FactFormat::from_path(path))
        .with_context(|| format!("Failed to parse facts in {}", path.display()))
}

/// Read a fact document from stdin. JSON is detected by a leading `{`.
///
/// Blocks until stdin is closed; async callers run it on a blocking thread.
pub fn read_facts_from_stdin() -> Result<RawFacts> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read facts from stdin")?;
    let format = if content.trim_start().starts_with('{') {
        FactFormat::Json
    } else {
        FactFormat::Yaml
    };
    parse_facts(&content, format).context("Failed to parse facts from stdin")
}
