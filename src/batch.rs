use anyhow::{bail, Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analysis::{AnalysisReport, AnalysisService};
use crate::facts::{load_facts, read_facts_from_stdin, validate_facts, RawFacts};

/// Where a page's facts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// No fact document: only the layered defaults and overrides
    Inline,
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn name(&self) -> String {
        match self {
            Source::Inline => "(inline)".to_string(),
            Source::Stdin => "(stdin)".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Turn command-line inputs into sources. `-` is stdin (at most once);
/// patterns containing `*`, `?` or `[` are expanded as globs.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<Source>> {
    if inputs.is_empty() {
        return Ok(vec![Source::Inline]);
    }

    let mut sources = Vec::new();
    let mut stdin_seen = false;

    for input in inputs {
        if input == "-" {
            if stdin_seen {
                bail!("stdin ('-') can only be given once");
            }
            stdin_seen = true;
            sources.push(Source::Stdin);
        } else if input.contains(['*', '?', '[']) {
            let mut matched: Vec<PathBuf> = glob::glob(input)
                .with_context(|| format!("Invalid glob pattern '{}'", input))?
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to expand '{}'", input))?;
            if matched.is_empty() {
                bail!("No files match '{}'", input);
            }
            matched.sort();
            sources.extend(matched.into_iter().map(Source::File));
        } else {
            sources.push(Source::File(PathBuf::from(input)));
        }
    }

    Ok(sources)
}

/// Facts layered around each page: `baseline` below the page's own facts,
/// `overrides` above them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactLayers {
    pub baseline: RawFacts,
    pub overrides: RawFacts,
}

impl FactLayers {
    pub fn merge(&self, page: &RawFacts) -> RawFacts {
        self.baseline.clone().overlay(page).overlay(&self.overrides)
    }
}

/// Result of analyzing one source.
#[derive(Debug)]
pub struct PageOutcome {
    pub source: String,
    pub result: Result<AnalysisReport>,
}

async fn read_source(source: &Source) -> Result<RawFacts> {
    match source {
        Source::Inline => Ok(RawFacts::default()),
        Source::Stdin => tokio::task::spawn_blocking(read_facts_from_stdin)
            .await
            .context("Stdin reader task failed")?,
        Source::File(path) => load_facts(path).await,
    }
}

async fn analyze_one(
    service: Arc<AnalysisService>,
    layers: Arc<FactLayers>,
    source: &Source,
) -> Result<AnalysisReport> {
    let page = read_source(source).await?;
    let facts = layers.merge(&page);

    if let Err(errors) = validate_facts(&facts, "") {
        bail!("Invalid facts: {}", errors.join("; "));
    }

    tokio::task::spawn_blocking(move || service.analyze(&facts))
        .await
        .context("Analysis task failed")
}

/// Analyze every source concurrently against one shared service.
///
/// A source that cannot be read, parsed or validated fails on its own; the
/// others still complete. Outcomes come back in input order.
pub async fn analyze_sources(
    service: Arc<AnalysisService>,
    layers: Arc<FactLayers>,
    sources: Vec<Source>,
) -> Vec<PageOutcome> {
    let mut futures = FuturesUnordered::new();
    for (index, source) in sources.into_iter().enumerate() {
        let service = Arc::clone(&service);
        let layers = Arc::clone(&layers);
        futures.push(async move {
            let result = analyze_one(service, layers, &source).await;
            (index, source.name(), result)
        });
    }

    let mut outcomes = Vec::new();
    while let Some((index, source, result)) = futures.next().await {
        match &result {
            Ok(report) => debug!(
                source = %source,
                visibility = report.visibility_score,
                clickability = report.clickability_score,
                "page analyzed"
            ),
            Err(e) => warn!(source = %source, "skipping page: {:#}", e),
        }
        outcomes.push((index, PageOutcome { source, result }));
    }

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
