use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::analysis::{AnalysisReport, SimpleReport, Summary};
use crate::batch::PageOutcome;
use crate::config::ColorMode;
use crate::explain::QualityTier;
use crate::inference::ScoreBreakdown;
use crate::knowledge::{Category, RuleCatalog};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Resolve the configured color mode against the terminal.
pub fn resolve_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Auto => should_use_colors(),
        ColorMode::Always => true,
        ColorMode::Never => false,
    }
}

/// Pretty JSON for any serializable result
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

fn paint_tier(text: &str, tier: QualityTier, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match tier {
        QualityTier::Excellent => text.green().bold().to_string(),
        QualityTier::Good => text.cyan().bold().to_string(),
        QualityTier::Medium => text.yellow().bold().to_string(),
        QualityTier::Weak => text.red().bold().to_string(),
    }
}

/// Score as "45/100", colored by its tier
pub fn format_score(score: u32, use_colors: bool) -> String {
    let text = format!("{:>3}/100", score);
    paint_tier(&text, QualityTier::from_score(score as f64), use_colors)
}

fn format_certainty(certainty: f64) -> String {
    format!("{:.0}%", certainty * 100.0)
}

fn format_summary_lines(
    visibility: u32,
    clickability: u32,
    certainty: f64,
    summary: &Summary,
    use_colors: bool,
) -> Vec<String> {
    let label = |text: &str| {
        if use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    vec![
        format!(
            "{}  {}  {}",
            label("Visibility  "),
            format_score(visibility, use_colors),
            summary.visibility_status
        ),
        format!(
            "{}  {}  {}",
            label("Clickability"),
            format_score(clickability, use_colors),
            summary.clickability_status
        ),
        format!(
            "{}  {:>7}  {}",
            label("Certainty   "),
            format_certainty(certainty),
            summary.certainty_level
        ),
        format!(
            "{}  {} (average {})",
            label("Overall     "),
            paint_tier(&summary.overall_status, summary.status, use_colors),
            summary.average_score
        ),
    ]
}

fn format_recommendations(
    recommendations: &[String],
    limit: usize,
    use_colors: bool,
) -> Vec<String> {
    if recommendations.is_empty() {
        return vec!["No immediate improvements needed.".to_string()];
    }

    let mut lines = vec![if use_colors {
        "Recommendations:".bold().to_string()
    } else {
        "Recommendations:".to_string()
    }];
    for (idx, recommendation) in recommendations.iter().take(limit).enumerate() {
        let index = format!("{:>2}.", idx + 1);
        if use_colors {
            lines.push(format!("{} {}", index.dimmed(), recommendation));
        } else {
            lines.push(format!("{} {}", index, recommendation));
        }
    }
    if recommendations.len() > limit {
        lines.push(format!("    ... and {} more", recommendations.len() - limit));
    }
    lines
}

/// Terminal rendering of a full report: scores, summary, the first `limit`
/// recommendations, then the reasoning trace.
pub fn format_report(report: &AnalysisReport, limit: usize, use_colors: bool) -> String {
    let mut lines = format_summary_lines(
        report.visibility_score,
        report.clickability_score,
        report.overall_certainty,
        &report.summary,
        use_colors,
    );
    lines.push(String::new());
    lines.extend(format_recommendations(&report.recommendations, limit, use_colors));
    lines.push(String::new());
    lines.push(report.detailed_explanation.trim_end().to_string());
    lines.join("\n")
}

/// Terminal rendering of the condensed report
pub fn format_simple_report(report: &SimpleReport, use_colors: bool) -> String {
    let mut lines = format_summary_lines(
        report.visibility_score,
        report.clickability_score,
        report.overall_certainty,
        &report.summary,
        use_colors,
    );
    lines.push(String::new());
    lines.extend(format_recommendations(
        &report.recommendations,
        report.recommendations.len(),
        use_colors,
    ));
    lines.join("\n")
}

/// Every score adjustment, for verbose output
pub fn format_breakdown(name: &str, breakdown: &ScoreBreakdown) -> String {
    let mut lines = vec![format!(
        "{} score: {} (raw {})",
        name, breakdown.score, breakdown.raw
    )];
    if breakdown.adjustments.is_empty() {
        lines.push("  no adjustments".to_string());
    }
    for adjustment in &breakdown.adjustments {
        lines.push(format!(
            "  {:>+4}  {:<12} {}",
            adjustment.delta, adjustment.factor, adjustment.detail
        ));
    }
    lines.join("\n")
}

/// Rules that could not be evaluated, for verbose output
pub fn format_failed_rules(failed: &[(String, String)]) -> String {
    if failed.is_empty() {
        return "All rules evaluated.".to_string();
    }
    let mut lines = vec![format!("{} rule(s) could not be evaluated:", failed.len())];
    for (id, reason) in failed {
        lines.push(format!("  {}: {}", id, reason));
    }
    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Rule listing: id, priority, certainty, category, condition.
/// Conditions are truncated to the terminal width; pipes get full text.
pub fn format_rule_table(catalog: &RuleCatalog, use_colors: bool) -> String {
    if catalog.rules.is_empty() {
        return "No rules loaded.".to_string();
    }

    // "V1   10  0.95  clickability  "
    let fixed_width = 4 + 1 + 4 + 2 + 4 + 2 + 12 + 2;
    let term_width = get_terminal_width();

    let mut lines: Vec<String> = catalog
        .rules
        .iter()
        .map(|rule| {
            let condition = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&rule.condition, width - fixed_width)
                }
                Some(_) => truncate_text(&rule.condition, 20),
                None => rule.condition.clone(),
            };
            let id = format!("{:<4}", rule.id);
            let category = format!("{:<12}", rule.category.to_string());

            if use_colors {
                let category = match rule.category {
                    Category::Visibility => category.cyan().to_string(),
                    Category::Clickability => category.magenta().to_string(),
                };
                format!(
                    "{} {:>4}  {:.2}  {}  {}",
                    id.bold(),
                    rule.priority,
                    rule.certainty,
                    category,
                    condition
                )
            } else {
                format!(
                    "{} {:>4}  {:.2}  {}  {}",
                    id, rule.priority, rule.certainty, category, condition
                )
            }
        })
        .collect();

    lines.push(format!("{} rules", catalog.total_rules));
    lines.join("\n")
}

/// One line per analyzed source: index, both scores, certainty, source.
/// Failed sources show their error instead of scores.
pub fn format_batch_table(outcomes: &[PageOutcome], use_colors: bool) -> String {
    if outcomes.is_empty() {
        return "No pages analyzed.".to_string();
    }

    outcomes
        .iter()
        .enumerate()
        .map(|(idx, outcome)| {
            let index = format!("{:>2}.", idx + 1);
            let index = if use_colors {
                index.dimmed().to_string()
            } else {
                index
            };

            match &outcome.result {
                Ok(report) => format!(
                    "{} V {}  C {}  CF {:>4}  {}",
                    index,
                    format_score(report.visibility_score, use_colors),
                    format_score(report.clickability_score, use_colors),
                    format_certainty(report.overall_certainty),
                    outcome.source
                ),
                Err(e) => {
                    let error = format!("error: {:#}", e);
                    let error = if use_colors {
                        error.red().to_string()
                    } else {
                        error
                    };
                    format!("{} {}  {}", index, outcome.source, error)
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct BatchEntry<'a, T: Serialize> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// JSON array of `{source, report}` or `{source, error}` objects, in input
/// order. With `simple`, reports are condensed.
pub fn format_batch_json(outcomes: &[PageOutcome], simple: bool) -> Result<String> {
    if simple {
        let entries: Vec<BatchEntry<'_, SimpleReport>> = outcomes
            .iter()
            .map(|outcome| batch_entry(outcome, SimpleReport::from))
            .collect();
        format_json(&entries)
    } else {
        let entries: Vec<BatchEntry<'_, &AnalysisReport>> = outcomes
            .iter()
            .map(|outcome| batch_entry(outcome, |report| report))
            .collect();
        format_json(&entries)
    }
}

fn batch_entry<'a, T: Serialize>(
    outcome: &'a PageOutcome,
    view: impl Fn(&'a AnalysisReport) -> T,
) -> BatchEntry<'a, T> {
    match &outcome.result {
        Ok(report) => BatchEntry {
            source: &outcome.source,
            report: Some(view(report)),
            error: None,
        },
        Err(e) => BatchEntry {
            source: &outcome.source,
            report: None,
            error: Some(format!("{:#}", e)),
        },
    }
}
