use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use cta_advisor::analysis::{AnalysisService, SimpleReport};
use cta_advisor::batch::{self, FactLayers, PageOutcome};
use cta_advisor::config::{self, Config, OutputFormat};
use cta_advisor::facts::RawFacts;
use cta_advisor::inference::MAX_RECOMMENDATIONS;
use cta_advisor::knowledge::{validate_knowledge_base, KnowledgeBase, RuleCatalog};
use cta_advisor::output;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one or more fact files (default if no subcommand)
    Analyze(AnalyzeArgs),
    /// List the rules in the knowledge base
    Rules {
        /// Output format (defaults to config, then text)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct AnalyzeArgs {
    /// Fact files (YAML or JSON), glob patterns, or `-` for stdin.
    /// With no inputs, only defaults and --set values are analyzed.
    inputs: Vec<String>,

    /// Override a fact, e.g. --set contrast_ratio=2.5 (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Output format (defaults to config, then text)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Condensed report: scores, certainty, top 3 recommendations
    #[arg(long)]
    simple: bool,

    /// Do not fill missing facts with built-in defaults
    #[arg(long)]
    partial: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "cta-advisor")]
#[command(about = "Call-to-action design advisor", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/cta-advisor/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    analyze: AnalyzeArgs,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print to stdout, or replace `path` atomically.
fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        None => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            let mut file = AtomicWriteFile::open(path).with_context(|| {
                format!("Failed to open atomic write file at {}", path.display())
            })?;
            file.write_all(content.as_bytes())
                .context("Failed to write output")?;
            file.write_all(b"\n").context("Failed to write output")?;
            file.commit()
                .with_context(|| format!("Failed to save output to {}", path.display()))?;
            Ok(())
        }
    }
}

fn fail(message: &str, errors: &[String], code: i32) -> ! {
    eprintln!("{}", message);
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(code);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);
    let command = cli.command.unwrap_or(Commands::Analyze(cli.analyze));

    if let Commands::Init { force } = command {
        match config::write_starter_config(config_path, force) {
            Ok(path) => {
                println!("Wrote starter config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load and validate config
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(errors) = config::validate_config(&config) {
        fail("Config errors:", &errors, EXIT_CONFIG);
    }

    let kb = KnowledgeBase::standard();
    if let Err(errors) = validate_knowledge_base(&kb) {
        fail("Knowledge base errors:", &errors, EXIT_CONFIG);
    }
    tracing::debug!(rules = kb.len(), "knowledge base loaded");

    let default_format = config.output.format.unwrap_or_default();

    match command {
        Commands::Rules { format } => {
            let catalog = RuleCatalog::new(&kb);
            let rendered = match format.unwrap_or(default_format) {
                OutputFormat::Json => output::format_json(&catalog),
                OutputFormat::Text => Ok(output::format_rule_table(
                    &catalog,
                    output::resolve_colors(config.output.color.unwrap_or_default()),
                )),
            };
            match rendered.and_then(|text| emit(&text, None)) {
                Ok(()) => {}
                Err(e) => {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Analyze(args) => {
            let code = run_analyze(args, &config, kb, default_format, cli.verbose).await;
            if cli.verbose {
                let elapsed = Duration::from_millis(start_time.elapsed().as_millis() as u64);
                eprintln!("Done in {}", humantime::format_duration(elapsed));
            }
            std::process::exit(code);
        }
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

async fn run_analyze(
    args: AnalyzeArgs,
    config: &Config,
    kb: KnowledgeBase,
    default_format: OutputFormat,
    verbose: bool,
) -> i32 {
    // Built-in defaults <- config defaults <- fact file <- --set
    let mut baseline = if args.partial {
        RawFacts::default()
    } else {
        RawFacts::defaults()
    };
    if let Some(ref defaults) = config.defaults {
        baseline = baseline.overlay(defaults);
    }

    let mut overrides = RawFacts::default();
    let mut errors = Vec::new();
    for assignment in &args.set {
        if let Err(e) = overrides.apply_assignment(assignment) {
            errors.push(format!("--set {}: {:#}", assignment, e));
        }
    }
    if !errors.is_empty() {
        fail("Invalid overrides:", &errors, EXIT_INPUT);
    }

    let sources = match batch::expand_inputs(&args.inputs) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    let service = Arc::new(AnalysisService::new(kb));
    let layers = Arc::new(FactLayers {
        baseline,
        overrides,
    });
    let outcomes = batch::analyze_sources(service, layers, sources).await;

    let format = args.format.unwrap_or(default_format);
    let use_colors =
        args.output.is_none() && output::resolve_colors(config.output.color.unwrap_or_default());
    let limit = config.output.recommendations.unwrap_or(MAX_RECOMMENDATIONS);

    if verbose {
        print_diagnostics(&outcomes);
    }

    let rendered = if let [single] = outcomes.as_slice() {
        let report = match &single.result {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Input error: {}: {:#}", single.source, e);
                return EXIT_INPUT;
            }
        };
        match (format, args.simple) {
            (OutputFormat::Json, true) => output::format_json(&SimpleReport::from(report)),
            (OutputFormat::Json, false) => output::format_json(report),
            (OutputFormat::Text, true) => Ok(output::format_simple_report(
                &SimpleReport::from(report),
                use_colors,
            )),
            (OutputFormat::Text, false) => Ok(output::format_report(report, limit, use_colors)),
        }
    } else {
        match format {
            OutputFormat::Json => output::format_batch_json(&outcomes, args.simple),
            OutputFormat::Text => Ok(output::format_batch_table(&outcomes, use_colors)),
        }
    };

    if let Err(e) = rendered.and_then(|text| emit(&text, args.output.as_deref())) {
        eprintln!("Output error: {:#}", e);
        return EXIT_INPUT;
    }

    // Partial failures still print the pages that worked
    if outcomes.iter().all(|outcome| outcome.result.is_err()) {
        EXIT_INPUT
    } else {
        EXIT_SUCCESS
    }
}

fn print_diagnostics(outcomes: &[PageOutcome]) {
    for outcome in outcomes {
        let Ok(report) = &outcome.result else {
            continue;
        };
        eprintln!("{}:", outcome.source);
        eprintln!(
            "{}",
            output::format_breakdown("Visibility", &report.diagnostics.visibility)
        );
        eprintln!(
            "{}",
            output::format_breakdown("Clickability", &report.diagnostics.clickability)
        );
        eprintln!(
            "{}",
            output::format_failed_rules(&report.diagnostics.failed_rules)
        );
        eprintln!();
    }
}
