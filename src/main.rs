//! cc-summariser - compliance-checker results summariser
//!
//! Reads the JSON results of a compliance checker run over many datasets
//! and prints a summary of the failures shared between them.
//!
//! Exit codes:
//!   0 - Success (no failures at or above --fail-on, or no --fail-on set)
//!   1 - Runtime error (unreadable or malformed results, bad config, etc.)
//!   2 - Usage error, or failures found at or above the --fail-on priority

use anyhow::{Context, Result};
use cc_summariser::analysis;
use cc_summariser::cli::{Args, OutputFormat};
use cc_summariser::config::{Config, DEFAULT_CONFIG_FILE};
use cc_summariser::models::RawResults;
use cc_summariser::report::{self, TextOptions};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        eprintln!("Usage: cc-summariser [OPTIONS] RESULTS");
        std::process::exit(2);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(args.log_level(config.logging.verbose));

    debug!("Arguments: {:?}", args);
    debug!("Effective config: {:?}", config);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Summarising failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .cc-summariser.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging at the given level. Logs go to stderr so that the
/// report on stdout stays clean.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(args);
    Ok(config)
}

/// Summarise the results file. Returns the exit code (0 or 2).
fn run(args: &Args, config: &Config) -> Result<i32> {
    let path = args.results_path();
    info!("Reading results from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open results file: {}", path.display()))?;
    let raw = RawResults::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;

    let summary = analysis::aggregate(&raw);
    if summary.is_clean() {
        info!("No failures found in {} files", summary.file_count);
    } else {
        info!(
            "Summarised {} files ({} with failures)",
            summary.file_count,
            summary.failing_file_count()
        );
    }

    let output = match config.report.format {
        OutputFormat::Text => report::generate_text_report(
            &summary,
            &TextOptions {
                file_limit: config.report.file_limit,
            },
        ),
        OutputFormat::Json => report::generate_json_report(&summary)?,
    };

    match args.output {
        Some(ref out_path) => {
            report::write_report(&output, out_path)?;
            info!("Report written to {}", out_path.display());
        }
        None => print_stdout(&output)?,
    }

    // Check --fail-on threshold
    if let Some(level) = args.fail_on {
        let threshold = level.tier();
        if let Some(tier) = summary.highest_failing_tier().filter(|t| *t <= threshold) {
            eprintln!(
                "Failures found at {} priority (threshold {}). Failing (exit code 2).",
                tier, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Print to stdout, treating a closed pipe (e.g. `| head`) as success.
fn print_stdout(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match writeln!(stdout, "{}", content).and_then(|_| stdout.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write report to stdout"),
    }
}
