//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Tier;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// cc-summariser - summarise compliance-checker results from many datasets
///
/// Reads the JSON output of a compliance checker run over several files and
/// reports which checks failed, in how many files, and with which messages.
///
/// Examples:
///   cc-summariser results.json
///   cc-summariser results.json --file-limit 10
///   cc-summariser results.json --format json --output summary.json
///   cc-summariser results.json --fail-on high
///   cc-summariser --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Compliance-checker results file (JSON)
    #[arg(value_name = "RESULTS", required_unless_present = "init_config")]
    pub results: Option<PathBuf>,

    /// Output format (text, json)
    ///
    /// Defaults to the config file setting, or text.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Maximum number of filenames listed per failure in the text report
    ///
    /// Longer lists keep their first and last entries with "..." in between.
    /// Zero lists every file.
    #[arg(long, value_name = "COUNT")]
    pub file_limit: Option<usize>,

    /// Write the report to this file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cc-summariser.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "CC_SUMMARISER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 if any failure exists at or above this priority
    ///
    /// Values: high, medium, low
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Generate a default .cc-summariser.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text (default)
    #[default]
    Text,
    /// JSON document mirroring the aggregated summary
    Json,
}

/// Priority threshold for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailOnLevel {
    High,
    Medium,
    Low,
}

impl FailOnLevel {
    /// The tier this threshold corresponds to.
    pub fn tier(self) -> Tier {
        match self {
            FailOnLevel::High => Tier::High,
            FailOnLevel::Medium => Tier::Medium,
            FailOnLevel::Low => Tier::Low,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path of the results file. Empty when only `--init-config` was given.
    pub fn results_path(&self) -> &Path {
        self.results.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.init_config {
            return Ok(());
        }

        let Some(ref results) = self.results else {
            return Err("A results file is required".to_string());
        };

        if !results.exists() {
            return Err(format!("Results file does not exist: {}", results.display()));
        }
        if !results.is_file() {
            return Err(format!("Results path is not a file: {}", results.display()));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from the config file; `--quiet` still wins.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            results: Some(PathBuf::from("Cargo.toml")),
            format: None,
            file_limit: None,
            output: None,
            config: None,
            verbose: false,
            quiet: false,
            fail_on: None,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let args = Args::try_parse_from([
            "cc-summariser",
            "results.json",
            "--format",
            "json",
            "--file-limit",
            "4",
            "--fail-on",
            "medium",
        ])
        .unwrap();

        assert_eq!(args.results, Some(PathBuf::from("results.json")));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.file_limit, Some(4));
        assert_eq!(args.fail_on, Some(FailOnLevel::Medium));
    }

    #[test]
    fn test_results_required_without_init_config() {
        assert!(Args::try_parse_from(["cc-summariser"]).is_err());
        assert!(Args::try_parse_from(["cc-summariser", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_results_file() {
        let mut args = make_args();
        args.results = Some(PathBuf::from("does/not/exist.json"));
        let err = args.validate().unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_validation_accepts_existing_file() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::WARN);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_fail_on_tier() {
        assert_eq!(FailOnLevel::High.tier(), Tier::High);
        assert_eq!(FailOnLevel::Low.tier(), Tier::Low);
    }
}
