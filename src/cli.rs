//! Command-line interface definitions for urlrecon.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, config file, profile) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Compare two lists with the default (strict) profile
//! urlrecon compare old-sitemap.xml new-urls.txt
//!
//! # Loose near-duplicate detection, JSON output
//! urlrecon --profile loose compare a.txt b.txt --output json
//!
//! # Explicit bounds, export only the one-sided items to an Excel workbook
//! urlrecon compare a.txt b.txt --lower 90 --export diff.xlsx --combine unique-first unique-second
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::recon::{MatchPolicy, ResultSection};

/// Reconcile two URL or text lists.
///
/// Reports items present in both lists, items unique to each list, and
/// near-duplicate pairs whose similarity falls inside a configurable range.
#[derive(Debug, Parser)]
#[command(name = "urlrecon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Comparison profile name (built-in: strict, standard, loose)
    #[arg(short, long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for urlrecon.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare two lists
    Compare(CompareArgs),
    /// Count the items found in a list
    Count(CountArgs),
    /// List the available comparison profiles
    Profiles,
}

/// Arguments for the compare subcommand.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First list (file path, or - for stdin)
    #[arg(value_name = "FIRST")]
    pub first: PathBuf,

    /// Second list (file path, or - for stdin)
    #[arg(value_name = "SECOND")]
    pub second: PathBuf,

    /// Lowest similarity (percent, inclusive) reported as a partial match
    #[arg(long = "lower", value_name = "PCT", value_parser = parse_percent)]
    pub lower_bound: Option<f64>,

    /// Similarity (percent, exclusive) at which partial matching stops
    #[arg(long = "upper", value_name = "PCT", value_parser = parse_percent)]
    pub upper_bound: Option<f64>,

    /// Record every near duplicate or only the first per item
    #[arg(long, value_enum, value_name = "POLICY")]
    pub policy: Option<MatchPolicy>,

    /// Items of the first list processed per batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Always compute exact edit distances (slower on lists with varied lengths)
    #[arg(long)]
    pub no_length_cutoff: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the combined sections as a single `URL` column
    /// (Excel workbook for .xlsx paths, CSV otherwise)
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Sections to combine for --export
    #[arg(
        long,
        value_enum,
        num_args = 1..,
        requires = "export",
        value_name = "SECTION"
    )]
    pub combine: Vec<ResultSection>,
}

/// Arguments for the count subcommand.
#[derive(Debug, Args)]
pub struct CountArgs {
    /// List to count (file path, or - for stdin)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Output format for comparison results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sections
    #[default]
    Text,
    /// JSON document for scripting
    Json,
    /// CSV rows, one per item
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a percentage between 0 and 100. A trailing `%` is accepted.
///
/// # Examples
///
/// ```
/// use urlrecon::cli::parse_percent;
///
/// assert_eq!(parse_percent("97").unwrap(), 97.0);
/// assert_eq!(parse_percent("70.5%").unwrap(), 70.5);
/// assert!(parse_percent("101").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, not a number, or outside 0-100.
pub fn parse_percent(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let num_str = s.strip_suffix('%').unwrap_or(s).trim();
    if num_str.is_empty() {
        return Err("Percentage cannot be empty".to_string());
    }

    let value: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("Percentage must be between 0 and 100, got {num_str}"));
    }

    Ok(value)
}
