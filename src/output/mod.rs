//! Output formatters for reconciliation results.
//!
//! - Text for people reading a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! Combined sections are exported as a single `URL` column, to an Excel
//! workbook for `.xlsx` paths and to CSV otherwise ([`export_items`]).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use urlrecon::cli::OutputFormat;
//! use urlrecon::output::{write_result, RunSummary};
//! use urlrecon::recon::{reconcile, ComparisonProfile};
//!
//! let first = vec!["https://ex.com/a".to_string()];
//! let second = vec!["https://ex.com/a".to_string()];
//! let profile = ComparisonProfile::default();
//! let result = reconcile(&first, &second, &profile);
//! let summary = RunSummary::new("strict", profile, 1000, Duration::from_millis(3));
//!
//! let mut out = Vec::new();
//! write_result(&mut out, OutputFormat::Json, &result, &summary, false).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("\"matching\""));
//! ```

pub mod csv;
pub mod json;
pub mod text;
pub mod xlsx;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::recon::{ComparisonProfile, ReconciliationResult};

pub use csv::{write_url_column, CsvOutput};
pub use json::JsonOutput;
pub use text::TextOutput;
pub use xlsx::write_url_workbook;

/// Errors that can occur while writing results.
#[derive(Debug, Error)]
pub enum OutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Workbook creation error.
    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// File format of a combined export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Single-column CSV
    Csv,
    /// Excel workbook
    Xlsx,
}

impl ExportFormat {
    /// `.xlsx` paths (any case) export a workbook, everything else CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }
}

/// Write combined `items` to `path` under a `URL` header, in the format
/// the path's extension selects.
///
/// # Errors
///
/// Returns `OutputError` if the file cannot be created or written.
pub fn export_items(path: &Path, items: &[String]) -> Result<ExportFormat, OutputError> {
    let format = ExportFormat::from_path(path);
    match format {
        ExportFormat::Xlsx => write_url_workbook(path, items)?,
        ExportFormat::Csv => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_url_column(&mut writer, items)?;
            writer.flush()?;
        }
    }
    Ok(format)
}

/// How a comparison was run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Name of the active profile
    pub profile_name: String,
    /// Effective bounds, policy and cutoff
    pub profile: ComparisonProfile,
    /// Items per batch
    pub batch_size: usize,
    /// Wall-clock duration of the comparison in milliseconds
    pub duration_ms: u64,
    /// When the result was produced
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    /// Create a summary stamped with the current time.
    #[must_use]
    pub fn new(
        profile_name: impl Into<String>,
        profile: ComparisonProfile,
        batch_size: usize,
        duration: Duration,
    ) -> Self {
        Self {
            profile_name: profile_name.into(),
            profile,
            batch_size,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            generated_at: Utc::now(),
        }
    }
}

/// Write `result` to `writer` in the chosen format.
///
/// `color` only affects text output.
///
/// # Errors
///
/// Returns `OutputError` if writing or serialization fails.
pub fn write_result<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    result: &ReconciliationResult,
    summary: &RunSummary,
    color: bool,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => TextOutput::new(result)
            .with_summary(summary)
            .with_color(color)
            .write_to(writer),
        OutputFormat::Json => JsonOutput::new(result, summary).write_to(writer, true),
        OutputFormat::Csv => CsvOutput::new(result).write_to(writer),
    }
}
