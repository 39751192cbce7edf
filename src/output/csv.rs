//! CSV output for reconciliation results.
//!
//! Full output has one row per item:
//!
//! - `section`: `matching`, `unique-first`, `unique-second` or `partial`
//! - `item`: the item (for partial matches, the first-list item)
//! - `matched_with`: the second-list item of a partial match
//! - `score`: similarity of a partial match, two decimals
//!
//! [`write_url_column`] writes the combined export: a `URL` header followed
//! by one item per row.

use std::io;

use serde::Serialize;

use super::OutputError;
use crate::recon::{ReconciliationResult, ResultCounts, ResultSection};

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    section: &'static str,
    item: &'a str,
    matched_with: Option<&'a str>,
    score: Option<String>,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    result: &'a ReconciliationResult,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(result: &'a ReconciliationResult) -> Self {
        Self { result }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), OutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let plain = [
            (ResultSection::Matching, &self.result.matching),
            (ResultSection::UniqueFirst, &self.result.unique_to_first),
            (ResultSection::UniqueSecond, &self.result.unique_to_second),
        ];
        for (section, items) in plain {
            for item in items {
                csv_writer.serialize(CsvRow {
                    section: section.key(),
                    item,
                    matched_with: None,
                    score: None,
                })?;
            }
        }

        for pm in &self.result.partial_matches {
            csv_writer.serialize(CsvRow {
                section: ResultSection::Partial.key(),
                item: &pm.first,
                matched_with: Some(&pm.second),
                score: Some(format!("{:.2}", pm.score)),
            })?;
        }

        // An empty result still gets a header row.
        if self.result.counts() == ResultCounts::default() {
            csv_writer.write_record(["section", "item", "matched_with", "score"])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, OutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Write `items` as a single-column CSV with header `URL`.
///
/// # Errors
///
/// Returns `OutputError` if writing fails.
pub fn write_url_column<W: io::Write>(writer: W, items: &[String]) -> Result<(), OutputError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["URL"])?;
    for item in items {
        csv_writer.write_record([item])?;
    }
    csv_writer.flush()?;
    Ok(())
}
