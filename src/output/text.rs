//! Human-readable text output.
//!
//! One block per result set, headed by `"<Title> (total: N)"`:
//!
//! ```text
//! Matching items (total: 1)
//!   https://ex.com/a
//!
//! Partial matches (total: 1)
//!   https://ex.com/page - https://ex.com/page/ (94.44%)
//! ```

use std::io::Write;

use yansi::Paint;

use super::{OutputError, RunSummary};
use crate::recon::{ReconciliationResult, ResultSection};

/// Text formatter.
pub struct TextOutput<'a> {
    result: &'a ReconciliationResult,
    summary: Option<&'a RunSummary>,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter without color or summary line.
    #[must_use]
    pub fn new(result: &'a ReconciliationResult) -> Self {
        Self {
            result,
            summary: None,
            color: false,
        }
    }

    /// Append a summary line after the sections.
    #[must_use]
    pub fn with_summary(mut self, summary: &'a RunSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Enable ANSI colors for headers.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write all sections.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), OutputError> {
        for (idx, section) in ResultSection::ALL.into_iter().enumerate() {
            if idx > 0 {
                writeln!(writer)?;
            }
            let header = format!(
                "{} (total: {})",
                section.title(),
                self.result.section_len(section)
            );
            if self.color {
                writeln!(writer, "{}", header_style(&header, section))?;
            } else {
                writeln!(writer, "{header}")?;
            }
            for line in self.result.section_lines(section) {
                writeln!(writer, "  {line}")?;
            }
        }

        if let Some(summary) = self.summary {
            writeln!(writer)?;
            let line = format!(
                "Profile {} {}, {} ms",
                summary.profile_name, summary.profile, summary.duration_ms
            );
            if self.color {
                writeln!(writer, "{}", line.dim())?;
            } else {
                writeln!(writer, "{line}")?;
            }
            if self.result.is_identical() {
                writeln!(writer, "Both lists contain the same items")?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Render to a string.
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if formatting fails.
    pub fn to_string(&self) -> Result<String, OutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn header_style(header: &str, section: ResultSection) -> String {
    match section {
        ResultSection::Matching => header.green().bold().to_string(),
        ResultSection::UniqueFirst | ResultSection::UniqueSecond => {
            header.yellow().bold().to_string()
        }
        ResultSection::Partial => header.cyan().bold().to_string(),
    }
}
