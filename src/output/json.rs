//! JSON output formatter for reconciliation results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "matching": ["https://ex.com/a"],
//!   "unique_to_first": ["https://ex.com/page"],
//!   "unique_to_second": ["https://ex.com/page/"],
//!   "partial_matches": [
//!     { "first": "https://ex.com/page", "second": "https://ex.com/page/", "score": 94.44 }
//!   ],
//!   "summary": {
//!     "counts": { "matching": 1, "unique_to_first": 1, "unique_to_second": 1, "partial_matches": 1 },
//!     "profile_name": "strict",
//!     "profile": { "lower_bound": 97.0, "upper_bound": 100.0, "policy": "collect-all", "length_cutoff": 10 },
//!     "batch_size": 1000,
//!     "duration_ms": 4,
//!     "generated_at": "2024-01-01T00:00:00Z"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::{OutputError, RunSummary};
use crate::recon::{PartialMatch, ReconciliationResult, ResultCounts};

/// Summary block of the JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary<'a> {
    /// Section sizes
    pub counts: ResultCounts,
    /// Run parameters
    #[serde(flatten)]
    pub run: &'a RunSummary,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Items present in both lists
    pub matching: &'a [String],
    /// Items only in the first list
    pub unique_to_first: &'a [String],
    /// Items only in the second list
    pub unique_to_second: &'a [String],
    /// Near-duplicate pairs
    pub partial_matches: &'a [PartialMatch],
    /// Counts and run parameters
    pub summary: JsonSummary<'a>,
}

impl<'a> JsonOutput<'a> {
    /// Create the JSON view of a result.
    #[must_use]
    pub fn new(result: &'a ReconciliationResult, summary: &'a RunSummary) -> Self {
        Self {
            matching: &result.matching,
            unique_to_first: &result.unique_to_first,
            unique_to_second: &result.unique_to_second,
            partial_matches: &result.partial_matches,
            summary: JsonSummary {
                counts: result.counts(),
                run: summary,
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), OutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recon::{ComparisonProfile, MatchPolicy};
    use std::time::Duration;

    fn summary() -> RunSummary {
        RunSummary::new(
            "loose",
            ComparisonProfile::new(70.0, 99.0)
                .unwrap()
                .with_policy(MatchPolicy::FirstMatch),
            250,
            Duration::from_millis(42),
        )
    }

    #[test]
    fn test_json_structure() {
        let result = ReconciliationResult {
            matching: vec!["a".to_string()],
            unique_to_first: vec!["abcd".to_string()],
            unique_to_second: vec!["abce".to_string()],
            partial_matches: vec![PartialMatch::new("abcd", "abce", 75.0)],
        };
        let summary = summary();
        let json = JsonOutput::new(&result, &summary).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["matching"][0], "a");
        assert_eq!(value["unique_to_first"][0], "abcd");
        assert_eq!(value["unique_to_second"][0], "abce");
        assert_eq!(value["partial_matches"][0]["second"], "abce");
        assert_eq!(value["partial_matches"][0]["score"], 75.0);

        let s = &value["summary"];
        assert_eq!(s["counts"]["matching"], 1);
        assert_eq!(s["counts"]["partial_matches"], 1);
        assert_eq!(s["profile_name"], "loose");
        assert_eq!(s["profile"]["lower_bound"], 70.0);
        assert_eq!(s["profile"]["upper_bound"], 99.0);
        assert_eq!(s["profile"]["policy"], "first-match");
        assert_eq!(s["batch_size"], 250);
        assert_eq!(s["duration_ms"], 42);
        assert!(s["generated_at"].is_string());
    }

    #[test]
    fn test_json_pretty_has_newline() {
        let result = ReconciliationResult::new();
        let summary = summary();
        let mut out = Vec::new();
        JsonOutput::new(&result, &summary)
            .write_to(&mut out, true)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  \"matching\": []"));
        assert!(text.ends_with("}\n"));
    }
}
