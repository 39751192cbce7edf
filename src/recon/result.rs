//! Reconciliation results.
//!
//! A [`ReconciliationResult`] holds the four ordered result sets produced by
//! [`crate::recon::reconcile`]. [`ResultSection`] names those sets so callers
//! can pick a subset and merge it with [`ReconciliationResult::combine`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A near-duplicate pair: an item unique to the first collection and an
/// item of the second collection that scored within the profile bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialMatch {
    /// Item from the first collection
    pub first: String,
    /// Item from the second collection
    pub second: String,
    /// Similarity score in percent
    pub score: f64,
}

impl PartialMatch {
    /// Create a new partial match record.
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>, score: f64) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            score,
        }
    }
}

impl std::fmt::Display for PartialMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({:.2}%)", self.first, self.second, self.score)
    }
}

/// One of the four result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResultSection {
    /// Items present in both collections
    Matching,
    /// Items only in the first collection
    UniqueFirst,
    /// Items only in the second collection
    UniqueSecond,
    /// Near-duplicate pairs
    Partial,
}

impl ResultSection {
    /// All sections in presentation order.
    pub const ALL: [ResultSection; 4] = [
        ResultSection::Matching,
        ResultSection::UniqueFirst,
        ResultSection::UniqueSecond,
        ResultSection::Partial,
    ];

    /// Human-readable title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ResultSection::Matching => "Matching items",
            ResultSection::UniqueFirst => "Only in first list",
            ResultSection::UniqueSecond => "Only in second list",
            ResultSection::Partial => "Partial matches",
        }
    }

    /// Machine-readable name (used in CSV output).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ResultSection::Matching => "matching",
            ResultSection::UniqueFirst => "unique-first",
            ResultSection::UniqueSecond => "unique-second",
            ResultSection::Partial => "partial",
        }
    }
}

impl std::fmt::Display for ResultSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of reconciling two collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Items of the first collection whose exact value occurs in the second
    pub matching: Vec<String>,
    /// Items of the first collection absent from the second
    pub unique_to_first: Vec<String>,
    /// Items of the second collection absent from the first
    pub unique_to_second: Vec<String>,
    /// Near-duplicate pairs in discovery order
    pub partial_matches: Vec<PartialMatch>,
}

impl ReconciliationResult {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both collections contained exactly the same values.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.unique_to_first.is_empty() && self.unique_to_second.is_empty()
    }

    /// Number of entries in a section.
    #[must_use]
    pub fn section_len(&self, section: ResultSection) -> usize {
        match section {
            ResultSection::Matching => self.matching.len(),
            ResultSection::UniqueFirst => self.unique_to_first.len(),
            ResultSection::UniqueSecond => self.unique_to_second.len(),
            ResultSection::Partial => self.partial_matches.len(),
        }
    }

    /// Display lines of a section. Partial matches use their
    /// `"first - second (score%)"` form.
    #[must_use]
    pub fn section_lines(&self, section: ResultSection) -> Vec<String> {
        match section {
            ResultSection::Matching => self.matching.clone(),
            ResultSection::UniqueFirst => self.unique_to_first.clone(),
            ResultSection::UniqueSecond => self.unique_to_second.clone(),
            ResultSection::Partial => self
                .partial_matches
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Merge the display lines of the chosen sections.
    ///
    /// Sections are visited in the order given; duplicate lines keep their
    /// first occurrence.
    ///
    /// # Example
    ///
    /// ```
    /// use urlrecon::recon::{reconcile, ComparisonProfile, ResultSection};
    ///
    /// let first = vec!["a".to_string(), "b".to_string()];
    /// let second = vec!["a".to_string(), "c".to_string()];
    /// let result = reconcile(&first, &second, &ComparisonProfile::default());
    ///
    /// let combined = result.combine(&[ResultSection::UniqueFirst, ResultSection::UniqueSecond]);
    /// assert_eq!(combined, vec!["b", "c"]);
    /// ```
    #[must_use]
    pub fn combine(&self, sections: &[ResultSection]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut combined = Vec::new();
        for &section in sections {
            for line in self.section_lines(section) {
                if seen.insert(line.clone()) {
                    combined.push(line);
                }
            }
        }
        combined
    }

    /// Counts per section.
    #[must_use]
    pub fn counts(&self) -> ResultCounts {
        ResultCounts {
            matching: self.matching.len(),
            unique_to_first: self.unique_to_first.len(),
            unique_to_second: self.unique_to_second.len(),
            partial_matches: self.partial_matches.len(),
        }
    }
}

/// Section sizes of a [`ReconciliationResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounts {
    /// Exact matches
    pub matching: usize,
    /// Items only in the first collection
    pub unique_to_first: usize,
    /// Items only in the second collection
    pub unique_to_second: usize,
    /// Near-duplicate pairs
    pub partial_matches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReconciliationResult {
        ReconciliationResult {
            matching: vec!["a".into()],
            unique_to_first: vec!["b".into(), "x".into()],
            unique_to_second: vec!["x".into(), "c".into()],
            partial_matches: vec![PartialMatch::new("b", "bb", 50.0)],
        }
    }

    #[test]
    fn test_partial_match_display() {
        let m = PartialMatch::new("http://ex.com/page", "http://ex.com/pag", 17.0 / 18.0 * 100.0);
        assert_eq!(
            m.to_string(),
            "http://ex.com/page - http://ex.com/pag (94.44%)"
        );
    }

    #[test]
    fn test_section_lines() {
        let result = sample();
        assert_eq!(result.section_lines(ResultSection::Matching), vec!["a"]);
        assert_eq!(
            result.section_lines(ResultSection::Partial),
            vec!["b - bb (50.00%)"]
        );
        assert_eq!(result.section_len(ResultSection::UniqueSecond), 2);
    }

    #[test]
    fn test_combine_deduplicates_in_order() {
        let result = sample();
        let combined = result.combine(&[ResultSection::UniqueFirst, ResultSection::UniqueSecond]);
        assert_eq!(combined, vec!["b", "x", "c"]);
    }

    #[test]
    fn test_combine_nothing_selected() {
        assert!(sample().combine(&[]).is_empty());
    }

    #[test]
    fn test_counts() {
        let counts = sample().counts();
        assert_eq!(counts.matching, 1);
        assert_eq!(counts.unique_to_first, 2);
        assert_eq!(counts.unique_to_second, 2);
        assert_eq!(counts.partial_matches, 1);
    }

    #[test]
    fn test_is_identical() {
        assert!(ReconciliationResult::new().is_identical());
        assert!(!sample().is_identical());
    }

    #[test]
    fn test_section_keys() {
        let keys: Vec<&str> = ResultSection::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["matching", "unique-first", "unique-second", "partial"]);
    }
}
