//! Reconciliation engine.
//!
//! # Overview
//!
//! [`reconcile`] partitions two collections:
//! 1. **Exact pass**: each item of `first` is tested against a hash set of
//!    `second`. Hits go to `matching`, misses to `unique_to_first`.
//! 2. **Near-duplicate pass**: each miss is scored against every item of
//!    `second` (the full collection, in order). Scores inside the profile
//!    bounds become [`PartialMatch`] records.
//! 3. **Reverse pass**: items of `second` absent from `first` go to
//!    `unique_to_second`.
//!
//! The [`Partitioner`] holds the prepared lookup for passes 1-2 so the batch
//! scheduler can feed `first` in slices; [`unique_to_second`] is pass 3.
//!
//! # Example
//!
//! ```
//! use urlrecon::recon::{reconcile, ComparisonProfile};
//!
//! let first = vec!["b".to_string(), "a".to_string()];
//! let second = vec!["a".to_string(), "c".to_string()];
//!
//! let result = reconcile(&first, &second, &ComparisonProfile::default());
//! assert_eq!(result.matching, vec!["a"]);
//! assert_eq!(result.unique_to_first, vec!["b"]);
//! assert_eq!(result.unique_to_second, vec!["c"]);
//! ```

use std::collections::HashSet;

use super::distance::Levenshtein;
use super::profile::{ComparisonProfile, MatchPolicy};
use super::result::{PartialMatch, ReconciliationResult};

/// Classifies items of the first collection against a prepared second collection.
#[derive(Debug)]
pub struct Partitioner<'a> {
    second: &'a [String],
    second_set: HashSet<&'a str>,
    second_chars: Vec<Vec<char>>,
    profile: ComparisonProfile,
    levenshtein: Levenshtein,
}

impl<'a> Partitioner<'a> {
    /// Build the exact-match lookup over `second`.
    #[must_use]
    pub fn new(second: &'a [String], profile: &ComparisonProfile) -> Self {
        debug_assert!(
            second.iter().all(|item| !item.is_empty()),
            "items must be non-empty"
        );
        Self {
            second,
            second_set: second.iter().map(String::as_str).collect(),
            second_chars: second.iter().map(|item| item.chars().collect()).collect(),
            profile: *profile,
            levenshtein: profile.levenshtein(),
        }
    }

    /// Classify a slice of the first collection, appending to `result`.
    ///
    /// Only `matching`, `unique_to_first` and `partial_matches` are touched.
    pub fn classify_batch(&self, batch: &[String], result: &mut ReconciliationResult) {
        for item in batch {
            debug_assert!(!item.is_empty(), "items must be non-empty");
            if self.second_set.contains(item.as_str()) {
                result.matching.push(item.clone());
            } else {
                result.unique_to_first.push(item.clone());
                self.find_partials(item, &mut result.partial_matches);
            }
        }
    }

    /// Score `item` against every entry of the second collection.
    fn find_partials(&self, item: &str, out: &mut Vec<PartialMatch>) {
        let item_chars: Vec<char> = item.chars().collect();
        for (candidate, candidate_chars) in self.second.iter().zip(&self.second_chars) {
            let score = self
                .levenshtein
                .similarity_chars(&item_chars, candidate_chars);
            if !self.profile.contains(score) {
                continue;
            }

            log::trace!("Partial match {:.2}%: {} ~ {}", score, item, candidate);
            out.push(PartialMatch::new(item, candidate.as_str(), score));

            if self.profile.policy() == MatchPolicy::FirstMatch {
                break;
            }
        }
    }
}

/// Items of `second` whose exact value does not occur in `first`, in `second` order.
#[must_use]
pub fn unique_to_second(first: &[String], second: &[String]) -> Vec<String> {
    let first_set: HashSet<&str> = first.iter().map(String::as_str).collect();
    second
        .iter()
        .filter(|item| !first_set.contains(item.as_str()))
        .cloned()
        .collect()
}

/// Reconcile two collections in one pass.
///
/// # Arguments
///
/// * `first` - First collection, in caller order
/// * `second` - Second collection, in caller order
/// * `profile` - Near-duplicate bounds and policy
///
/// # Returns
///
/// A [`ReconciliationResult`]. Empty inputs give empty result sets.
#[must_use]
pub fn reconcile(
    first: &[String],
    second: &[String],
    profile: &ComparisonProfile,
) -> ReconciliationResult {
    let mut result = ReconciliationResult::new();
    Partitioner::new(second, profile).classify_batch(first, &mut result);
    result.unique_to_second = unique_to_second(first, second);

    log::debug!(
        "Reconciled {} x {} items: {} matching, {} only in first, {} only in second, {} partial",
        first.len(),
        second.len(),
        result.matching.len(),
        result.unique_to_first.len(),
        result.unique_to_second.len(),
        result.partial_matches.len()
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn loose() -> ComparisonProfile {
        ComparisonProfile::new(70.0, 100.0).unwrap()
    }

    #[test]
    fn test_order_preserving_partition() {
        let result = reconcile(
            &items(&["b", "a"]),
            &items(&["a", "c"]),
            &ComparisonProfile::default(),
        );
        assert_eq!(result.matching, items(&["a"]));
        assert_eq!(result.unique_to_first, items(&["b"]));
        assert_eq!(result.unique_to_second, items(&["c"]));
        assert!(result.partial_matches.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let profile = ComparisonProfile::default();
        assert_eq!(reconcile(&[], &[], &profile), ReconciliationResult::new());

        let result = reconcile(&items(&["x"]), &[], &profile);
        assert_eq!(result.unique_to_first, items(&["x"]));
        assert!(result.partial_matches.is_empty());

        let result = reconcile(&[], &items(&["y"]), &profile);
        assert_eq!(result.unique_to_second, items(&["y"]));
    }

    #[test]
    fn test_near_duplicate_pair() {
        let result = reconcile(
            &items(&["http://ex.com/page"]),
            &items(&["http://ex.com/pag"]),
            &loose(),
        );
        assert_eq!(result.unique_to_first, items(&["http://ex.com/page"]));
        assert_eq!(result.unique_to_second, items(&["http://ex.com/pag"]));
        assert_eq!(result.partial_matches.len(), 1);

        let m = &result.partial_matches[0];
        assert_eq!(m.first, "http://ex.com/page");
        assert_eq!(m.second, "http://ex.com/pag");
        assert!((m.score - 17.0 / 18.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_matches_never_scored() {
        // "abcd" matches exactly, so it is not paired with "abce"
        let result = reconcile(&items(&["abcd"]), &items(&["abcd", "abce"]), &loose());
        assert_eq!(result.matching, items(&["abcd"]));
        assert!(result.partial_matches.is_empty());
    }

    #[test]
    fn test_collect_all_policy() {
        let first = items(&["http://ex.com/page"]);
        let second = items(&["http://ex.com/pag", "http://ex.com/pages", "http://other.org/"]);
        let result = reconcile(&first, &second, &loose());

        let partners: Vec<&str> = result
            .partial_matches
            .iter()
            .map(|m| m.second.as_str())
            .collect();
        assert_eq!(partners, ["http://ex.com/pag", "http://ex.com/pages"]);
    }

    #[test]
    fn test_first_match_policy() {
        let first = items(&["http://ex.com/page"]);
        let second = items(&["http://ex.com/pag", "http://ex.com/pages"]);
        let profile = loose().with_policy(MatchPolicy::FirstMatch);
        let result = reconcile(&first, &second, &profile);

        assert_eq!(result.partial_matches.len(), 1);
        assert_eq!(result.partial_matches[0].second, "http://ex.com/pag");
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        let profile = ComparisonProfile::new(50.0, 75.0).unwrap();
        // abcd vs abce scores exactly 75
        let result = reconcile(&items(&["abcd"]), &items(&["abce"]), &profile);
        assert!(result.partial_matches.is_empty());

        let profile = ComparisonProfile::new(75.0, 76.0).unwrap();
        let result = reconcile(&items(&["abcd"]), &items(&["abce"]), &profile);
        assert_eq!(result.partial_matches.len(), 1);
    }

    #[test]
    fn test_duplicates_in_first_reported_per_occurrence() {
        let result = reconcile(
            &items(&["a", "a", "z"]),
            &items(&["a"]),
            &ComparisonProfile::default(),
        );
        assert_eq!(result.matching, items(&["a", "a"]));
        assert_eq!(result.unique_to_first, items(&["z"]));
    }

    #[test]
    fn test_unique_to_second_keeps_order() {
        let unique = unique_to_second(&items(&["b"]), &items(&["d", "b", "a", "c"]));
        assert_eq!(unique, items(&["d", "a", "c"]));
    }

    #[test]
    fn test_partial_discovery_order() {
        let first = items(&["abcd1", "abcd2"]);
        let second = items(&["abcdx", "abcdy"]);
        let profile = ComparisonProfile::new(70.0, 100.0).unwrap();
        let result = reconcile(&first, &second, &profile);

        let pairs: Vec<(&str, &str)> = result
            .partial_matches
            .iter()
            .map(|m| (m.first.as_str(), m.second.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("abcd1", "abcdx"),
                ("abcd1", "abcdy"),
                ("abcd2", "abcdx"),
                ("abcd2", "abcdy"),
            ]
        );
    }

    #[test]
    fn test_length_cutoff_hides_long_pairs() {
        // 13 extra characters: cutoff scores 0, exact distance scores ~69%
        let a = "https://example.com/articles/";
        let b = "https://example.com/articles/2024/01/15/x/";
        let strict_cutoff = ComparisonProfile::new(50.0, 100.0).unwrap();
        let result = reconcile(&items(&[a]), &items(&[b]), &strict_cutoff);
        assert!(result.partial_matches.is_empty());

        let no_cutoff = strict_cutoff.with_length_cutoff(None);
        let result = reconcile(&items(&[a]), &items(&[b]), &no_cutoff);
        assert_eq!(result.partial_matches.len(), 1);
    }
}
