//! Levenshtein edit distance.
//!
//! # Overview
//!
//! Edit distance is the minimum number of single-character insertions,
//! deletions, or substitutions needed to turn one string into another.
//! Characters are Unicode scalar values, so `"é"` counts as one character.
//!
//! The computation is a single-row dynamic-programming sweep: one row of
//! `len(b) + 1` cells is updated left to right while the diagonal
//! predecessor is carried in a local. Working space is `O(len(b))`.
//!
//! ## Length-difference cutoff
//!
//! Two strings whose lengths differ by more than the cutoff (10 by default)
//! are never near duplicates for any realistic threshold, so the sweep is
//! skipped and `max(len(a), len(b))` is returned instead. This is an
//! approximation: the true distance can be smaller when both strings are
//! long. The cutoff is part of the observable behavior and can be switched
//! off with [`Levenshtein::with_length_cutoff`].
//!
//! # Example
//!
//! ```
//! use urlrecon::recon::{distance, Levenshtein};
//!
//! assert_eq!(distance("kitten", "sitting"), 3);
//!
//! // 50 vs 5 characters: the cutoff answers without running the sweep
//! let long = "a".repeat(50);
//! assert_eq!(distance(&long, "aaaaa"), 50);
//!
//! // Exact distance when the cutoff is disabled
//! let exact = Levenshtein::new().with_length_cutoff(None);
//! assert_eq!(exact.distance(&long, "aaaaa"), 45);
//! ```

/// Default length-difference cutoff for the distance fast path.
pub const DEFAULT_LENGTH_CUTOFF: usize = 10;

/// Levenshtein distance calculator.
///
/// Holds the length-difference cutoff. The free functions [`distance`] and
/// [`crate::recon::similarity`] use [`Levenshtein::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levenshtein {
    length_cutoff: Option<usize>,
}

impl Default for Levenshtein {
    fn default() -> Self {
        Self {
            length_cutoff: Some(DEFAULT_LENGTH_CUTOFF),
        }
    }
}

impl Levenshtein {
    /// Create a calculator with the default cutoff of 10 characters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the length-difference cutoff. `None` always computes the exact distance.
    #[must_use]
    pub fn with_length_cutoff(mut self, cutoff: Option<usize>) -> Self {
        self.length_cutoff = cutoff;
        self
    }

    /// The configured length-difference cutoff.
    #[must_use]
    pub fn length_cutoff(&self) -> Option<usize> {
        self.length_cutoff
    }

    /// Compute the edit distance between `a` and `b`.
    ///
    /// # Arguments
    ///
    /// * `a` - Source string
    /// * `b` - Target string
    ///
    /// # Returns
    ///
    /// The number of edits, or `max(len(a), len(b))` when the length
    /// difference exceeds the cutoff.
    #[must_use]
    pub fn distance(&self, a: &str, b: &str) -> usize {
        if a == b {
            return 0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.distance_chars(&a, &b)
    }

    /// [`Levenshtein::distance`] over already collected characters.
    ///
    /// Lets a caller scoring one item against many collect each string once.
    #[must_use]
    pub fn distance_chars(&self, a: &[char], b: &[char]) -> usize {
        if a == b {
            return 0;
        }

        if let Some(cutoff) = self.length_cutoff {
            if a.len().abs_diff(b.len()) > cutoff {
                return a.len().max(b.len());
            }
        }

        if a.is_empty() {
            return b.len();
        }
        if b.is_empty() {
            return a.len();
        }

        sweep(a, b)
    }

    /// Compute the 0-100 similarity score between `a` and `b`.
    ///
    /// See [`crate::recon::similarity`] for the formula.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.similarity_chars(&a, &b)
    }

    /// [`Levenshtein::similarity`] over already collected characters.
    #[must_use]
    pub fn similarity_chars(&self, a: &[char], b: &[char]) -> f64 {
        let len = a.len().max(b.len());
        if len == 0 {
            return 100.0;
        }
        let dist = self.distance_chars(a, b);
        ((len - dist) as f64 / len as f64) * 100.0
    }
}

/// Single-row DP over two non-empty character slices.
fn sweep(a: &[char], b: &[char]) -> usize {
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.iter().enumerate() {
        // `diagonal` is row[j - 1] from the previous row; column 0 costs i + 1.
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }

    row[b.len()]
}

/// Compute the edit distance between `a` and `b` with the default cutoff.
///
/// # Example
///
/// ```
/// use urlrecon::recon::distance;
///
/// assert_eq!(distance("", "abc"), 3);
/// assert_eq!(distance("flaw", "lawn"), 2);
/// ```
#[must_use]
pub fn distance(a: &str, b: &str) -> usize {
    Levenshtein::default().distance(a, b)
}
