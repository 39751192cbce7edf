//! Similarity score derived from edit distance.
//!
//! The score is `(L - distance) / L * 100` where `L` is the length of the
//! longer string. Two empty strings score 100. Short strings swing more per
//! edit than long ones, so thresholds are tuned per use case (see
//! [`crate::recon::ComparisonProfile`]).

use super::distance::Levenshtein;

/// Compute the 0-100 similarity between `a` and `b` with the default cutoff.
///
/// # Example
///
/// ```
/// use urlrecon::recon::similarity;
///
/// assert_eq!(similarity("", ""), 100.0);
/// assert_eq!(similarity("abcd", "abce"), 75.0);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    Levenshtein::default().similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scores_100() {
        assert_eq!(similarity("a", "a"), 100.0);
        assert_eq!(similarity("http://ex.com/page", "http://ex.com/page"), 100.0);
    }

    #[test]
    fn test_both_empty_scores_100() {
        assert_eq!(similarity("", ""), 100.0);
    }

    #[test]
    fn test_one_empty_scores_0() {
        assert_eq!(similarity("", "abc"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_near_duplicate_url() {
        let score = similarity("http://ex.com/page", "http://ex.com/pag");
        let expected = 17.0 / 18.0 * 100.0;
        assert!((score - expected).abs() < 1e-9);
        assert!(score > 94.4 && score < 94.5);
    }

    #[test]
    fn test_length_cutoff_scores_0() {
        let long = "y".repeat(40);
        assert_eq!(similarity(&long, "y"), 0.0);
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(similarity("abcdef", "abd"), similarity("abd", "abcdef"));
    }
}
