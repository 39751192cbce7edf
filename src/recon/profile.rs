//! Comparison profiles: which similarity range counts as a near duplicate.
//!
//! A profile bundles the score bounds `[lower_bound, upper_bound)`, the
//! [`MatchPolicy`] that decides how many partners are reported per item,
//! and the distance cutoff used while scoring.
//!
//! # Example
//!
//! ```
//! use urlrecon::recon::{ComparisonProfile, MatchPolicy};
//!
//! let profile = ComparisonProfile::new(70.0, 100.0)
//!     .unwrap()
//!     .with_policy(MatchPolicy::FirstMatch);
//!
//! assert!(profile.contains(94.4));
//! assert!(!profile.contains(100.0));
//! assert!(ComparisonProfile::new(90.0, 80.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::distance::{Levenshtein, DEFAULT_LENGTH_CUTOFF};

/// How many qualifying partners are recorded for each unmatched item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Record every item of the second collection that scores within bounds.
    #[default]
    CollectAll,
    /// Stop at the first qualifying item (depends on second-collection order).
    FirstMatch,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::CollectAll => write!(f, "collect-all"),
            MatchPolicy::FirstMatch => write!(f, "first-match"),
        }
    }
}

/// Errors raised when building a [`ComparisonProfile`].
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    /// A bound is NaN or infinite.
    #[error("Similarity bound must be a finite number, got {0}")]
    NotFinite(f64),

    /// A bound lies outside 0..=100.
    #[error("Similarity bound {0} is outside the range 0-100")]
    OutOfRange(f64),

    /// The lower bound is greater than the upper bound.
    #[error("Lower bound {lower} is greater than upper bound {upper}")]
    Inverted {
        /// Inclusive lower bound
        lower: f64,
        /// Exclusive upper bound
        upper: f64,
    },
}

/// Score bounds and matching policy for one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonProfile {
    lower_bound: f64,
    upper_bound: f64,
    policy: MatchPolicy,
    length_cutoff: Option<usize>,
}

impl ComparisonProfile {
    /// Create a profile with inclusive `lower_bound` and exclusive `upper_bound`.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if a bound is not finite, lies outside 0-100,
    /// or `lower_bound > upper_bound`.
    pub fn new(lower_bound: f64, upper_bound: f64) -> Result<Self, ProfileError> {
        for bound in [lower_bound, upper_bound] {
            if !bound.is_finite() {
                return Err(ProfileError::NotFinite(bound));
            }
            if !(0.0..=100.0).contains(&bound) {
                return Err(ProfileError::OutOfRange(bound));
            }
        }
        if lower_bound > upper_bound {
            return Err(ProfileError::Inverted {
                lower: lower_bound,
                upper: upper_bound,
            });
        }

        Ok(Self {
            lower_bound,
            upper_bound,
            policy: MatchPolicy::default(),
            length_cutoff: Some(DEFAULT_LENGTH_CUTOFF),
        })
    }

    /// Create a profile whose upper bound is 100 (exact matches excluded).
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if `lower_bound` is invalid.
    pub fn with_lower_bound(lower_bound: f64) -> Result<Self, ProfileError> {
        Self::new(lower_bound, 100.0)
    }

    /// Set the partial match policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the length-difference cutoff used by the distance fast path.
    #[must_use]
    pub fn with_length_cutoff(mut self, cutoff: Option<usize>) -> Self {
        self.length_cutoff = cutoff;
        self
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Exclusive upper bound.
    #[must_use]
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Partial match policy.
    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Length-difference cutoff.
    #[must_use]
    pub fn length_cutoff(&self) -> Option<usize> {
        self.length_cutoff
    }

    /// Distance calculator configured with this profile's cutoff.
    #[must_use]
    pub fn levenshtein(&self) -> Levenshtein {
        Levenshtein::new().with_length_cutoff(self.length_cutoff)
    }

    /// Whether `score` falls within `[lower_bound, upper_bound)`.
    #[must_use]
    pub fn contains(&self, score: f64) -> bool {
        score >= self.lower_bound && score < self.upper_bound
    }
}

impl Default for ComparisonProfile {
    /// The strict 97-100 range.
    fn default() -> Self {
        Self {
            lower_bound: 97.0,
            upper_bound: 100.0,
            policy: MatchPolicy::default(),
            length_cutoff: Some(DEFAULT_LENGTH_CUTOFF),
        }
    }
}

impl std::fmt::Display for ComparisonProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}%, {}%) {}",
            self.lower_bound, self.upper_bound, self.policy
        )
    }
}
