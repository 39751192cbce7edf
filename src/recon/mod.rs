//! Reconciliation and similarity engine.
//!
//! This module provides:
//! - Levenshtein edit distance with a length-difference fast path
//! - Similarity scores derived from it
//! - Exact/partial partitioning of two collections
//! - Batch-oriented incremental reconciliation with progress and cancellation

pub mod distance;
pub mod engine;
pub mod profile;
pub mod result;
pub mod scheduler;
pub mod similarity;

pub use distance::{distance, Levenshtein, DEFAULT_LENGTH_CUTOFF};
pub use engine::{reconcile, unique_to_second, Partitioner};
pub use profile::{ComparisonProfile, MatchPolicy, ProfileError};
pub use result::{PartialMatch, ReconciliationResult, ResultCounts, ResultSection};
pub use scheduler::{
    reconcile_incrementally, BatchReport, BatchScheduler, ReconcileError, DEFAULT_BATCH_SIZE,
};
pub use similarity::similarity;
