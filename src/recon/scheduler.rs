//! Incremental, batch-oriented reconciliation.
//!
//! # Overview
//!
//! Near-duplicate scoring is quadratic in the collection sizes, so large
//! inputs are processed in bounded batches of the first collection. After
//! each batch the scheduler reports progress and hands control back to the
//! caller, who decides when to run the next one:
//!
//! - [`BatchScheduler::next_batch`] processes exactly one batch.
//! - [`BatchScheduler::run`] drives all batches, yielding the thread
//!   between them, and honours the shutdown flag.
//! - [`reconcile_incrementally`] is the one-call form.
//!
//! Batches run strictly in sequence on the calling thread. The result is
//! identical, in content and order, to [`crate::recon::reconcile`].
//!
//! # Example
//!
//! ```
//! use urlrecon::recon::{reconcile_incrementally, ComparisonProfile};
//! use std::sync::Mutex;
//!
//! let first: Vec<String> = (0..2500).map(|i| format!("https://ex.com/{i}")).collect();
//! let second: Vec<String> = (0..10).map(|i| format!("https://ex.com/{i}")).collect();
//!
//! let seen = Mutex::new(Vec::new());
//! let result = reconcile_incrementally(
//!     &first,
//!     &second,
//!     &ComparisonProfile::default(),
//!     1000,
//!     |percent: f64| seen.lock().unwrap().push(percent),
//! );
//!
//! assert_eq!(result.matching.len(), 10);
//! assert_eq!(seen.lock().unwrap().last(), Some(&100.0));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::engine::{unique_to_second, Partitioner};
use super::profile::ComparisonProfile;
use super::result::ReconciliationResult;
use crate::progress::ProgressCallback;

/// Default number of first-collection items per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Errors that can occur during incremental reconciliation.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// The shutdown flag was raised before all batches ran.
    #[error("Reconciliation interrupted after {processed} of {total} items")]
    Interrupted {
        /// Items of the first collection classified before the interruption
        processed: usize,
        /// Size of the first collection
        total: usize,
    },
}

/// Outcome of one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchReport {
    /// Zero-based batch number
    pub index: usize,
    /// Items classified in this batch
    pub items: usize,
    /// Items classified so far
    pub processed: usize,
    /// Size of the first collection
    pub total: usize,
    /// Completion percentage after this batch
    pub percent: f64,
}

/// Caller-driven batch scheduler over the first collection.
pub struct BatchScheduler<'a> {
    first: &'a [String],
    second: &'a [String],
    partitioner: Partitioner<'a>,
    batch_size: usize,
    cursor: usize,
    batches_run: usize,
    result: ReconciliationResult,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback + 'a>>,
    last_percent: Option<f64>,
    interrupted: bool,
}

impl std::fmt::Debug for BatchScheduler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScheduler")
            .field("first", &self.first.len())
            .field("second", &self.second.len())
            .field("batch_size", &self.batch_size)
            .field("cursor", &self.cursor)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("interrupted", &self.interrupted)
            .finish()
    }
}

impl<'a> BatchScheduler<'a> {
    /// Prepare a run over `first` against `second`.
    #[must_use]
    pub fn new(first: &'a [String], second: &'a [String], profile: &ComparisonProfile) -> Self {
        Self {
            first,
            second,
            partitioner: Partitioner::new(second, profile),
            batch_size: DEFAULT_BATCH_SIZE,
            cursor: 0,
            batches_run: 0,
            result: ReconciliationResult::new(),
            shutdown_flag: None,
            progress_callback: None,
            last_percent: None,
            interrupted: false,
        }
    }

    /// Set the batch size. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the shutdown flag checked before every batch.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback + 'a>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches needed for the whole first collection.
    #[must_use]
    pub fn total_batches(&self) -> usize {
        self.first.len().div_ceil(self.batch_size)
    }

    /// Whether every item of the first collection has been classified.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.first.len()
    }

    /// Whether the run was stopped by the shutdown flag.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Completion percentage so far.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        percent_of(self.cursor, self.first.len())
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn report(&mut self, percent: f64) {
        self.last_percent = Some(percent);
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(percent);
        }
    }

    /// Classify the next batch of the first collection.
    ///
    /// # Returns
    ///
    /// `Some(report)` when a batch ran, `None` when nothing is left or the
    /// shutdown flag is set.
    pub fn next_batch(&mut self) -> Option<BatchReport> {
        if self.is_finished() {
            return None;
        }
        if self.is_shutdown_requested() {
            if !self.interrupted {
                log::info!(
                    "Reconciliation interrupted at {}/{} items",
                    self.cursor,
                    self.first.len()
                );
            }
            self.interrupted = true;
            return None;
        }

        if self.batches_run == 0 {
            if let Some(ref callback) = self.progress_callback {
                callback.on_start(self.first.len());
            }
        }

        let end = (self.cursor + self.batch_size).min(self.first.len());
        let batch = &self.first[self.cursor..end];
        self.partitioner.classify_batch(batch, &mut self.result);

        let report = BatchReport {
            index: self.batches_run,
            items: batch.len(),
            processed: end,
            total: self.first.len(),
            percent: percent_of(end, self.first.len()),
        };
        self.cursor = end;
        self.batches_run += 1;

        log::debug!(
            "Batch {}/{}: {} items, {:.1}% complete",
            report.index + 1,
            self.total_batches(),
            report.items,
            report.percent
        );
        self.report(report.percent);

        Some(report)
    }

    /// Run every remaining batch, yielding the thread between batches.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Interrupted`] if the shutdown flag is raised
    /// before the last batch. No partial result is returned.
    pub fn run(mut self) -> Result<ReconciliationResult, ReconcileError> {
        while self.next_batch().is_some() {
            std::thread::yield_now();
        }
        self.finish()
    }

    /// Complete the run and return the result.
    ///
    /// Remaining batches are processed without yielding, then
    /// `unique_to_second` is computed once.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Interrupted`] if the shutdown flag is set.
    pub fn finish(mut self) -> Result<ReconciliationResult, ReconcileError> {
        while self.next_batch().is_some() {}
        if self.interrupted {
            if let Some(ref callback) = self.progress_callback {
                callback.on_interrupt();
            }
            return Err(ReconcileError::Interrupted {
                processed: self.cursor,
                total: self.first.len(),
            });
        }
        Ok(self.into_result())
    }

    fn into_result(mut self) -> ReconciliationResult {
        while self.next_batch().is_some() {}

        if self.last_percent != Some(100.0) {
            self.report(100.0);
        }
        if let Some(ref callback) = self.progress_callback {
            callback.on_finish();
        }

        let mut result = std::mem::take(&mut self.result);
        result.unique_to_second = unique_to_second(self.first, self.second);

        log::info!(
            "Compared {} x {} items in {} batch(es): {} matching, {} only in first, {} only in second, {} partial",
            self.first.len(),
            self.second.len(),
            self.batches_run,
            result.matching.len(),
            result.unique_to_first.len(),
            result.unique_to_second.len(),
            result.partial_matches.len()
        );

        result
    }
}

fn percent_of(done: usize, total: usize) -> f64 {
    if total == 0 || done >= total {
        100.0
    } else {
        (done as f64 / total as f64) * 100.0
    }
}

/// Reconcile two collections in batches of at most `batch_size` items.
///
/// `on_progress` receives the completion percentage after every batch; the
/// last value is always 100. The thread is yielded between batches.
///
/// # Arguments
///
/// * `first` - First collection, processed in batches
/// * `second` - Second collection
/// * `profile` - Near-duplicate bounds and policy
/// * `batch_size` - Maximum items per batch (zero is treated as one)
/// * `on_progress` - Progress callback, e.g. a `Fn(f64)` closure
#[must_use]
pub fn reconcile_incrementally<'a, P>(
    first: &'a [String],
    second: &'a [String],
    profile: &ComparisonProfile,
    batch_size: usize,
    on_progress: P,
) -> ReconciliationResult
where
    P: ProgressCallback + 'a,
{
    let mut scheduler = BatchScheduler::new(first, second, profile)
        .with_batch_size(batch_size)
        .with_progress_callback(Arc::new(on_progress));

    while scheduler.next_batch().is_some() {
        std::thread::yield_now();
    }
    scheduler.into_result()
}
