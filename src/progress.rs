//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ProgressCallback`] trait consumed by the batch
//! scheduler and the [`Progress`] struct which renders it as a terminal
//! progress bar for the command-line tool.
//!
//! Any `Fn(f64) + Send + Sync` closure is also a [`ProgressCallback`].

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Resolution of the percentage bar (tenths of a percent).
const BAR_LENGTH: u64 = 1000;

/// Progress callback for incremental reconciliation.
///
/// Only [`ProgressCallback::on_progress`] is required. Callbacks are
/// fire-and-forget: they cannot influence the result.
pub trait ProgressCallback: Send + Sync {
    /// Called before the first batch.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of items in the first collection
    fn on_start(&self, _total: usize) {}

    /// Called after each batch with the completion percentage (0-100).
    fn on_progress(&self, percent: f64);

    /// Called once after the final progress report.
    fn on_finish(&self) {}

    /// Called instead of [`ProgressCallback::on_finish`] when the run is
    /// cancelled.
    fn on_interrupt(&self) {}
}

impl<F> ProgressCallback for F
where
    F: Fn(f64) + Send + Sync,
{
    fn on_progress(&self, percent: f64) {
        self(percent);
    }
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bar will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlrecon::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut bar| bar.take())
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_start(&self, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::with_draw_target(Some(BAR_LENGTH), ProgressDrawTarget::stderr());
        pb.set_style(Self::style());
        pb.set_message(format!("Comparing {total} items"));
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_progress(&self, percent: f64) {
        if self.quiet {
            return;
        }
        let position = (percent.clamp(0.0, 100.0) * BAR_LENGTH as f64 / 100.0).round() as u64;
        self.with_bar(|pb| pb.set_position(position));
    }

    fn on_finish(&self) {
        if let Some(pb) = self.take_bar() {
            pb.finish_with_message("Comparison complete");
        }
    }

    fn on_interrupt(&self) {
        if let Some(pb) = self.take_bar() {
            pb.abandon_with_message("Interrupted");
        }
    }
}
