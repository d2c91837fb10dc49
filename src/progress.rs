//! Log-based progress reporting.

use datagen_pipeline::ProgressReporter;
use std::time::Instant;
use tracing::info;

/// Logs progress every time another 10% of the target is submitted, and the
/// throughput once the run is over.
pub struct LogProgress {
    label: String,
    target: u64,
    submitted: u64,
    last_decile: u64,
    start_time: Instant,
}

impl LogProgress {
    /// Create a reporter for `target` records, labelled by namespace.
    pub fn new(label: impl Into<String>, target: u64) -> Self {
        Self {
            label: label.into(),
            target,
            submitted: 0,
            last_decile: 0,
            start_time: Instant::now(),
        }
    }

    /// Records submitted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Update the count and return the new percentage when another 10% step
    /// was crossed.
    fn advance(&mut self, submitted: u64) -> Option<u64> {
        self.submitted = submitted;
        if self.target == 0 {
            return None;
        }
        let decile = (submitted.min(self.target) * 10 / self.target).min(10);
        if decile > self.last_decile {
            self.last_decile = decile;
            Some(decile * 10)
        } else {
            None
        }
    }
}

impl ProgressReporter for LogProgress {
    fn set(&mut self, submitted: u64) {
        if let Some(percent) = self.advance(submitted) {
            info!(
                "{}: {percent}% ({}/{})",
                self.label, self.submitted, self.target
            );
        }
    }

    fn finish(&mut self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.submitted as f64 / elapsed
        } else {
            0.0
        };
        info!(
            "{}: submitted {}/{} documents in {elapsed:.2}s ({rate:.0} docs/sec)",
            self.label, self.submitted, self.target
        );
    }
}
