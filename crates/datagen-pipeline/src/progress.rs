//! Progress reporting seam.

/// Receives the running count of submitted records.
///
/// Called only by the driver, from its single task, with non-decreasing
/// values. The last `set` carries the true submitted total and is always
/// followed by `finish`, on success and on failure.
pub trait ProgressReporter {
    /// Record that `submitted` records have been handed to the writers.
    fn set(&mut self, submitted: u64);

    /// Signal that no further updates will come.
    fn finish(&mut self);
}

/// Reporter that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn set(&mut self, _submitted: u64) {}

    fn finish(&mut self) {}
}
