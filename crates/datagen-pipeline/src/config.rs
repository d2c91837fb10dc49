//! Pipeline sizing.

use crate::error::PipelineError;

/// Default number of records per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default number of batches the channel buffers.
pub const DEFAULT_QUEUE_DEPTH: usize = 3;

/// Default record count under which a single writer and a single buffered
/// batch are used.
pub const DEFAULT_LOW_VOLUME_THRESHOLD: u64 = 3000;

/// Tunable constants used to size a run.
///
/// The right values depend on destination latency and throughput, so they
/// are exposed here instead of being fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTuning {
    /// Nominal records per batch.
    pub batch_size: usize,
    /// Batches buffered between the driver and the workers.
    pub queue_depth: usize,
    /// Runs with fewer records use one worker and a depth of one.
    pub low_volume_threshold: u64,
    /// Worker count override; `None` uses the available parallelism.
    pub worker_count: Option<usize>,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            low_volume_threshold: DEFAULT_LOW_VOLUME_THRESHOLD,
            worker_count: None,
        }
    }
}

/// Sizing of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Total number of records to generate.
    pub target_count: u64,
    /// Nominal records per batch; only the final batch may be shorter.
    pub batch_size: usize,
    /// Number of writer workers.
    pub worker_count: usize,
    /// Capacity of the batch channel.
    pub queue_depth: usize,
}

impl PipelineConfig {
    /// Size a run for `target_count` records.
    ///
    /// Below the low-volume threshold a single worker and a single buffered
    /// batch are used. Otherwise the worker count follows the available
    /// parallelism (or the override) and the queue depth follows the tuning.
    pub fn for_target(target_count: u64, tuning: &PipelineTuning) -> Self {
        let (worker_count, queue_depth) = if target_count < tuning.low_volume_threshold {
            (1, 1)
        } else {
            (
                tuning.worker_count.unwrap_or_else(available_workers),
                tuning.queue_depth,
            )
        };

        Self {
            target_count,
            batch_size: tuning.batch_size,
            worker_count,
            queue_depth,
        }
    }

    /// Whether this run uses the single-worker, single-buffer path.
    pub fn is_low_volume(&self) -> bool {
        self.worker_count == 1 && self.queue_depth == 1
    }

    /// Reject zero counts.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.target_count == 0 {
            return Err(PipelineError::Config("target count has to be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch size has to be > 0".into()));
        }
        if self.worker_count == 0 {
            return Err(PipelineError::Config("worker count has to be >= 1".into()));
        }
        if self.queue_depth == 0 {
            return Err(PipelineError::Config("queue depth has to be >= 1".into()));
        }
        Ok(())
    }
}

/// Number of processing units available to this process.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
