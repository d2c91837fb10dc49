//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Boxed error from a generator or sink implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single error surfaced by a failed run.
///
/// Only the first failure of a run is reported; failures observed after it
/// are dropped.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid sizing.
    #[error("invalid pipeline configuration: {0}")]
    Config(String),

    /// The generator could not produce a batch.
    #[error("failed to generate batch at offset {offset}: {source}")]
    Generation {
        offset: u64,
        #[source]
        source: BoxError,
    },

    /// The generator returned a batch of the wrong length.
    #[error("generator returned {actual} records at offset {offset}, expected {expected}")]
    BatchSizeMismatch {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// The sink rejected a batch.
    #[error("exception occurred during bulk insert of {records} records at offset {offset}: {source}")]
    Write {
        offset: u64,
        records: usize,
        #[source]
        source: BoxError,
    },

    /// A writer worker panicked.
    #[error("writer worker {worker} panicked: {reason}")]
    WorkerPanicked { worker: usize, reason: String },

    /// The run was stopped from outside before every record was submitted.
    #[error("ingestion interrupted")]
    Interrupted,

    /// Every writer exited before all records were submitted.
    #[error("all writer workers exited before ingestion completed")]
    WorkersExited,
}
