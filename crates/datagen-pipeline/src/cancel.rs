//! Cancellation coordinator shared by the driver and every writer worker.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Who tripped the cancellation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripCause {
    /// The generator could not produce a batch.
    GenerationFailed,
    /// A writer worker's sink call failed.
    WriteFailed { worker: usize },
    /// A writer worker panicked.
    WorkerPanicked { worker: usize },
    /// The orchestration layer asked the run to stop (e.g. Ctrl-C).
    Interrupted,
}

impl fmt::Display for TripCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenerationFailed => write!(f, "batch generation failed"),
            Self::WriteFailed { worker } => write!(f, "writer worker {worker} failed"),
            Self::WorkerPanicked { worker } => write!(f, "writer worker {worker} panicked"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Write-once cancellation flag plus the cause recorded by the first trip.
///
/// Cloning is cheap and every clone observes the same state. Tripping never
/// interrupts work already in flight; holders check [`is_tripped`] before
/// starting each unit of work.
///
/// [`is_tripped`]: Cancellation::is_tripped
#[derive(Clone, Default)]
pub struct Cancellation {
    cause: Arc<OnceLock<TripCause>>,
}

impl Cancellation {
    /// Create an untripped coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the coordinator. Returns `true` only for the first trip; later
    /// trips are no-ops and keep the original cause.
    pub fn try_trip(&self, cause: TripCause) -> bool {
        self.cause.set(cause).is_ok()
    }

    /// The recorded cause, if the coordinator has been tripped.
    pub fn is_tripped(&self) -> Option<TripCause> {
        self.cause.get().copied()
    }
}

impl fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancellation")
            .field("cause", &self.is_tripped())
            .finish()
    }
}
