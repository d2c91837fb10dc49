//! Writer workers draining the batch channel into the sink.

use crate::cancel::{Cancellation, TripCause};
use crate::channel::BatchReceiver;
use crate::error::PipelineError;
use crate::sink::BatchSink;
use crate::slot::ErrorSlot;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    /// The channel was closed and fully drained.
    Drained,
    /// Cancellation was observed before starting the next write.
    Cancelled,
    /// The sink rejected a batch.
    Failed,
    /// The sink panicked while writing a batch.
    Panicked,
}

/// What a worker did before stopping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorkerReport {
    pub(crate) worker: usize,
    pub(crate) batches: u64,
    pub(crate) records: u64,
    pub(crate) exit: WorkerExit,
}

/// One of the identical consumers of the batch channel.
pub(crate) struct WriterWorker<S: BatchSink> {
    id: usize,
    rx: BatchReceiver<S::Record>,
    sink: Arc<S>,
    errors: ErrorSlot,
    cancellation: Cancellation,
}

impl<S: BatchSink> WriterWorker<S> {
    pub(crate) fn new(
        id: usize,
        rx: BatchReceiver<S::Record>,
        sink: Arc<S>,
        errors: ErrorSlot,
        cancellation: Cancellation,
    ) -> Self {
        Self {
            id,
            rx,
            sink,
            errors,
            cancellation,
        }
    }

    /// Spawn the worker on the current runtime.
    pub(crate) fn start(self) -> JoinHandle<WorkerReport> {
        tokio::spawn(self.run())
    }

    async fn run(self) -> WorkerReport {
        let mut report = WorkerReport {
            worker: self.id,
            batches: 0,
            records: 0,
            exit: WorkerExit::Drained,
        };

        loop {
            if self.cancellation.is_tripped().is_some() {
                report.exit = WorkerExit::Cancelled;
                break;
            }

            let Some(batch) = self.rx.pop().await else {
                break;
            };

            // The pop may have waited across a trip
            if self.cancellation.is_tripped().is_some() {
                report.exit = WorkerExit::Cancelled;
                break;
            }

            let offset = batch.offset();
            let records = batch.len();
            let written = AssertUnwindSafe(self.sink.write(batch))
                .catch_unwind()
                .await;
            match written {
                Ok(Ok(())) => {
                    report.batches += 1;
                    report.records += records as u64;
                }
                Ok(Err(e)) => {
                    let first = self.errors.offer(PipelineError::Write {
                        offset,
                        records,
                        source: Box::new(e),
                    });
                    self.cancellation
                        .try_trip(TripCause::WriteFailed { worker: self.id });
                    if first {
                        error!(
                            "Writer {} failed to write batch at offset {} ({} records)",
                            self.id, offset, records
                        );
                    } else {
                        debug!(
                            "Writer {} failed at offset {} after an earlier failure; dropping error",
                            self.id, offset
                        );
                    }
                    report.exit = WorkerExit::Failed;
                    break;
                }
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    error!(
                        "Writer {} panicked writing batch at offset {}: {}",
                        self.id, offset, reason
                    );
                    self.errors.offer(PipelineError::WorkerPanicked {
                        worker: self.id,
                        reason,
                    });
                    self.cancellation
                        .try_trip(TripCause::WorkerPanicked { worker: self.id });
                    report.exit = WorkerExit::Panicked;
                    break;
                }
            }
        }

        debug!(
            "Writer {} stopped ({:?}): {} batches, {} records",
            report.worker, report.exit, report.batches, report.records
        );
        report
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_reason() {
        let from_str: Box<dyn Any + Send> = Box::new("boom");
        let from_string: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(42u8);

        assert_eq!(panic_reason(from_str.as_ref()), "boom");
        assert_eq!(panic_reason(from_string.as_ref()), "bang");
        assert_eq!(panic_reason(other.as_ref()), "unknown panic payload");
    }
}
