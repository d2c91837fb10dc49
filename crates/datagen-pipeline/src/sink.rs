//! Sink seam.

use crate::batch::Batch;
use async_trait::async_trait;

/// Destination of one unordered bulk write per batch.
///
/// A failure anywhere inside the batch is reported as one failure for the
/// whole batch. Retries, if any, belong to the implementation.
#[async_trait]
pub trait BatchSink: Send + Sync + 'static {
    /// Record type accepted by the sink.
    type Record: Send + 'static;

    /// Write failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist every record of the batch.
    async fn write(&self, batch: Batch<Self::Record>) -> Result<(), Self::Error>;
}
