//! Bounded FIFO hand-off between the driver and the writer workers.
//!
//! Pushing blocks while the channel is full, which caps the records in
//! flight at `queue_depth × batch_size`. Popping blocks while the channel is
//! empty and open. Closing is a one-time transition made by the driver;
//! batches already queued still drain after close.

use crate::batch::Batch;

/// Create a channel holding at most `depth` batches.
///
/// # Panics
///
/// Panics if `depth` is zero.
pub fn batch_channel<T>(depth: usize) -> (BatchSender<T>, BatchReceiver<T>) {
    let (tx, rx) = async_channel::bounded(depth);
    (BatchSender { tx }, BatchReceiver { rx })
}

/// Producer half, owned by the driver.
#[derive(Debug)]
pub struct BatchSender<T> {
    tx: async_channel::Sender<Batch<T>>,
}

impl<T> BatchSender<T> {
    /// Push a batch, waiting for free capacity.
    ///
    /// Returns the batch back when the channel has been closed or every
    /// receiver is gone.
    pub async fn push(&self, batch: Batch<T>) -> Result<(), Batch<T>> {
        self.tx.send(batch).await.map_err(|e| e.into_inner())
    }

    /// Close the channel. Returns `true` if this call closed it.
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    /// Number of batches currently queued.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether no batch is currently queued.
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer half. Each clone competes for batches, so every batch is
/// delivered to exactly one receiver.
#[derive(Debug)]
pub struct BatchReceiver<T> {
    rx: async_channel::Receiver<Batch<T>>,
}

impl<T> Clone for BatchReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> BatchReceiver<T> {
    /// Pop the next batch. Returns `None` once the channel is closed and
    /// drained.
    pub async fn pop(&self) -> Option<Batch<T>> {
        self.rx.recv().await.ok()
    }
}
