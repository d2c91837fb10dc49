//! First-error-wins slot shared by the driver and the writer workers.

use crate::error::PipelineError;

/// Holds at most one error. The first offer is kept; later offers are
/// dropped without blocking.
///
/// Backed by a bounded(1) channel: `offer` is a non-blocking send that fails
/// when the slot is already occupied.
#[derive(Clone)]
pub struct ErrorSlot {
    tx: async_channel::Sender<PipelineError>,
    rx: async_channel::Receiver<PipelineError>,
}

impl ErrorSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        let (tx, rx) = async_channel::bounded(1);
        Self { tx, rx }
    }

    /// Offer an error. Returns `true` if it was recorded, `false` if an
    /// earlier error already occupies the slot.
    pub fn offer(&self, error: PipelineError) -> bool {
        self.tx.try_send(error).is_ok()
    }

    /// Whether an error has been recorded.
    pub fn is_occupied(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Remove and return the recorded error. Called once, after every
    /// writer has been joined.
    pub fn take(&self) -> Option<PipelineError> {
        self.rx.try_recv().ok()
    }
}

impl Default for ErrorSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSlot")
            .field("occupied", &self.is_occupied())
            .finish()
    }
}
