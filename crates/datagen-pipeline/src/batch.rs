//! Batches of generated records.

/// An ordered, finite group of records handled as one ingestion unit.
///
/// A batch is owned by exactly one stage at a time: the driver while it is
/// being produced, the channel while it is queued, then a single worker.
#[derive(Debug, PartialEq)]
pub struct Batch<T> {
    offset: u64,
    records: Vec<T>,
}

impl<T> Batch<T> {
    /// Create a batch whose first record sits at `offset` in the run.
    pub fn new(offset: u64, records: Vec<T>) -> Self {
        Self { offset, records }
    }

    /// Position of the first record of this batch in the run.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the records.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Take ownership of the records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}
