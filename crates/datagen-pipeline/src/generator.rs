//! Generator seam.

/// Produces batches of records on demand.
///
/// The driver calls [`generate`] from its single task, passing the shared
/// random source it borrows from the caller.
///
/// [`generate`]: BatchGenerator::generate
pub trait BatchGenerator {
    /// Record type handed to the sink.
    type Record: Send + 'static;

    /// Source of entropy threaded through every call.
    type Source;

    /// Generation failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce exactly `size` records or fail.
    fn generate(
        &mut self,
        size: usize,
        source: &mut Self::Source,
    ) -> Result<Vec<Self::Record>, Self::Error>;
}
