//! Progress reporting hook for long tables.

/// Receives progress after each batch of rows is classified.
///
/// Reporters only observe; they cannot change what the pipeline produces.
pub trait ProgressReporter: Send + Sync {
    /// Called with the number of rows classified so far and the total.
    fn on_batch(&self, processed: usize, total: usize);
}

impl<F> ProgressReporter for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_batch(&self, processed: usize, total: usize) {
        self(processed, total)
    }
}
