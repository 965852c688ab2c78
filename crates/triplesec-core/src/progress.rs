//! Byte-count progress notifications.
//!
//! Reporters are observers only. They cannot fail from the pipeline's point
//! of view: an implementation that hits an error (closed terminal, etc.)
//! swallows it.

/// Receives progress while a file is read.
pub trait ProgressReporter {
    /// Called once with the size of the source file.
    fn start(&mut self, total_bytes: u64);

    /// Called after each chunk is read.
    fn advance(&mut self, bytes: u64);

    /// Called when reading is complete.
    fn finish(&mut self);
}

/// A reporter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _total_bytes: u64) {}
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self) {}
}
