//! Load progress reporting.
//!
//! The loader reports how far through the input it is in bytes, alongside
//! the running row count. Rendering lives in `crime_viz_cli_utils`; tests
//! and library callers use [`null_progress`].

use std::sync::Arc;

/// Receives progress events while a CSV export is read.
pub trait ProgressCallback: Send + Sync {
    /// Called once before the first row. `total_bytes` is the input size
    /// when reading from a file, `None` for arbitrary readers.
    fn start(&self, label: &str, total_bytes: Option<u64>);

    /// Reports the byte offset reached and the rows read so far.
    fn advance(&self, bytes_read: u64, rows_read: u64);

    /// Called once after the last row.
    fn finish(&self, summary: String);
}

/// Discards every event.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn start(&self, _label: &str, _total_bytes: Option<u64>) {}
    fn advance(&self, _bytes_read: u64, _rows_read: u64) {}
    fn finish(&self, _summary: String) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
