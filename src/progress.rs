//! Progress-callback trait for processing events.
//!
//! Inject an [`Arc<dyn ProcessingProgressCallback>`] via
//! [`crate::config::ProcessingConfigBuilder::progress_callback`] to receive
//! events as a document moves through extraction, rendering and assembly.
//!
//! # Example
//!
//! ```rust
//! use bionic_reader::{ProcessingConfig, ProcessingProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct BatchCounter {
//!     batches: AtomicUsize,
//! }
//!
//! impl ProcessingProgressCallback for BatchCounter {
//!     fn on_batch_complete(&self, done: usize, total: usize) {
//!         self.batches.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} paragraphs rendered", done, total);
//!     }
//! }
//!
//! let counter = Arc::new(BatchCounter { batches: AtomicUsize::new(0) });
//!
//! let config = ProcessingConfig::builder()
//!     .progress_callback(counter as Arc<dyn ProcessingProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the orchestrator at stage boundaries.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events for one document arrive in order from the
/// task driving [`crate::process`].
pub trait ProcessingProgressCallback: Send + Sync {
    /// Called once the input passed the size and format checks.
    fn on_processing_start(&self, filename: &str, file_size: usize) {
        let _ = (filename, file_size);
    }

    /// Called when the converter has produced its raw lines.
    fn on_lines_extracted(&self, count: usize) {
        let _ = count;
    }

    /// Called before the first render batch is scheduled.
    fn on_render_start(&self, total_paragraphs: usize) {
        let _ = total_paragraphs;
    }

    /// Called after each render batch, with the running paragraph count.
    fn on_batch_complete(&self, done: usize, total: usize) {
        let _ = (done, total);
    }

    /// Called once the final document has been assembled.
    fn on_processing_complete(&self, paragraphs: usize, truncated: bool) {
        let _ = (paragraphs, truncated);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ProcessingProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProcessingConfig`].
pub type ProgressCallback = Arc<dyn ProcessingProgressCallback>;
