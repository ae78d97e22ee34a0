//! Error types for the bionic-reader library.
//!
//! Every failure is fatal for the request that produced it: a document that
//! is too large, in an unknown format, or that a converter cannot decode
//! will not become readable by trying again. [`ReaderError`] is therefore
//! the single error type returned from the top-level `process*` functions,
//! and nothing in the pipeline retries.
//!
//! Truncation of oversized output is *not* an error. It is reported in-band
//! (a notice paragraph) and through
//! [`crate::output::ProcessingStats::truncated`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the bionic-reader library.
#[derive(Debug, Error)]
pub enum ReaderError {
    // ── Request validation ────────────────────────────────────────────────
    /// The document exceeds the configured size ceiling.
    ///
    /// Checked before any converter is invoked.
    #[error("File is too large: {size} bytes (limit is {limit} bytes)")]
    FileTooLarge { size: usize, limit: usize },

    /// The file extension is not one of `doc`, `docx`, `pdf`, `txt`.
    #[error("Unsupported file format '{extension}' (expected doc, docx, pdf or txt)")]
    UnsupportedFormat { extension: String },

    // ── Conversion ────────────────────────────────────────────────────────
    /// The converter for this format could not decode the document.
    #[error("Failed to convert {format} document: {detail}")]
    ConversionFailure { format: String, detail: String },

    /// A `.txt` document is not valid text in the expected encoding.
    #[error("Text is not valid {encoding}: {detail}")]
    EncodingError { encoding: String, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a usable file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The remote object store could not fetch or delete a file.
    #[error("Object store error for '{file_id}': {detail}")]
    ObjectStore { file_id: String, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReaderError {
    /// Whether the error was caused by the request itself (bad upload)
    /// rather than by the service.
    ///
    /// The HTTP layer maps these to `4xx` responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReaderError::FileTooLarge { .. }
                | ReaderError::UnsupportedFormat { .. }
                | ReaderError::ConversionFailure { .. }
                | ReaderError::EncodingError { .. }
                | ReaderError::InvalidInput { .. }
                | ReaderError::FileNotFound { .. }
        )
    }

    pub(crate) fn conversion(format: impl Into<String>, detail: impl ToString) -> Self {
        ReaderError::ConversionFailure {
            format: format.into(),
            detail: detail.to_string(),
        }
    }
}
