//! Output types: the assembled document plus per-request metadata and stats.
//!
//! A [`Document`] is built once per request and never mutated afterwards.
//! Its JSON form is what the HTTP service and the remote boundary return:
//!
//! ```json
//! {
//!   "content": "<p><b>Hel</b>lo ...</p>",
//!   "type": "html",
//!   "pageCount": 3,
//!   "filename": "report.pdf",
//!   "extension": "pdf",
//!   "fileSize": 48213,
//!   "stats": { "lineCount": 120, "paragraphCount": 14, ... }
//! }
//! ```

use crate::pipeline::structure::Paragraph;
use serde::{Deserialize, Serialize};

/// Content type of [`Document::content`]. Always `"html"`.
pub const CONTENT_TYPE_HTML: &str = "html";

/// The result of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Structured paragraphs, before rendering. Not serialised.
    #[serde(skip)]
    pub paragraphs: Vec<Paragraph>,

    /// The rendered, possibly truncated HTML.
    pub content: String,

    #[serde(flatten)]
    pub metadata: DocumentMetadata,

    pub stats: ProcessingStats,
}

/// Facts about the input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(rename = "type")]
    pub content_type: String,

    /// Pages read, for paginated formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,

    pub filename: String,

    /// Lower-cased extension without the dot.
    pub extension: String,

    /// Input size in bytes.
    pub file_size: usize,
}

/// Counters and timings for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Raw lines produced by the converter, blank lines included.
    pub line_count: usize,
    pub paragraph_count: usize,
    pub heading_count: usize,
    /// Whether the truncation guard dropped content.
    pub truncated: bool,
    /// Length of `content` in characters.
    pub content_length: usize,
    pub bionic_applied: bool,
    pub extract_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}
