//! Document converters: turn raw bytes of a supported format into lines.
//!
//! Decoding binary formats is a boundary concern of the pipeline, so every
//! format sits behind the [`Converter`] trait and is looked up in a
//! [`ConverterRegistry`]. The default registry handles `.txt`, `.docx` (and
//! `.doc` files that are really WordprocessingML) and `.pdf`; callers can
//! swap any entry for their own implementation, for example a converter
//! that shells out to an external service and returns HTML.
//!
//! Converters return an [`Extracted`] payload in whichever shape is natural
//! for them. [`Conversion::into_lines`] normalises all shapes into the raw
//! line sequence the paragraph structurer consumes.

pub mod docx;
pub mod html;
pub mod pdf;
pub mod txt;

use crate::error::ReaderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Formats accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Doc,
    Docx,
    Pdf,
    Txt,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::Doc,
        DocumentFormat::Docx,
        DocumentFormat::Pdf,
        DocumentFormat::Txt,
    ];

    /// Match a bare extension (no dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "doc" => Some(DocumentFormat::Doc),
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" => Some(DocumentFormat::Txt),
            _ => None,
        }
    }

    /// Resolve the format of `filename` from its extension.
    ///
    /// Returns the format and the lower-cased extension.
    pub fn from_filename(filename: &str) -> Result<(Self, String), ReaderError> {
        let ext = extension_of(filename);
        Self::from_extension(&ext)
            .map(|f| (f, ext.clone()))
            .ok_or(ReaderError::UnsupportedFormat { extension: ext })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased extension of `filename`, or an empty string.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// What a converter produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// One entry per visual line or block.
    Lines(Vec<String>),
    /// Plain text; lines are separated by `\n`.
    Text(String),
    /// An HTML fragment; lines are the text of its block-level elements.
    Html(String),
}

/// Converter output plus the metadata the pipeline reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub content: Extracted,
    /// Number of pages processed, for paginated formats.
    pub page_count: Option<usize>,
}

impl Conversion {
    pub fn lines(lines: Vec<String>) -> Self {
        Self {
            content: Extracted::Lines(lines),
            page_count: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Extracted::Text(text.into()),
            page_count: None,
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            content: Extracted::Html(html.into()),
            page_count: None,
        }
    }

    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Normalise the payload into raw lines.
    pub fn into_lines(self) -> Vec<String> {
        match self.content {
            Extracted::Lines(lines) => lines,
            Extracted::Text(text) => text
                .split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect(),
            Extracted::Html(html) => html::block_texts(&html),
        }
    }
}

/// Per-call options handed to converters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    /// Only the first `max_pdf_pages` pages are read.
    pub max_pdf_pages: usize,
    /// Encoding label for plain-text inputs.
    pub text_encoding: Option<String>,
}

/// Decodes one document format.
///
/// Implementations run on a blocking thread and must not assume an async
/// runtime.
pub trait Converter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn convert(&self, bytes: &[u8], options: &ConvertOptions) -> Result<Conversion, ReaderError>;
}

/// Converters keyed by document format.
#[derive(Clone)]
pub struct ConverterRegistry {
    converters: BTreeMap<DocumentFormat, Arc<dyn Converter>>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let word: Arc<dyn Converter> = Arc::new(docx::DocxConverter);
        Self::empty()
            .with(DocumentFormat::Txt, Arc::new(txt::TxtConverter))
            .with(DocumentFormat::Doc, Arc::clone(&word))
            .with(DocumentFormat::Docx, word)
            .with(DocumentFormat::Pdf, Arc::new(pdf::PdfConverter))
    }
}

impl ConverterRegistry {
    pub fn empty() -> Self {
        Self {
            converters: BTreeMap::new(),
        }
    }

    /// Register (or replace) the converter for `format`.
    pub fn with(mut self, format: DocumentFormat, converter: Arc<dyn Converter>) -> Self {
        self.converters.insert(format, converter);
        self
    }

    pub fn get(&self, format: DocumentFormat) -> Option<Arc<dyn Converter>> {
        self.converters.get(&format).cloned()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.converters.iter().map(|(k, v)| (k.as_str(), v.name())))
            .finish()
    }
}
