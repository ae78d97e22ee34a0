//! PDF text extraction via pdfium.
//!
//! pdfium reports text as positioned segments rather than lines. Line
//! breaks are rebuilt from the vertical position of consecutive segments:
//! whenever the baseline moves, a new line starts. Only the first
//! `max_pdf_pages` pages are read.
//!
//! The pdfium shared library is bound at runtime: `PDFIUM_LIB_PATH` (a
//! file, or a directory holding the platform library) wins, otherwise the
//! system library search path is used.

use super::{Conversion, ConvertOptions, Converter};
use crate::error::ReaderError;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable pointing at the pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Baseline movement (in points) that starts a new line.
const LINE_Y_TOLERANCE: f32 = 0.5;

/// One positioned run of text on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Vertical position of the baseline, in points.
    pub y: f32,
    pub text: String,
}

impl TextItem {
    pub fn new(y: f32, text: impl Into<String>) -> Self {
        Self {
            y,
            text: text.into(),
        }
    }
}

/// Converter for `.pdf` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfConverter;

impl Converter for PdfConverter {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn convert(&self, bytes: &[u8], options: &ConvertOptions) -> Result<Conversion, ReaderError> {
        let pdfium = Pdfium::new(bind_pdfium()?);
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| ReaderError::conversion("pdf", format!("{:?}", e)))?;

        let pages = document.pages();
        let total = pages.len() as usize;
        let read = total.min(options.max_pdf_pages);
        info!("PDF loaded: {} pages, reading {}", total, read);

        let mut lines = Vec::new();
        for (idx, page) in pages.iter().take(read).enumerate() {
            let text = page.text().map_err(|e| {
                ReaderError::conversion("pdf", format!("page {}: {:?}", idx + 1, e))
            })?;
            let items: Vec<TextItem> = text
                .segments()
                .iter()
                .map(|segment| TextItem::new(segment.bounds().bottom().value, segment.text()))
                .collect();
            let page_lines = rebuild_lines(&items);
            debug!("Page {}: {} lines", idx + 1, page_lines.len());
            lines.extend(page_lines);
        }

        Ok(Conversion::lines(lines).with_page_count(read))
    }
}

/// Bind the pdfium shared library.
pub fn bind_pdfium() -> Result<Box<dyn PdfiumLibraryBindings>, ReaderError> {
    if let Ok(path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let pb = PathBuf::from(path);
        let lib_path = if pb.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&pb)
        } else {
            pb
        };
        debug!("Binding pdfium from {}", lib_path.display());
        return Pdfium::bind_to_library(&lib_path).map_err(|e| {
            ReaderError::PdfiumBindingFailed(format!("{}: {:?}", lib_path.display(), e))
        });
    }

    Pdfium::bind_to_system_library()
        .map_err(|e| ReaderError::PdfiumBindingFailed(format!("system library: {:?}", e)))
}

/// Join positioned text items into lines.
///
/// Items are taken in reading order. A new line starts whenever the
/// vertical position changes by more than [`LINE_Y_TOLERANCE`].
pub fn rebuild_lines(items: &[TextItem]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut last_y: Option<f32> = None;

    for item in items {
        if let Some(y) = last_y {
            if (item.y - y).abs() > LINE_Y_TOLERANCE {
                lines.push(std::mem::take(&mut current));
            }
        }
        current.push_str(&item.text);
        last_y = Some(item.y);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
