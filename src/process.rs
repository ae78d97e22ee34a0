//! Pipeline orchestrator: bytes in, bionic HTML document out.
//!
//! ```text
//! bytes ─▶ size check ─▶ format dispatch ─▶ converter ─▶ lines
//!       ─▶ structure ─▶ render batches (ordered) ─▶ <p> wrap ─▶ truncate
//! ```
//!
//! Converters and render batches run on the blocking pool. Render batches
//! are scheduled through `futures::stream::buffered`, which keeps at most
//! `concurrency` batches in flight and yields results in submission order,
//! so paragraph order survives the fan-out.

use crate::config::ProcessingConfig;
use crate::error::ReaderError;
use crate::output::{Document, DocumentMetadata, ProcessingStats, CONTENT_TYPE_HTML};
use crate::pipeline::bionic::BionicRenderer;
use crate::pipeline::extract::{ConvertOptions, DocumentFormat};
use crate::pipeline::input;
use crate::pipeline::markup::{escape, wrap_paragraph};
use crate::pipeline::structure::{Paragraph, ParagraphStructurer};
use crate::pipeline::truncate::{truncate, Truncated};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Process an in-memory document.
///
/// `filename` selects the converter by extension and is echoed in the
/// output metadata.
///
/// # Errors
/// - [`ReaderError::FileTooLarge`] before any converter runs
/// - [`ReaderError::UnsupportedFormat`] for unknown extensions
/// - whatever the converter reports ([`ReaderError::ConversionFailure`],
///   [`ReaderError::EncodingError`], [`ReaderError::PdfiumBindingFailed`])
pub async fn process(
    bytes: Vec<u8>,
    filename: &str,
    config: &ProcessingConfig,
) -> Result<Document, ReaderError> {
    let total_start = Instant::now();
    let file_size = bytes.len();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    if file_size > config.max_file_size {
        return Err(ReaderError::FileTooLarge {
            size: file_size,
            limit: config.max_file_size,
        });
    }
    let (format, extension) = DocumentFormat::from_filename(filename)?;
    let converter = config
        .converters
        .get(format)
        .ok_or_else(|| ReaderError::UnsupportedFormat {
            extension: extension.clone(),
        })?;

    info!(
        "Processing '{}' ({} bytes) with {} converter",
        filename,
        file_size,
        converter.name()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_processing_start(filename, file_size);
    }

    // ── Step 2: Extract lines ────────────────────────────────────────────
    let extract_start = Instant::now();
    let options = ConvertOptions {
        max_pdf_pages: config.max_pdf_pages,
        text_encoding: config.text_encoding.clone(),
    };
    let conversion = tokio::task::spawn_blocking(move || converter.convert(&bytes, &options))
        .await
        .map_err(|e| ReaderError::Internal(format!("Converter task panicked: {}", e)))??;
    let page_count = conversion.page_count;
    let lines = conversion.into_lines();
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!("Extracted {} lines in {}ms", lines.len(), extract_duration_ms);
    if let Some(ref cb) = config.progress_callback {
        cb.on_lines_extracted(lines.len());
    }

    // ── Step 3: Structure ────────────────────────────────────────────────
    let paragraphs = ParagraphStructurer::new(config.structure.clone()).structure(&lines);

    // ── Step 4: Render ───────────────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render_paragraphs(&paragraphs, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 5: Truncate ─────────────────────────────────────────────────
    let Truncated { markup, truncated } = truncate(
        &rendered.concat(),
        config.max_content_length,
        &config.truncation_notice,
    );

    let stats = ProcessingStats {
        line_count: lines.len(),
        paragraph_count: paragraphs.len(),
        heading_count: paragraphs.iter().filter(|p| p.is_heading()).count(),
        truncated,
        content_length: markup.chars().count(),
        bionic_applied: config.bionic_enabled,
        extract_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Processing complete: {} paragraphs, {} chars{}, {}ms total",
        stats.paragraph_count,
        stats.content_length,
        if truncated { " (truncated)" } else { "" },
        stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_processing_complete(paragraphs.len(), truncated);
    }

    Ok(Document {
        paragraphs,
        content: markup,
        metadata: DocumentMetadata {
            content_type: CONTENT_TYPE_HTML.to_string(),
            page_count,
            filename: filename.to_string(),
            extension,
            file_size,
        },
        stats,
    })
}

/// Resolve a local path or URL and process it.
pub async fn process_file(
    input_str: impl AsRef<str>,
    config: &ProcessingConfig,
) -> Result<Document, ReaderError> {
    let resolved = input::resolve_input(
        input_str.as_ref(),
        config.download_timeout_secs,
        config.max_file_size,
    )
    .await?;
    process(resolved.bytes, &resolved.filename, config).await
}

/// Process a path or URL and write the HTML to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn process_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<Document, ReaderError> {
    let document = process_file(input_str, config).await?;
    let path = output_path.as_ref();
    let write_err = |e| ReaderError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, &document.content)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!("Wrote {} bytes to {}", document.content.len(), path.display());
    Ok(document)
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally; do not call from inside
/// an async context.
pub fn process_sync(
    bytes: Vec<u8>,
    filename: &str,
    config: &ProcessingConfig,
) -> Result<Document, ReaderError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ReaderError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process(bytes, filename, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Render paragraphs in ordered batches and wrap each in `<p>…</p>`.
async fn render_paragraphs(
    paragraphs: &[Paragraph],
    config: &ProcessingConfig,
) -> Result<Vec<String>, ReaderError> {
    let total = paragraphs.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_start(total);
    }

    let renderer = config
        .bionic_enabled
        .then(|| Arc::new(BionicRenderer::from_config(config)));
    let batches: Vec<Vec<String>> = paragraphs
        .chunks(config.render_batch_size.max(1))
        .map(|chunk| chunk.iter().map(|p| p.text.clone()).collect())
        .collect();
    debug!(
        "Rendering {} paragraphs in {} batches (bionic: {})",
        total,
        batches.len(),
        renderer.is_some()
    );

    let mut results = stream::iter(batches.into_iter().map(|batch| {
        let renderer = renderer.clone();
        tokio::task::spawn_blocking(move || render_batch(renderer.as_deref(), &batch))
    }))
    .buffered(config.concurrency.max(1));

    let mut out = Vec::with_capacity(total);
    while let Some(result) = results.next().await {
        let batch =
            result.map_err(|e| ReaderError::Internal(format!("Render task panicked: {}", e)))?;
        out.extend(batch);
        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(out.len(), total);
        }
    }
    Ok(out)
}

fn render_batch(renderer: Option<&BionicRenderer>, texts: &[String]) -> Vec<String> {
    texts
        .iter()
        .map(|text| match renderer {
            Some(r) => wrap_paragraph(&r.render_html(text)),
            None => wrap_paragraph(&escape(text)),
        })
        .collect()
}
