//! # bionic-reader
//!
//! Turn Word, PDF and plain-text documents into "bionic reading" HTML: the
//! text is re-flowed into paragraphs and an adaptive prefix of every word
//! is bolded so the eye can skim.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document bytes
//!  │
//!  ├─ 1. Validate   size ceiling, extension dispatch
//!  ├─ 2. Extract    txt / docx / pdf converter → raw lines (spawn_blocking)
//!  ├─ 3. Structure  lines → headings and paragraphs
//!  ├─ 4. Render     bold prefixes per word, script-aware, in ordered batches
//!  ├─ 5. Truncate   cap the HTML at a paragraph boundary
//!  └─ 6. Output     Document { content, metadata, stats }
//! ```
//!
//! English words get a bolded share between 30% and 50% that shrinks with
//! word length; CJK runs get between 30% and 100%, and a lone CJK character
//! is bolded whole. Common English function words ("the", "and", …) are
//! left plain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bionic_reader::{process_file, ProcessingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProcessingConfig::default();
//!     let document = process_file("notes.txt", &config).await?;
//!     println!("{}", document.content);
//!     eprintln!("{} paragraphs", document.stats.paragraph_count);
//!     Ok(())
//! }
//! ```
//!
//! The pure stages can be used on their own:
//!
//! ```rust
//! use bionic_reader::pipeline::bionic::BionicRenderer;
//!
//! let html = BionicRenderer::default().render("The cat sat");
//! assert_eq!(html, "The <b>c</b>at <b>s</b>at");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `bionic` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | off     | Enables [`server`]: `POST /api/parse` over axum |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! bionic-reader = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDF support
//!
//! PDF text is read with pdfium, loaded at runtime. Point `PDFIUM_LIB_PATH`
//! at the shared library (or its directory), or install it system-wide.
//! Only the first 20 pages are read by default.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod remote;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BionicConfig, ProcessingConfig, ProcessingConfigBuilder, StructureConfig};
pub use error::ReaderError;
pub use output::{Document, DocumentMetadata, ProcessingStats};
pub use pipeline::extract::{Converter, ConverterRegistry, DocumentFormat};
pub use process::{process, process_file, process_sync, process_to_file};
pub use progress::{NoopProgressCallback, ProcessingProgressCallback, ProgressCallback};
pub use remote::{invoke, InvokeRequest, InvokeResponse, LocalObjectStore, ObjectStore};
