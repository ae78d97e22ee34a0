//! Pipeline stages for document-to-bionic-HTML processing.
//!
//! Each submodule implements exactly one transformation step. The core
//! stages are pure and synchronous; only [`input`] and the converters touch
//! the outside world.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ structure ──▶ bionic ──▶ truncate
//! (path/URL) (bytes→lines) (paragraphs) (<b> prefixes) (size cap)
//! ```
//!
//! 1. [`input`]     : read a local file or download a URL into memory
//! 2. [`extract`]   : format converters (txt, docx, pdf, html) behind a trait
//! 3. [`structure`] : re-join wrapped lines into headings and paragraphs
//! 4. [`bionic`]    : bold an adaptive prefix of each word; built on
//!    [`segment`], [`ratio`] and [`common_words`]
//! 5. [`truncate`]  : cap the assembled HTML at a paragraph boundary
//!
//! [`markup`] holds the tag constants and escaping shared by the stages.

pub mod bionic;
pub mod common_words;
pub mod extract;
pub mod input;
pub mod markup;
pub mod ratio;
pub mod segment;
pub mod structure;
pub mod truncate;
