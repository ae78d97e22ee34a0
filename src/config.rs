//! Configuration types for document processing.
//!
//! All processing behaviour is controlled through [`ProcessingConfig`],
//! built via its [`ProcessingConfigBuilder`]. Every request carries its own
//! config, so two concurrent requests with different ratios or limits can
//! never observe each other's settings.

use crate::error::ReaderError;
use crate::pipeline::common_words::CommonWords;
use crate::pipeline::extract::ConverterRegistry;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Upload ceiling: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Character budget for the final HTML before truncation kicks in.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 100_000;

/// Only the first 20 pages of a PDF are extracted.
pub const DEFAULT_MAX_PDF_PAGES: usize = 20;

/// Text of the paragraph appended after truncated content.
pub const DEFAULT_TRUNCATION_NOTICE: &str = "...(content truncated, showing partial content)";

/// Tunables of the bold-prefix renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BionicConfig {
    /// Numerator of the CJK ratio formula. Default: 1.0.
    pub chinese_ratio: f64,

    /// Numerator of the Latin ratio formula. Default: 0.4.
    pub english_ratio: f64,

    /// Tokens shorter than this many characters are left unbolded
    /// (except single CJK characters, which are always bolded). Default: 3.
    pub min_length: usize,

    /// Leave common English function words unbolded. Default: true.
    pub skip_common_words: bool,
}

impl Default for BionicConfig {
    fn default() -> Self {
        Self {
            chinese_ratio: 1.0,
            english_ratio: 0.4,
            min_length: 3,
            skip_common_words: true,
        }
    }
}

/// Tunables of the paragraph structurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Lines shorter than this (in characters) that end with a terminal
    /// mark are headings. Default: 40.
    pub heading_max_chars: usize,

    /// An accumulating paragraph is flushed once it grows past this many
    /// characters, even without terminal punctuation. Default: 1000.
    pub paragraph_char_cap: usize,

    /// Characters that end a sentence. Default: `['.']`.
    ///
    /// Only the ASCII period is recognised by default, so CJK prose without
    /// Latin periods is grouped until `paragraph_char_cap` fires. Add
    /// `'。'`, `'！'`, `'？'` to segment such documents more finely.
    pub terminal_marks: Vec<char>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            heading_max_chars: 40,
            paragraph_char_cap: 1000,
            terminal_marks: vec!['.'],
        }
    }
}

impl StructureConfig {
    pub fn ends_with_terminal(&self, line: &str) -> bool {
        line.chars()
            .next_back()
            .is_some_and(|c| self.terminal_marks.contains(&c))
    }
}

/// Configuration for processing one document.
///
/// Built via [`ProcessingConfig::builder()`] or using
/// [`ProcessingConfig::default()`].
///
/// # Example
/// ```rust
/// use bionic_reader::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .english_ratio(0.5)
///     .min_length(4)
///     .max_content_length(50_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessingConfig {
    /// Apply the bold-prefix transform. Default: true.
    ///
    /// When false, paragraphs are still structured, escaped and wrapped in
    /// `<p>` tags.
    pub bionic_enabled: bool,

    /// Renderer tunables.
    pub bionic: BionicConfig,

    /// Paragraph heuristics.
    pub structure: StructureConfig,

    /// Character budget for the assembled HTML. Default: 100 000.
    pub max_content_length: usize,

    /// Largest accepted input in bytes. Default: 5 MiB.
    pub max_file_size: usize,

    /// Number of leading PDF pages to extract. Default: 20.
    pub max_pdf_pages: usize,

    /// Text of the notice paragraph appended when output is truncated.
    pub truncation_notice: String,

    /// Encoding label (WHATWG names such as `"gbk"`, `"shift_jis"`,
    /// `"utf-16le"`) for `.txt` inputs. Default: None, meaning UTF-8 unless
    /// a byte-order mark says otherwise.
    pub text_encoding: Option<String>,

    /// Number of paragraph batches rendered in parallel. Default: 4.
    pub concurrency: usize,

    /// Paragraphs per render batch. Default: 64.
    pub render_batch_size: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Words left unbolded when `bionic.skip_common_words` is set.
    pub common_words: Arc<CommonWords>,

    /// Document converters keyed by format.
    pub converters: ConverterRegistry,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            bionic_enabled: true,
            bionic: BionicConfig::default(),
            structure: StructureConfig::default(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_pdf_pages: DEFAULT_MAX_PDF_PAGES,
            truncation_notice: DEFAULT_TRUNCATION_NOTICE.to_string(),
            text_encoding: None,
            concurrency: 4,
            render_batch_size: 64,
            download_timeout_secs: 120,
            common_words: CommonWords::english(),
            converters: ConverterRegistry::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfig")
            .field("bionic_enabled", &self.bionic_enabled)
            .field("bionic", &self.bionic)
            .field("structure", &self.structure)
            .field("max_content_length", &self.max_content_length)
            .field("max_file_size", &self.max_file_size)
            .field("max_pdf_pages", &self.max_pdf_pages)
            .field("text_encoding", &self.text_encoding)
            .field("concurrency", &self.concurrency)
            .field("render_batch_size", &self.render_batch_size)
            .field("common_words", &self.common_words.len())
            .field("converters", &self.converters)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ProgressCallback>"),
            )
            .finish()
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessingConfig`].
#[derive(Debug)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    pub fn bionic_enabled(mut self, v: bool) -> Self {
        self.config.bionic_enabled = v;
        self
    }

    pub fn bionic(mut self, bionic: BionicConfig) -> Self {
        self.config.bionic = bionic;
        self
    }

    pub fn chinese_ratio(mut self, r: f64) -> Self {
        self.config.bionic.chinese_ratio = r;
        self
    }

    pub fn english_ratio(mut self, r: f64) -> Self {
        self.config.bionic.english_ratio = r;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.config.bionic.min_length = n;
        self
    }

    pub fn skip_common_words(mut self, v: bool) -> Self {
        self.config.bionic.skip_common_words = v;
        self
    }

    pub fn structure(mut self, structure: StructureConfig) -> Self {
        self.config.structure = structure;
        self
    }

    pub fn terminal_marks(mut self, marks: impl IntoIterator<Item = char>) -> Self {
        self.config.structure.terminal_marks = marks.into_iter().collect();
        self
    }

    pub fn max_content_length(mut self, n: usize) -> Self {
        self.config.max_content_length = n;
        self
    }

    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn max_pdf_pages(mut self, n: usize) -> Self {
        self.config.max_pdf_pages = n.max(1);
        self
    }

    pub fn truncation_notice(mut self, notice: impl Into<String>) -> Self {
        self.config.truncation_notice = notice.into();
        self
    }

    pub fn text_encoding(mut self, label: impl Into<String>) -> Self {
        self.config.text_encoding = Some(label.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn render_batch_size(mut self, n: usize) -> Self {
        self.config.render_batch_size = n.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn common_words(mut self, words: Arc<CommonWords>) -> Self {
        self.config.common_words = words;
        self
    }

    pub fn converters(mut self, converters: ConverterRegistry) -> Self {
        self.config.converters = converters;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, ReaderError> {
        let c = &self.config;
        for (name, value) in [
            ("chinese_ratio", c.bionic.chinese_ratio),
            ("english_ratio", c.bionic.english_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReaderError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if c.bionic.min_length == 0 {
            return Err(ReaderError::InvalidConfig("min_length must be ≥ 1".into()));
        }
        if c.max_content_length == 0 {
            return Err(ReaderError::InvalidConfig(
                "max_content_length must be ≥ 1".into(),
            ));
        }
        if c.max_file_size == 0 {
            return Err(ReaderError::InvalidConfig("max_file_size must be ≥ 1".into()));
        }
        if c.structure.paragraph_char_cap == 0 {
            return Err(ReaderError::InvalidConfig(
                "paragraph_char_cap must be ≥ 1".into(),
            ));
        }
        if let Some(ref label) = c.text_encoding {
            if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                return Err(ReaderError::InvalidConfig(format!(
                    "unknown text encoding '{label}'"
                )));
            }
        }
        Ok(self.config)
    }
}
