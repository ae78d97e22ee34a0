//! Adaptive bold-prefix ("bionic") rendering.
//!
//! ## Contract
//!
//! The renderer operates on *plain paragraph text*. It never looks for or
//! skips over tags, so it must run exactly once, before any `<p>` wrapping:
//! feeding it its own output would bold letters inside `<b>` tag names.
//!
//! Stripping every `<b>`/`</b>` from [`BionicRenderer::render`] yields the
//! input unchanged. [`BionicRenderer::render_html`] additionally escapes the
//! text so arbitrary document content is safe to embed.

use crate::config::{BionicConfig, ProcessingConfig};
use crate::pipeline::common_words::CommonWords;
use crate::pipeline::markup::{escape_into, BOLD_CLOSE, BOLD_OPEN};
use crate::pipeline::ratio::prefix_length;
use crate::pipeline::segment::{segment, ScriptClass};
use std::sync::Arc;

/// Punctuation that separates CJK word candidates (whitespace also does).
pub const CJK_DELIMITERS: [char; 7] = ['，', '。', '！', '？', '；', '：', '、'];

/// Renders text with bolded word prefixes.
#[derive(Debug, Clone)]
pub struct BionicRenderer {
    config: BionicConfig,
    common_words: Arc<CommonWords>,
}

impl Default for BionicRenderer {
    fn default() -> Self {
        Self::new(BionicConfig::default(), CommonWords::english())
    }
}

impl BionicRenderer {
    pub fn new(config: BionicConfig, common_words: Arc<CommonWords>) -> Self {
        Self {
            config,
            common_words,
        }
    }

    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new(config.bionic.clone(), Arc::clone(&config.common_words))
    }

    pub fn config(&self) -> &BionicConfig {
        &self.config
    }

    /// Render `text`, wrapping each bolded prefix in `<b>…</b>`.
    ///
    /// No escaping is applied.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        self.render_into(&mut out, text, false);
        out
    }

    /// Like [`render`](Self::render), but HTML-escapes every text piece.
    pub fn render_html(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        self.render_into(&mut out, text, true);
        out
    }

    fn render_into(&self, out: &mut String, text: &str, escape: bool) {
        for seg in segment(text) {
            match seg.class {
                ScriptClass::Other => push_text(out, &seg.text, escape),
                ScriptClass::Cjk => {
                    for (token, is_delim) in split_keep(&seg.text, is_cjk_delimiter) {
                        if is_delim {
                            push_text(out, token, escape);
                        } else {
                            self.render_token(out, ScriptClass::Cjk, token, escape);
                        }
                    }
                }
                ScriptClass::Latin => {
                    for (token, is_delim) in split_keep(&seg.text, |c| !c.is_alphabetic()) {
                        if is_delim {
                            push_text(out, token, escape);
                        } else {
                            self.render_token(out, ScriptClass::Latin, token, escape);
                        }
                    }
                }
            }
        }
    }

    fn render_token(&self, out: &mut String, class: ScriptClass, token: &str, escape: bool) {
        let len = token.chars().count();

        let bold_len = if class == ScriptClass::Cjk && len == 1 {
            len
        } else if len < self.config.min_length {
            0
        } else if class == ScriptClass::Latin
            && self.config.skip_common_words
            && self.common_words.is_skippable(token)
        {
            0
        } else {
            prefix_length(class, len, &self.config)
        };

        if bold_len == 0 {
            push_text(out, token, escape);
            return;
        }

        let split = token
            .char_indices()
            .nth(bold_len)
            .map(|(i, _)| i)
            .unwrap_or(token.len());
        let (head, tail) = token.split_at(split);
        out.push_str(BOLD_OPEN);
        push_text(out, head, escape);
        out.push_str(BOLD_CLOSE);
        push_text(out, tail, escape);
    }
}

/// Render with the default English common-word table.
pub fn render(text: &str, config: &BionicConfig) -> String {
    BionicRenderer::new(config.clone(), CommonWords::english()).render(text)
}

fn push_text(out: &mut String, text: &str, escape: bool) {
    if escape {
        escape_into(out, text);
    } else {
        out.push_str(text);
    }
}

fn is_cjk_delimiter(c: char) -> bool {
    c.is_whitespace() || CJK_DELIMITERS.contains(&c)
}

/// Split `text` into word runs and single delimiter characters, in order.
///
/// Yields `(piece, is_delimiter)`; pieces concatenate back to `text`.
fn split_keep(text: &str, is_delim: impl Fn(char) -> bool) -> Vec<(&str, bool)> {
    let mut pieces = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        if is_delim(c) {
            if let Some(start) = word_start.take() {
                pieces.push((&text[start..idx], false));
            }
            pieces.push((&text[idx..idx + c.len_utf8()], true));
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(start) = word_start {
        pieces.push((&text[start..], false));
    }
    pieces
}
