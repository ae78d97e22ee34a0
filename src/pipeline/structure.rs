//! Paragraph structuring: group decoded lines into headings and paragraphs.
//!
//! Converters hand us one string per visual line, which for PDFs and plain
//! text means prose is hard-wrapped mid-sentence. The structurer re-joins
//! those lines with an explicit two-state machine:
//!
//! ```text
//!            non-heading line
//!   Idle ─────────────────────────▶ Accumulating
//!    ▲                                   │
//!    │ terminal mark / char cap / heading│
//!    └───────────────────────────────────┘
//! ```
//!
//! A short line ending in a terminal mark is a heading and always stands
//! alone. Everything else accumulates until a line ends in a terminal mark
//! or the accumulator outgrows `paragraph_char_cap`.

use crate::config::StructureConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a paragraph was recognised as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphKind {
    Heading,
    Body,
}

/// A non-empty run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub kind: ParagraphKind,
}

impl Paragraph {
    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ParagraphKind::Heading,
        }
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ParagraphKind::Body,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.kind == ParagraphKind::Heading
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Accumulating { text: String, chars: usize },
}

/// Line-to-paragraph state machine.
#[derive(Debug, Clone, Default)]
pub struct ParagraphStructurer {
    config: StructureConfig,
}

impl ParagraphStructurer {
    pub fn new(config: StructureConfig) -> Self {
        Self { config }
    }

    /// Group `lines` into paragraphs, preserving order.
    ///
    /// Lines are trimmed and blank lines dropped first. The result never
    /// contains an empty or whitespace-only paragraph.
    pub fn structure<I, S>(&self, lines: I) -> Vec<Paragraph>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        let mut state = State::Idle;

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let line_chars = line.chars().count();
            let terminal = self.config.ends_with_terminal(line);

            if terminal && line_chars < self.config.heading_max_chars {
                flush(&mut state, &mut out);
                out.push(Paragraph::heading(line));
                continue;
            }

            state = match state {
                State::Idle => State::Accumulating {
                    text: line.to_string(),
                    chars: line_chars,
                },
                State::Accumulating { mut text, chars } => {
                    text.push(' ');
                    text.push_str(line);
                    State::Accumulating {
                        text,
                        chars: chars + 1 + line_chars,
                    }
                }
            };

            let over_cap = matches!(
                state,
                State::Accumulating { chars, .. } if chars > self.config.paragraph_char_cap
            );
            if terminal || over_cap {
                flush(&mut state, &mut out);
            }
        }

        flush(&mut state, &mut out);
        debug!("Structured {} paragraphs", out.len());
        out
    }
}

fn flush(state: &mut State, out: &mut Vec<Paragraph>) {
    if let State::Accumulating { text, .. } = std::mem::replace(state, State::Idle) {
        if !text.trim().is_empty() {
            out.push(Paragraph::body(text));
        }
    }
}

/// Structure with default heuristics.
pub fn structure<I, S>(lines: I) -> Vec<Paragraph>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ParagraphStructurer::default().structure(lines)
}
