//! Truncation guard: bound the size of the assembled HTML.
//!
//! The cut is made after the last complete `</p>` that fits in the budget,
//! so the reader never sees half a paragraph or a broken tag. A fixed
//! notice paragraph is appended whenever content is dropped.
//!
//! Lengths are counted in characters, not bytes.

use crate::pipeline::markup::{escape, BOLD_CLOSE, BOLD_OPEN, PARA_CLOSE, PARA_OPEN};
use tracing::{debug, warn};

const ELLIPSIS: &str = "...";

/// Characters reserved for closing tags in the no-boundary fallback:
/// `</b>` + `...` + `</p>`.
const FALLBACK_RESERVE: usize = 11;

/// Result of [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub markup: String,
    pub truncated: bool,
}

/// The paragraph appended after truncated content.
pub fn notice_paragraph(notice: &str) -> String {
    format!("{PARA_OPEN}{}{PARA_CLOSE}", escape(notice))
}

/// Cap `markup` at `max_length` characters plus the notice paragraph.
///
/// Returns the input unchanged when it already fits. Otherwise cuts after
/// the last `</p>` inside the budget; when there is none (a single huge
/// paragraph) the cut falls on the last character boundary that is not
/// inside a tag or entity, open tags are closed and an ellipsis marks the
/// cut.
pub fn truncate(markup: &str, max_length: usize, notice: &str) -> Truncated {
    let total = markup.chars().count();
    if total <= max_length {
        return Truncated {
            markup: markup.to_string(),
            truncated: false,
        };
    }

    let cut = byte_offset(markup, max_length);
    let mut out = if let Some(pos) = markup[..cut].rfind(PARA_CLOSE) {
        let end = pos + PARA_CLOSE.len();
        debug!(
            "Truncating {} chars at paragraph boundary (byte {})",
            total, end
        );
        markup[..end].to_string()
    } else {
        warn!(
            "No paragraph boundary within {} chars; truncating mid-paragraph",
            max_length
        );
        fallback_cut(markup, max_length)
    };

    out.push_str(&notice_paragraph(notice));
    Truncated {
        markup: out,
        truncated: true,
    }
}

/// Convenience wrapper returning only the markup.
pub fn truncate_markup(markup: &str, max_length: usize, notice: &str) -> String {
    truncate(markup, max_length, notice).markup
}

fn fallback_cut(markup: &str, max_length: usize) -> String {
    let marker_len = PARA_OPEN.len() + ELLIPSIS.len() + PARA_CLOSE.len();
    if max_length < marker_len {
        return String::new();
    }

    let mut end = byte_offset(markup, max_length.saturating_sub(FALLBACK_RESERVE));

    // Never end inside `<...` or `&...;`.
    if let Some(lt) = markup[..end].rfind('<') {
        if !markup[lt..end].contains('>') {
            end = lt;
        }
    }
    if let Some(amp) = markup[..end].rfind('&') {
        if !markup[amp..end].contains(';') {
            end = amp;
        }
    }

    let mut kept = &markup[..end];
    let mut out = String::with_capacity(end + FALLBACK_RESERVE);
    if is_open(kept, PARA_OPEN, PARA_CLOSE) {
        out.push_str(kept);
        if is_open(kept, BOLD_OPEN, BOLD_CLOSE) {
            out.push_str(BOLD_CLOSE);
        }
        out.push_str(ELLIPSIS);
        out.push_str(PARA_CLOSE);
    } else {
        // The marker gets its own paragraph; drop a dangling `<b>` run
        // rather than spend budget closing it.
        if is_open(kept, BOLD_OPEN, BOLD_CLOSE) {
            if let Some(b) = kept.rfind(BOLD_OPEN) {
                kept = &kept[..b];
            }
        }
        out.push_str(kept);
        out.push_str(PARA_OPEN);
        out.push_str(ELLIPSIS);
        out.push_str(PARA_CLOSE);
    }
    out
}

fn is_open(markup: &str, open: &str, close: &str) -> bool {
    match (markup.rfind(open), markup.rfind(close)) {
        (Some(o), Some(c)) => o > c,
        (Some(_), None) => true,
        _ => false,
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTICE: &str = "...(content truncated)";

    fn balanced(s: &str) -> bool {
        s.matches(PARA_OPEN).count() == s.matches(PARA_CLOSE).count()
            && s.matches(BOLD_OPEN).count() == s.matches(BOLD_CLOSE).count()
    }

    fn bound(max: usize) -> usize {
        max + notice_paragraph(NOTICE).chars().count()
    }

    #[test]
    fn short_input_is_unchanged() {
        let html = "<p>Hello</p>";
        let t = truncate(html, 100, NOTICE);
        assert_eq!(t.markup, html);
        assert!(!t.truncated);
    }

    #[test]
    fn exact_fit_is_unchanged() {
        let html = "<p>abc</p>";
        let t = truncate(html, html.chars().count(), NOTICE);
        assert!(!t.truncated);
    }

    #[test]
    fn cuts_at_last_complete_paragraph() {
        let html = "<p>first</p><p>second</p><p>third paragraph</p>";
        let t = truncate(html, 30, NOTICE);
        assert!(t.truncated);
        assert_eq!(
            t.markup,
            format!("<p>first</p><p>second</p>{}", notice_paragraph(NOTICE))
        );
    }

    #[test]
    fn boundary_exactly_at_cut_is_kept() {
        let html = "<p>one</p><p>two</p>";
        let t = truncate(html, 10, NOTICE);
        assert_eq!(t.markup, format!("<p>one</p>{}", notice_paragraph(NOTICE)));
    }

    #[test]
    fn single_giant_paragraph_falls_back_and_stays_balanced() {
        let html = format!("<p>{}</p>", "<b>wo</b>rd ".repeat(200));
        for max in [5, 11, 12, 20, 37, 100, 555] {
            let t = truncate(&html, max, NOTICE);
            assert!(t.truncated);
            assert!(t.markup.chars().count() <= bound(max), "bound at {max}");
            assert!(balanced(&t.markup), "balanced at {max}: {}", t.markup);
            assert!(t.markup.ends_with(&notice_paragraph(NOTICE)));
        }
    }

    #[test]
    fn tiny_budgets_still_mark_the_cut() {
        let html = "<p>abcdefghijklmnopqrstuvwxyz</p>";
        let marker = "<p>...</p>";

        for max in [10, 11, 12, 13] {
            let t = truncate(html, max, "N");
            assert_eq!(t.markup, format!("{marker}<p>N</p>"), "at {max}");
        }

        let t = truncate(html, 14, "N");
        assert_eq!(t.markup, "<p>...</p><p>N</p>");
        let t = truncate(html, 15, "N");
        assert_eq!(t.markup, "<p>a...</p><p>N</p>");

        let t = truncate(html, 9, "N");
        assert_eq!(t.markup, "<p>N</p>");
    }

    #[test]
    fn fallback_without_paragraph_wrapper_keeps_bound() {
        let html = "<b>abc</b>def<b>ghijklmnopqrstuvwxyz</b>";
        for max in 10..html.chars().count() {
            let t = truncate(html, max, NOTICE);
            assert!(t.markup.chars().count() <= bound(max), "bound at {max}");
            assert!(balanced(&t.markup), "balanced at {max}: {}", t.markup);
            assert!(t.markup.contains("<p>...</p>"), "marker at {max}");
        }
    }

    #[test]
    fn fallback_never_splits_an_entity_or_tag() {
        let html = format!("<p>{}</p>", "a &amp; b ".repeat(50));
        for max in 12..60 {
            let t = truncate(&html, max, NOTICE);
            let body = t.markup.trim_end_matches(&notice_paragraph(NOTICE));
            assert!(!body.contains("&am.") && !body.contains("&a.") && !body.contains("&amp."));
            assert!(!body.contains("<.") && !body.contains("</.") && !body.contains("<b."));
            assert!(balanced(&t.markup), "{}", t.markup);
        }
    }

    #[test]
    fn bound_holds_for_multi_paragraph_inputs() {
        let html: String = (0..50)
            .map(|i| format!("<p><b>Par</b>agraph 中文 {i}</p>"))
            .collect();
        for max in (0..html.chars().count()).step_by(7) {
            let t = truncate(&html, max, NOTICE);
            assert!(t.markup.chars().count() <= bound(max), "bound at {max}");
            assert!(balanced(&t.markup), "balanced at {max}");
        }
    }

    #[test]
    fn notice_is_escaped() {
        assert_eq!(notice_paragraph("a < b"), "<p>a &lt; b</p>");
    }
}
