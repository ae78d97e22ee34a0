//! Small HTML helpers shared by the renderer, the orchestrator and the
//! truncation guard.

pub const BOLD_OPEN: &str = "<b>";
pub const BOLD_CLOSE: &str = "</b>";
pub const PARA_OPEN: &str = "<p>";
pub const PARA_CLOSE: &str = "</p>";

/// Append `text` to `out`, escaping the characters that are significant in
/// HTML text and attribute content.
pub fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

/// Wrap already-rendered inline markup in a paragraph element.
pub fn wrap_paragraph(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len() + PARA_OPEN.len() + PARA_CLOSE.len());
    out.push_str(PARA_OPEN);
    out.push_str(inner);
    out.push_str(PARA_CLOSE);
    out
}

/// Remove every bold marker, leaving the visible text.
pub fn strip_bold(markup: &str) -> String {
    markup.replace(BOLD_OPEN, "").replace(BOLD_CLOSE, "")
}
