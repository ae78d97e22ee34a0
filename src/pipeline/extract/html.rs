//! Block-level text from an HTML fragment.
//!
//! Converters that produce HTML (an external Word-to-HTML service, say)
//! are normalised here: every `p`, `h1`-`h6`, `div` and `li` element
//! contributes its text content as one line, in document order. Inline
//! tags are dropped, `<br>` becomes a line break and the common entities
//! are decoded. Fragments without any block element are treated as
//! tag-stripped text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:p|h[1-6]|div|li)\b[^>]*>(.*?)</(?:p|h[1-6]|div|li)\s*>")
        .unwrap()
});
static BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Text of each block element, one entry per line.
pub fn block_texts(html: &str) -> Vec<String> {
    let blocks: Vec<&str> = BLOCK
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    if blocks.is_empty() {
        return split_lines(&inner_text(html));
    }
    blocks
        .into_iter()
        .flat_map(|b| split_lines(&inner_text(b)))
        .collect()
}

/// Strip tags and decode entities.
pub fn inner_text(fragment: &str) -> String {
    let with_breaks = BREAK.replace_all(fragment, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

/// Decode named and numeric character references.
///
/// Unknown names are left as-is.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    })
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|l| l.trim().to_string()).collect()
}
