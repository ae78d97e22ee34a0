//! Character-class segmentation.
//!
//! Splits a string into maximal runs of CJK ideographs, ASCII letters, and
//! everything else. The renderer only ever bolds inside the first two
//! classes, so digits, punctuation and whitespace travel through untouched.

use serde::{Deserialize, Serialize};

/// Script class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptClass {
    /// CJK Unified Ideographs, U+4E00–U+9FA5.
    Cjk,
    /// ASCII letters `a-z` / `A-Z`.
    Latin,
    /// Digits, punctuation, whitespace, symbols and all other scripts.
    Other,
}

impl ScriptClass {
    /// Classify one character.
    pub fn of(c: char) -> Self {
        match c {
            '\u{4E00}'..='\u{9FA5}' => ScriptClass::Cjk,
            'a'..='z' | 'A'..='Z' => ScriptClass::Latin,
            _ => ScriptClass::Other,
        }
    }
}

/// A maximal run of same-class characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub class: ScriptClass,
}

/// Partition `text` into maximal same-class runs.
///
/// The concatenation of every returned `Segment::text` equals `text`, and no
/// two neighbouring segments share a class. Empty input yields no segments.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Option<(ScriptClass, usize)> = None;

    for (idx, c) in text.char_indices() {
        let class = ScriptClass::of(c);
        match current {
            Some((cur, start)) if cur != class => {
                segments.push(Segment {
                    text: text[start..idx].to_string(),
                    class: cur,
                });
                current = Some((class, idx));
            }
            Some(_) => {}
            None => current = Some((class, idx)),
        }
    }

    if let Some((class, start)) = current {
        segments.push(Segment {
            text: text[start..].to_string(),
            class,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn classifies_characters() {
        assert_eq!(ScriptClass::of('的'), ScriptClass::Cjk);
        assert_eq!(ScriptClass::of('\u{4E00}'), ScriptClass::Cjk);
        assert_eq!(ScriptClass::of('\u{9FA5}'), ScriptClass::Cjk);
        assert_eq!(ScriptClass::of('\u{9FA6}'), ScriptClass::Other);
        assert_eq!(ScriptClass::of('q'), ScriptClass::Latin);
        assert_eq!(ScriptClass::of('Z'), ScriptClass::Latin);
        assert_eq!(ScriptClass::of('é'), ScriptClass::Other);
        assert_eq!(ScriptClass::of('7'), ScriptClass::Other);
        assert_eq!(ScriptClass::of('，'), ScriptClass::Other);
        assert_eq!(ScriptClass::of(' '), ScriptClass::Other);
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn mixed_scripts_split_into_runs() {
        let segs = segment("Hello, 世界! 42x");
        let classes: Vec<_> = segs.iter().map(|s| s.class).collect();
        assert_eq!(
            classes,
            vec![
                ScriptClass::Latin,
                ScriptClass::Other,
                ScriptClass::Cjk,
                ScriptClass::Other,
                ScriptClass::Latin,
            ]
        );
        assert_eq!(segs[0].text, "Hello");
        assert_eq!(segs[1].text, ", ");
        assert_eq!(segs[2].text, "世界");
        assert_eq!(segs[3].text, "! 42");
        assert_eq!(segs[4].text, "x");
    }

    #[test]
    fn segmentation_is_lossless_and_maximal() {
        let samples = [
            "",
            "a",
            "   ",
            "The quick brown fox.",
            "这是一个测试，包含English和数字123。",
            "naïve café — résumé",
            "tab\tand\nnewline",
            "emoji 🎉 mixed 中文 text",
            "don't-stop",
        ];
        for s in samples {
            let segs = segment(s);
            assert_eq!(joined(&segs), s, "lossless for {s:?}");
            for pair in segs.windows(2) {
                assert_ne!(pair[0].class, pair[1].class, "maximal for {s:?}");
            }
            assert!(segs.iter().all(|seg| !seg.text.is_empty()));
        }
    }

    #[test]
    fn no_normalisation_is_applied() {
        let segs = segment("  MiXeD  ");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text, "  ");
        assert_eq!(segs[1].text, "MiXeD");
        assert_eq!(segs[2].text, "  ");
    }
}
