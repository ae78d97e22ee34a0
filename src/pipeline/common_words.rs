//! High-frequency English function words that are left unbolded.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

/// The 30 most frequent English words.
pub const ENGLISH_COMMON_WORDS: [&str; 30] = [
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she",
];

static ENGLISH: Lazy<Arc<CommonWords>> =
    Lazy::new(|| Arc::new(CommonWords::from_words(ENGLISH_COMMON_WORDS)));

/// Immutable, case-insensitive word set.
///
/// Built once and shared through an `Arc`; the renderer never rebuilds it
/// per call.
#[derive(Debug, Clone, Default)]
pub struct CommonWords {
    words: HashSet<String>,
}

impl CommonWords {
    /// The shared default English table.
    pub fn english() -> Arc<CommonWords> {
        Arc::clone(&ENGLISH)
    }

    /// Build a custom table. Entries are lower-cased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive exact membership.
    pub fn is_skippable(&self, word: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        if word.bytes().all(|b| !b.is_ascii_uppercase()) {
            return self.words.contains(word);
        }
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
