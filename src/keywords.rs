//! Keyword extraction for search entries.

use ahash::AHashSet;

/// Tokens at or below this length are dropped.
const MAX_SHORT_TOKEN_LENGTH: usize = 2;

/// Common English words excluded from keyword sets.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "this", "that",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should",
];

/// Normalizes free text into lowercase, de-duplicated keywords.
///
/// Anything that is not an ASCII word character or whitespace acts as a separator.
/// Tokens of two characters or fewer and stop words are dropped; the first
/// occurrence of a token decides its position.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut keywords = KeywordSet::default();
    for token in normalized.split_whitespace() {
        if token.len() > MAX_SHORT_TOKEN_LENGTH && !STOP_WORDS.contains(&token) {
            keywords.push(token);
        }
    }
    keywords.into_vec()
}

/// Ordered keyword list that ignores repeats.
#[derive(Debug, Default, Clone)]
pub struct KeywordSet {
    seen: AHashSet<String>,
    ordered: Vec<String>,
}

impl KeywordSet {
    /// Add a keyword unless it is empty or already present.
    pub fn push(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if keyword.is_empty() || self.seen.contains(&keyword) {
            return;
        }
        self.seen.insert(keyword.clone());
        self.ordered.push(keyword);
    }

    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            self.push(keyword);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
