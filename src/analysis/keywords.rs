//! Frequency-based keyword extraction.

use std::collections::HashMap;

use serde::Serialize;

use super::words::words;
use crate::markup::strip_tags;

/// A token and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    /// The token as written
    pub term: String,
    /// Occurrences in the text
    pub count: usize,
}

/// Most frequent tokens of post content (markup is stripped first).
pub fn extract_keywords(content: &str, limit: usize) -> Vec<Keyword> {
    keywords_from_text(&strip_tags(content), limit)
}

/// Most frequent tokens of plain text.
///
/// Counting is case-sensitive with no stemming or stop words. Ties keep the
/// order in which the tokens first appear.
pub fn keywords_from_text(text: &str, limit: usize) -> Vec<Keyword> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for word in words(text) {
        match positions.get(word) {
            Some(&at) => counts[at].1 += 1,
            None => {
                positions.insert(word, counts.len());
                counts.push((word, 1));
            }
        }
    }

    // Stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(limit)
        .map(|(term, count)| Keyword {
            term: term.to_string(),
            count,
        })
        .collect()
}
