//! Meta description and focus keyword generation.

use serde::Serialize;

use super::keywords::{keywords_from_text, Keyword};
use super::readability::TextStats;
use crate::config::{META_DESCRIPTION_WORDS, TOP_KEYWORDS};
use crate::markup::strip_tags;

/// Everything derived from one post body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMeta {
    /// First words of the text, single-space separated
    pub description: String,
    /// Top keywords, most frequent first
    pub keywords: Vec<Keyword>,
    /// Flesch reading ease, `None` when not scorable
    pub readability: Option<f64>,
}

impl GeneratedMeta {
    /// The top-ranked keyword, if the content has any words.
    pub fn focus_keyword(&self) -> Option<&str> {
        self.keywords.first().map(|k| k.term.as_str())
    }
}

/// First `limit` whitespace-separated words joined by single spaces.
///
/// Trailing words are dropped without an ellipsis.
pub fn trim_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Meta description for post content.
pub fn meta_description(content: &str) -> String {
    trim_words(&strip_tags(content), META_DESCRIPTION_WORDS)
}

/// Derives description, keywords and readability from post content.
///
/// Pure: identical content always yields identical output.
pub fn generate_meta(content: &str) -> GeneratedMeta {
    let text = strip_tags(content);
    GeneratedMeta {
        description: trim_words(&text, META_DESCRIPTION_WORDS),
        keywords: keywords_from_text(&text, TOP_KEYWORDS),
        readability: TextStats::from_text(&text).reading_ease(),
    }
}
