//! Flesch reading-ease estimation.
//!
//! Counts are deliberately naive: sentences are runs of `.`, `!` or `?` and
//! syllables are vowel clusters.

use std::sync::LazyLock;

use regex::Regex;

use super::words::words;
use crate::config::{FLESCH_BASE, FLESCH_SENTENCE_WEIGHT, FLESCH_SYLLABLE_WEIGHT};
use crate::markup::strip_tags;
use crate::utils::compile_regex_unsafe;

const SENTENCE_PATTERN: &str = r"[.!?]+";
const SYLLABLE_PATTERN: &str = r"(?i)[aeiouy]+";

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(SENTENCE_PATTERN, "SENTENCE_RE"));
static SYLLABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(SYLLABLE_PATTERN, "SYLLABLE_RE"));

/// Raw counts behind a readability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Word tokens
    pub words: usize,
    /// Runs of `.`, `!` or `?`
    pub sentences: usize,
    /// Vowel clusters, the syllable estimate
    pub syllables: usize,
}

impl TextStats {
    /// Counts words, sentence terminators and vowel clusters in plain text.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: words(text).count(),
            sentences: SENTENCE_RE.find_iter(text).count(),
            syllables: SYLLABLE_RE.find_iter(text).count(),
        }
    }

    /// Flesch reading-ease score.
    ///
    /// `None` when there are no words or no sentence terminators; the formula
    /// divides by both.
    pub fn reading_ease(&self) -> Option<f64> {
        if self.words == 0 || self.sentences == 0 {
            return None;
        }
        let words = self.words as f64;
        let sentences = self.sentences as f64;
        let syllables = self.syllables as f64;
        Some(
            FLESCH_BASE
                - FLESCH_SENTENCE_WEIGHT * (words / sentences)
                - FLESCH_SYLLABLE_WEIGHT * (syllables / words),
        )
    }
}

/// Readability score of post content (markup is stripped first).
pub fn calculate_readability(content: &str) -> Option<f64> {
    TextStats::from_text(&strip_tags(content)).reading_ease()
}
