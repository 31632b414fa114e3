//! Word tokenization shared by the text heuristics.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::compile_regex_unsafe;

/// Letters/digits, allowing inner apostrophes and hyphens (`don't`, `well-known`).
const WORD_PATTERN: &str = r"[\p{L}\p{N}]+(?:['’-][\p{L}\p{N}]+)*";

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(WORD_PATTERN, "WORD_RE"));

/// Iterates the word tokens of plain text, in order.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD_RE.find_iter(text).map(|m| m.as_str())
}
