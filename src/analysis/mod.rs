//! Text heuristics over post content.
//!
//! This module provides:
//! - Readability estimation (Flesch reading ease)
//! - Keyword extraction by token frequency
//! - Meta description and focus keyword generation
//!
//! All functions accept raw content and strip markup themselves.

mod keywords;
mod meta;
mod readability;
mod words;

// Re-export public API
pub use keywords::{extract_keywords, keywords_from_text, Keyword};
pub use meta::{generate_meta, meta_description, trim_words, GeneratedMeta};
pub use readability::{calculate_readability, TextStats};
pub use words::words;
