//! Markup handling for post content.
//!
//! This module provides:
//! - A lossless tokenizer used to rewrite tags without disturbing other bytes
//! - Text extraction (`strip_tags`) for the text heuristics
//! - Selector-based inspection (`scraper`) for audits

mod inspect;
mod lexer;
mod text;

// Re-export public API
pub use inspect::ContentFindings;
pub use lexer::{tokenize, Attribute, Tag, Token, Tokenizer};
pub use text::{decode_entities, escape_attribute, strip_tags};
