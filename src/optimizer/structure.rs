//! Heading and image-alt normalization.
//!
//! Both fixes rewrite individual tags on the token stream; all other bytes of
//! the content are copied unchanged.

use crate::markup::{tokenize, Token};

const EMPTY_ALT: &str = r#" alt="""#;

/// Result of normalizing a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent {
    /// Normalized markup
    pub content: String,
    /// `<h1>` elements renamed to `<h2>`
    pub headings_demoted: usize,
    /// `<img>` tags that received `alt=""`
    pub alt_attributes_added: usize,
}

impl NormalizedContent {
    /// True when anything was rewritten.
    pub fn changed(&self) -> bool {
        self.headings_demoted > 0 || self.alt_attributes_added > 0
    }
}

/// Applies the heading fix, then the alt-text fix.
pub fn normalize_structure(content: &str) -> NormalizedContent {
    let (content, headings_demoted) = demote_extra_headings(content);
    let (content, alt_attributes_added) = fill_missing_alt(&content);
    NormalizedContent {
        content,
        headings_demoted,
        alt_attributes_added,
    }
}

/// Keeps the first `<h1>` and renames every later one (start and matching end
/// tag) to `<h2>`.
///
/// Content with at most one `<h1>` is returned as is. End tags are matched to
/// the most recent open `<h1>`; an end tag with no open `<h1>` is left alone.
pub fn demote_extra_headings(content: &str) -> (String, usize) {
    let tokens: Vec<Token<'_>> = tokenize(content).collect();
    let h1_count = tokens
        .iter()
        .filter(|token| matches!(token, Token::StartTag(tag) if tag.is("h1")))
        .count();
    if h1_count <= 1 {
        return (content.to_string(), 0);
    }

    let mut out = String::with_capacity(content.len());
    let mut kept_first = false;
    let mut demoted = 0;
    // One entry per open <h1>: whether it was demoted
    let mut open: Vec<bool> = Vec::new();

    for token in &tokens {
        match token {
            Token::StartTag(tag) if tag.is("h1") => {
                let demote = kept_first;
                kept_first = true;
                if !tag.is_self_closing() {
                    open.push(demote);
                }
                if demote {
                    out.push_str(&tag.renamed("h2"));
                    demoted += 1;
                } else {
                    out.push_str(tag.raw());
                }
            }
            Token::EndTag(tag) if tag.is("h1") => {
                if open.pop() == Some(true) {
                    out.push_str(&tag.renamed("h2"));
                } else {
                    out.push_str(tag.raw());
                }
            }
            other => out.push_str(other.raw()),
        }
    }

    (out, demoted)
}

/// Inserts `alt=""` right after the name of every `<img>` lacking `alt`.
pub fn fill_missing_alt(content: &str) -> (String, usize) {
    let mut out = String::with_capacity(content.len());
    let mut added = 0;

    for token in tokenize(content) {
        match token {
            Token::StartTag(tag) if tag.is("img") && !tag.has_attribute("alt") => {
                out.push_str(&tag.with_inserted_after_name(EMPTY_ALT));
                added += 1;
            }
            other => out.push_str(other.raw()),
        }
    }

    (out, added)
}
