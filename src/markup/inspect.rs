//! Selector-based inspection of post content.
//!
//! Audits and dashboard scores only need counts, so content is parsed with
//! `scraper` (html5ever) rather than the tokenizer.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::utils::parse_selector_unsafe;

// CSS selector strings
const H1_SELECTOR_STR: &str = "h1";
const IMG_SELECTOR_STR: &str = "img";
const IMG_MISSING_ALT_SELECTOR_STR: &str = "img:not([alt])";

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(H1_SELECTOR_STR, "H1_SELECTOR"));
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(IMG_SELECTOR_STR, "IMG_SELECTOR"));
static IMG_MISSING_ALT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(IMG_MISSING_ALT_SELECTOR_STR, "IMG_MISSING_ALT_SELECTOR")
});

/// Structural counts for one piece of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFindings {
    /// `<h1>` elements
    pub h1_count: usize,
    /// `<img>` elements
    pub images: usize,
    /// `<img>` elements without an `alt` attribute
    pub images_missing_alt: usize,
}

impl ContentFindings {
    /// Parses the content once and collects all counts.
    pub fn from_content(content: &str) -> Self {
        let fragment = Html::parse_fragment(content);
        Self {
            h1_count: fragment.select(&H1_SELECTOR).count(),
            images: fragment.select(&IMG_SELECTOR).count(),
            images_missing_alt: fragment.select(&IMG_MISSING_ALT_SELECTOR).count(),
        }
    }

    /// True when more than one `<h1>` is present.
    pub fn has_multiple_h1(&self) -> bool {
        self.h1_count > 1
    }
}
