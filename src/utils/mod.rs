//! Shared helpers for static regexes and CSS selectors.

mod pattern;
mod selector;

pub use pattern::compile_regex_unsafe;
pub use selector::parse_selector_unsafe;
