//! Regex compilation utilities.

use regex::Regex;

/// Compiles a regex pattern that must succeed (for static patterns).
///
/// # Panics
///
/// Panics with the pattern and context if compilation fails.
pub fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}
