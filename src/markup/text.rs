//! Text extraction from markup.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::lexer::{tokenize, Token};
use crate::utils::compile_regex_unsafe;

/// Elements that separate words when markup is stripped.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

const ENTITY_PATTERN: &str = r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);";

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(ENTITY_PATTERN, "ENTITY_RE"));

/// Removes tags, comments and script/style bodies, keeping text.
///
/// Block-level tags become a single space so that `<p>a</p><p>b</p>` yields two
/// words; inline tags do not split words. Character references are decoded.
pub fn strip_tags(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_raw_text = false;

    for token in tokenize(content) {
        match token {
            Token::Text(raw) if !in_raw_text => text.push_str(raw),
            Token::Text(_) | Token::Comment(_) | Token::Declaration(_) => {}
            Token::StartTag(tag) => {
                if (tag.is("script") || tag.is("style")) && !tag.is_self_closing() {
                    in_raw_text = true;
                } else if is_block(tag.name()) {
                    text.push(' ');
                }
            }
            Token::EndTag(tag) => {
                if tag.is("script") || tag.is("style") {
                    in_raw_text = false;
                } else if is_block(tag.name()) {
                    text.push(' ');
                }
            }
        }
    }

    decode_entities(&text)
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS
        .iter()
        .any(|block| block.eq_ignore_ascii_case(name))
}

/// Decodes numeric and common named character references.
///
/// Unknown names are left as written. References to control characters other
/// than whitespace decode to a space.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            match decoded {
                Some(c) if c.is_control() && !c.is_whitespace() => " ".to_string(),
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        _ => return None,
    };
    Some(c)
}
