//! Lossless markup tokenizer.
//!
//! Splits post content into text, tags, comments and declarations. Every byte of
//! the input belongs to exactly one token, so concatenating `Token::raw` of all
//! tokens reproduces the input. Only what the normalizers need is parsed: tag
//! names and attributes. There is no tree construction and no error recovery
//! beyond treating an unterminated construct as text.

use std::ops::Range;

/// Elements whose content is raw text (never parsed for tags).
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// One lexical unit of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Character data between tags
    Text(&'a str),
    /// `<name ...>` or `<name ... />`
    StartTag(Tag<'a>),
    /// `</name>`
    EndTag(Tag<'a>),
    /// `<!-- ... -->`
    Comment(&'a str),
    /// `<!DOCTYPE ...>`, `<![CDATA[...]>`, `<? ... >`
    Declaration(&'a str),
}

impl<'a> Token<'a> {
    /// Source text of the token.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Text(raw) | Token::Comment(raw) | Token::Declaration(raw) => raw,
            Token::StartTag(tag) | Token::EndTag(tag) => tag.raw,
        }
    }
}

/// A start or end tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    raw: &'a str,
    name: Range<usize>,
    attributes: Vec<Attribute<'a>>,
    self_closing: bool,
}

/// An attribute as written in the source (value without quotes, not decoded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Name as written (original case)
    pub name: &'a str,
    /// `None` for a bare attribute
    pub value: Option<&'a str>,
}

impl<'a> Tag<'a> {
    /// Source text of the attribute.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Tag name as written.
    pub fn name(&self) -> &'a str {
        &self.raw[self.name.clone()]
    }

    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }

    /// Attributes in source order.
    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    /// First attribute with the given name (case-insensitive).
    pub fn attribute(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive lookup.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// True for `<br/>`-style tags.
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Source text with the tag name replaced; everything else is kept verbatim.
    pub fn renamed(&self, new_name: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + new_name.len());
        out.push_str(&self.raw[..self.name.start]);
        out.push_str(new_name);
        out.push_str(&self.raw[self.name.end..]);
        out
    }

    /// Source text with `text` inserted right after the tag name.
    pub fn with_inserted_after_name(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + text.len());
        out.push_str(&self.raw[..self.name.end]);
        out.push_str(text);
        out.push_str(&self.raw[self.name.end..]);
        out
    }
}

/// Iterator over the tokens of a markup string.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text_element: Option<&'static str>,
}

/// Tokenizes `input`.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer {
        input,
        pos: 0,
        raw_text_element: None,
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let len = self.input.len();
        if self.pos >= len {
            return None;
        }
        let start = self.pos;

        if let Some(element) = self.raw_text_element.take() {
            let end = find_closing_tag(self.input, start, element).unwrap_or(len);
            if end > start {
                self.pos = end;
                return Some(Token::Text(&self.input[start..end]));
            }
        }

        if self.input.as_bytes()[start] == b'<' {
            if let Some((token, end)) = self.lex_markup(start) {
                self.pos = end;
                if let Token::StartTag(tag) = &token {
                    if !tag.self_closing {
                        self.raw_text_element = RAW_TEXT_ELEMENTS
                            .iter()
                            .find(|name| tag.is(name))
                            .copied();
                    }
                }
                return Some(token);
            }
            // A '<' that opens nothing is ordinary text
            let end = next_lt(self.input, start + 1);
            self.pos = end;
            return Some(Token::Text(&self.input[start..end]));
        }

        let end = next_lt(self.input, start);
        self.pos = end;
        Some(Token::Text(&self.input[start..end]))
    }
}

impl<'a> Tokenizer<'a> {
    /// Lexes the construct opening at `start` (a `<`), returning it and its end.
    fn lex_markup(&self, start: usize) -> Option<(Token<'a>, usize)> {
        let input = self.input;
        let rest = &input[start..];
        let bytes = input.as_bytes();

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map(|i| start + 4 + i + 3)
                .unwrap_or(input.len());
            return Some((Token::Comment(&input[start..end]), end));
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = start + 2 + rest[2..].find('>')? + 1;
            return Some((Token::Declaration(&input[start..end]), end));
        }

        if rest.starts_with("</") {
            if !bytes.get(start + 2)?.is_ascii_alphabetic() {
                return None;
            }
            let name_end = scan_name(bytes, start + 2);
            let end = name_end + input[name_end..].find('>')? + 1;
            let tag = Tag {
                raw: &input[start..end],
                name: 2..name_end - start,
                attributes: Vec::new(),
                self_closing: false,
            };
            return Some((Token::EndTag(tag), end));
        }

        if !bytes.get(start + 1)?.is_ascii_alphabetic() {
            return None;
        }
        let name_end = scan_name(bytes, start + 1);
        let (attributes, self_closing, end) = lex_attributes(input, name_end)?;
        let tag = Tag {
            raw: &input[start..end],
            name: 1..name_end - start,
            attributes,
            self_closing,
        };
        Some((Token::StartTag(tag), end))
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

fn next_lt(input: &str, from: usize) -> usize {
    input[from..]
        .find('<')
        .map(|i| from + i)
        .unwrap_or(input.len())
}

/// End of a tag name starting at `i`.
fn scan_name(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'/' && bytes[i] != b'>' {
        i += 1;
    }
    i
}

fn skip_space(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    i
}

/// Lexes attributes up to and including the closing `>`.
///
/// Returns `None` when the tag is never closed.
fn lex_attributes(input: &str, mut i: usize) -> Option<(Vec<Attribute<'_>>, bool, usize)> {
    let bytes = input.as_bytes();
    let mut attributes = Vec::new();

    loop {
        i = skip_space(bytes, i);
        match *bytes.get(i)? {
            b'>' => return Some((attributes, false, i + 1)),
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    return Some((attributes, true, i + 2));
                }
                i += 1;
            }
            _ => {
                let name_start = i;
                while i < bytes.len()
                    && !is_space(bytes[i])
                    && !matches!(bytes[i], b'/' | b'>' | b'=')
                {
                    i += 1;
                }
                if i == name_start {
                    // Stray '='
                    i += 1;
                    continue;
                }
                let name = &input[name_start..i];

                let j = skip_space(bytes, i);
                let value = if bytes.get(j) == Some(&b'=') {
                    let value_start = skip_space(bytes, j + 1);
                    match *bytes.get(value_start)? {
                        quote @ (b'"' | b'\'') => {
                            let close = input[value_start + 1..].find(quote as char)?;
                            let value_end = value_start + 1 + close;
                            i = value_end + 1;
                            Some(&input[value_start + 1..value_end])
                        }
                        _ => {
                            let mut k = value_start;
                            while k < bytes.len() && !is_space(bytes[k]) && bytes[k] != b'>' {
                                k += 1;
                            }
                            i = k;
                            Some(&input[value_start..k])
                        }
                    }
                } else {
                    None
                };
                attributes.push(Attribute { name, value });
            }
        }
    }
}

/// Offset of `</element` (case-insensitive, followed by a delimiter) at or after `from`.
fn find_closing_tag(input: &str, from: usize, element: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut search = from;
    while let Some(offset) = input[search..].find("</") {
        let at = search + offset;
        let name_start = at + 2;
        let name_end = name_start + element.len();
        if name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(element.as_bytes())
            && bytes
                .get(name_end)
                .map_or(true, |b| is_space(*b) || *b == b'/' || *b == b'>')
        {
            return Some(at);
        }
        search = at + 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_concat(input: &str) -> String {
        tokenize(input).map(|t| t.raw()).collect()
    }

    #[test]
    fn test_tokenize_is_lossless() {
        let inputs = [
            "",
            "plain text",
            "<p class=\"a\">Hi <b>there</b></p>",
            "<!DOCTYPE html><!-- note --><h1 id=x>T</h1>",
            "a < b and c > d",
            "<img src='x.png' alt>",
            "<script>if (a < b) { x = '</p>'; }</script><p>after</p>",
            "<div unterminated",
            "<p>caf\u{e9} \u{1f680}</p>",
        ];
        for input in inputs {
            assert_eq!(raw_concat(input), input, "input: {input}");
        }
    }

    #[test]
    fn test_start_tag_attributes() {
        let tokens: Vec<Token<'_>> =
            tokenize(r#"<img SRC="a.png" data-x='1' hidden width=10/>"#).collect();
        assert_eq!(tokens.len(), 1);
        let Token::StartTag(tag) = &tokens[0] else {
            panic!("expected start tag, got {:?}", tokens[0]);
        };
        assert!(tag.is("img"));
        assert_eq!(tag.attribute("src").and_then(|a| a.value), Some("a.png"));
        assert_eq!(tag.attribute("data-x").and_then(|a| a.value), Some("1"));
        assert!(tag.has_attribute("hidden"));
        assert_eq!(tag.attribute("hidden").and_then(|a| a.value), None);
        // Unquoted value swallows the slash, as in HTML
        assert_eq!(tag.attribute("width").and_then(|a| a.value), Some("10/"));
        assert!(!tag.has_attribute("alt"));
    }

    #[test]
    fn test_self_closing() {
        let tokens: Vec<Token<'_>> = tokenize(r#"<br/><img src="a" />"#).collect();
        assert!(matches!(&tokens[0], Token::StartTag(t) if t.is_self_closing()));
        assert!(matches!(&tokens[1], Token::StartTag(t) if t.is_self_closing()));
    }

    #[test]
    fn test_quoted_value_may_contain_gt() {
        let tokens: Vec<Token<'_>> = tokenize(r#"<a title="1 > 0">x</a>"#).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].raw(), r#"<a title="1 > 0">"#);
    }

    #[test]
    fn test_script_content_is_text() {
        let tokens: Vec<Token<'_>> = tokenize("<script>var s = '<h1>';</script>").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::Text("var s = '<h1>';"));
        assert!(matches!(&tokens[2], Token::EndTag(t) if t.is("script")));
    }

    #[test]
    fn test_renamed_preserves_attributes_and_case() {
        let tokens: Vec<Token<'_>> = tokenize(r#"<H1 class="big">"#).collect();
        let Token::StartTag(tag) = &tokens[0] else {
            panic!("expected start tag");
        };
        assert_eq!(tag.name(), "H1");
        assert_eq!(tag.renamed("h2"), r#"<h2 class="big">"#);
        assert_eq!(
            tag.with_inserted_after_name(r#" alt="""#),
            r#"<H1 alt="" class="big">"#
        );
    }

    #[test]
    fn test_end_tag() {
        let tokens: Vec<Token<'_>> = tokenize("</h1 >").collect();
        let Token::EndTag(tag) = &tokens[0] else {
            panic!("expected end tag");
        };
        assert!(tag.is("h1"));
        assert_eq!(tag.renamed("h2"), "</h2 >");
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let tokens: Vec<Token<'_>> = tokenize("<img src=\"a").collect();
        assert_eq!(tokens, vec![Token::Text("<img src=\"a")]);
    }
}
