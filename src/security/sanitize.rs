//! Input sanitization for admin requests.
//!
//! Request values are untrusted: tags are stripped, control characters
//! removed and whitespace collapsed before anything reaches the host.

use serde_json::Value;

use crate::markup::strip_tags;

/// Sanitizes a single-line text field.
///
/// Strips tags (script and style bodies included), turns control characters
/// into spaces, collapses whitespace runs to one space and trims.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    let without_controls: String = stripped
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    without_controls.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitizes every string in a JSON value, recursing into arrays and objects.
///
/// Object keys are sanitized like values. Numbers, booleans and null pass
/// through unchanged.
pub fn sanitize_input(input: Value) -> Value {
    match input {
        Value::String(text) => Value::String(sanitize_text_field(&text)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_input).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (sanitize_text_field(&key), sanitize_input(value)))
                .collect(),
        ),
        other => other,
    }
}
