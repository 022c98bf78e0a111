//! Relaxed JSON decoding of webhook bodies.
//!
//! SNS deliveries can carry literal newlines and other control characters
//! inside string values, which strict JSON forbids. Before parsing, every
//! `\n` is removed from the body and any remaining control character inside
//! a string literal is rewritten as a `\u00XX` escape.

use serde_json::Value;

use crate::error::BodyError;

/// Parse a webhook body as JSON after newline normalization.
///
/// # Errors
///
/// Returns [`BodyError::InvalidJson`] if the normalized body is not JSON.
///
/// # Examples
///
/// ```
/// let value = snshook_http::parse_json_body("{\"Message\":\n\"hi\"}").unwrap();
/// assert_eq!(value["Message"], "hi");
/// ```
pub fn parse_json_body(body: &str) -> Result<Value, BodyError> {
    let normalized = escape_control_in_strings(&body.replace('\n', ""));
    Ok(serde_json::from_str(&normalized)?)
}

/// Extract a string field from a JSON object body.
///
/// # Errors
///
/// Returns [`BodyError::WrongType`] if the body is not an object or the field
/// is not a string, and [`BodyError::FieldAbsent`] if the field is missing.
pub fn string_field(value: &Value, field: &str) -> Result<String, BodyError> {
    let object = value.as_object().ok_or_else(|| BodyError::WrongType {
        field: "<root>".to_owned(),
        expected: "object",
    })?;

    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(BodyError::WrongType {
            field: field.to_owned(),
            expected: "string",
        }),
        None => Err(BodyError::FieldAbsent(field.to_owned())),
    }
}

fn escape_control_in_strings(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in input.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            } else if ch.is_ascii_control() {
                out.push_str(&format!("\\u{:04x}", u32::from(ch)));
                continue;
            }
        } else if ch == '"' {
            in_string = true;
        }
        out.push(ch);
    }

    out
}
