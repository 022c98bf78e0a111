//! HTTP/1.1 message encoding and decoding.
//!
//! A message on the wire looks like:
//!
//! ```text
//! <start line>\r\n
//! <name>: <value>\r\n
//! ...
//! \r\n
//! <body>
//! ```
//!
//! Header names are lower-cased when parsed, so every lookup downstream is
//! case-insensitive by construction.

use std::collections::HashMap;
use std::fmt;

use crate::error::CodecError;

/// Parsed header map, keyed by lower-cased header name.
///
/// Repeated headers keep the value of their last occurrence.
pub type HeaderMap = HashMap<String, String>;

const CRLF: &str = "\r\n";
const HEADER_TERMINATOR: &str = "\r\n\r\n";
const HEADER_SEPARATOR: &str = ": ";

/// A received HTTP request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMessage {
    /// Request line or status line, without its CRLF.
    pub start_line: String,
    /// Headers keyed by lower-cased name.
    pub headers: HeaderMap,
    /// Everything after the blank line, verbatim.
    pub body: String,
}

impl HttpMessage {
    /// Look up a header by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Status code of a response, if the start line is a status line.
    ///
    /// # Examples
    ///
    /// ```
    /// let msg = snshook_http::parse_message("HTTP/1.1 403 Forbidden\r\n\r\n").unwrap();
    /// assert_eq!(msg.status_code(), Some(403));
    /// ```
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        let mut parts = self.start_line.split(' ');
        let version = parts.next()?;
        if !version.starts_with("HTTP/") {
            return None;
        }
        parts.next()?.parse().ok()
    }
}

/// Join header pairs into a CRLF-separated `name: value` block.
///
/// Pairs are written in iteration order; pass an ordered collection when the
/// order matters. No trailing CRLF is added.
///
/// # Examples
///
/// ```
/// use snshook_http::format_headers;
///
/// let block = format_headers([("Host", "sns.us-east-1.amazonaws.com"), ("x-amz-date", "20150830T123600Z")]);
/// assert_eq!(block, "Host: sns.us-east-1.amazonaws.com\r\nx-amz-date: 20150830T123600Z");
/// ```
#[must_use]
pub fn format_headers<I, K, V>(headers: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: fmt::Display,
    V: fmt::Display,
{
    headers
        .into_iter()
        .map(|(name, value)| format!("{name}{HEADER_SEPARATOR}{value}"))
        .collect::<Vec<_>>()
        .join(CRLF)
}

/// Build a request for `path?query` carrying the given header block.
///
/// The `?` is always written, even for an empty query string.
///
/// # Examples
///
/// ```
/// let raw = snshook_http::build_request("GET", "/", "Action=ListTopics", "Host: h");
/// assert_eq!(raw, b"GET /?Action=ListTopics HTTP/1.1\r\nHost: h\r\n\r\n");
/// ```
#[must_use]
pub fn build_request(method: &str, path: &str, query_string: &str, header_block: &str) -> Vec<u8> {
    format!("{method} {path}?{query_string} HTTP/1.1{CRLF}{header_block}{HEADER_TERMINATOR}")
        .into_bytes()
}

/// Build the fixed `200 OK` acknowledgement sent for every webhook delivery.
#[must_use]
pub fn build_ack(host: &str) -> Vec<u8> {
    format!("HTTP/1.1 200 OK{CRLF}Host: {host}{HEADER_TERMINATOR}").into_bytes()
}

/// Split a raw message into start line, headers and body.
///
/// # Errors
///
/// Returns [`CodecError::MissingStartLine`] if there is no CRLF at all,
/// [`CodecError::MissingHeaderTerminator`] if no blank line ends the headers,
/// and [`CodecError::MalformedHeader`] for a header line without `": "`.
pub fn parse_message(raw: &str) -> Result<HttpMessage, CodecError> {
    let (start_line, rest) = raw
        .split_once(CRLF)
        .ok_or(CodecError::MissingStartLine)?;

    // A message without headers has its blank line right after the start line.
    let (header_block, body) = match rest.strip_prefix(CRLF) {
        Some(body) => ("", body),
        None => rest
            .split_once(HEADER_TERMINATOR)
            .ok_or(CodecError::MissingHeaderTerminator)?,
    };

    Ok(HttpMessage {
        start_line: start_line.to_owned(),
        headers: parse_headers(header_block)?,
        body: body.to_owned(),
    })
}

/// Parse a CRLF-separated header block into a [`HeaderMap`].
///
/// # Errors
///
/// Returns [`CodecError::MalformedHeader`] for a line without `": "`.
pub fn parse_headers(header_block: &str) -> Result<HeaderMap, CodecError> {
    let mut headers = HeaderMap::new();
    if header_block.is_empty() {
        return Ok(headers);
    }

    for line in header_block.split(CRLF) {
        let (name, value) = line
            .split_once(HEADER_SEPARATOR)
            .ok_or_else(|| CodecError::MalformedHeader(line.to_owned()))?;
        headers.insert(name.to_ascii_lowercase(), value.to_owned());
    }

    Ok(headers)
}
