//! Error types for HTTP framing and body decoding.

/// A received message does not have valid HTTP/1.1 framing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// No CRLF terminates the start line.
    #[error("message has no start line terminator")]
    MissingStartLine,

    /// No blank line separates the headers from the body.
    #[error("message has no header terminator")]
    MissingHeaderTerminator,

    /// A header line lacks the `": "` separator.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
}

/// A webhook body could not yield the requested value.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// The body is not JSON, even after newline normalization.
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body has no field with the requested name.
    #[error("field {0} is absent")]
    FieldAbsent(String),

    /// The field (or the body itself) has an unexpected JSON type.
    #[error("field {field} is not a {expected}")]
    WrongType {
        /// The field that was inspected; `<root>` for the body itself.
        field: String,
        /// The JSON type that was required.
        expected: &'static str,
    },
}
