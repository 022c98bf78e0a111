//! Canonical form of an outbound SNS request.
//!
//! snshook only ever signs requests against `/` that carry their parameters
//! in the query string and sign exactly `host` and `x-amz-date`. The
//! canonical request therefore has a fixed shape:
//!
//! ```text
//! <method>
//! /
//! <query string, verbatim>
//! host:<host>
//! x-amz-date:<timestamp>
//!
//! host;x-amz-date
//! <hex sha256 of payload>
//! ```
//!
//! The query string is not re-encoded here; it must be byte-identical to the
//! one written on the wire. [`encode_query`] produces one that already is.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Every signed request targets the root path.
pub const CANONICAL_URI: &str = "/";

/// Signed header list, already sorted and joined.
pub const SIGNED_HEADERS: &str = "host;x-amz-date";

/// SigV4 leaves only `A-Z a-z 0-9 - _ . ~` unescaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The parts of a request that the signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalRequest<'a> {
    /// HTTP method.
    pub method: &'a str,
    /// Query string as sent, without `?`.
    pub query_string: &'a str,
    /// `Host` header value.
    pub host: &'a str,
    /// `x-amz-date` header value.
    pub amz_date: &'a str,
    /// Hex SHA-256 of the body.
    pub payload_hash: &'a str,
}

impl fmt::Display for CanonicalRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{method}\n{CANONICAL_URI}\n{query}\nhost:{host}\nx-amz-date:{date}\n\n{SIGNED_HEADERS}\n{hash}",
            method = self.method,
            query = self.query_string,
            host = self.host.trim(),
            date = self.amz_date.trim(),
            hash = self.payload_hash,
        )
    }
}

/// Percent-encode `params` and join them, sorted, into a query string.
///
/// Sorting happens after encoding, by key and then by value, which is the
/// order SigV4 canonicalization uses. A space becomes `%20`, never `+`.
///
/// ```
/// use snshook_auth::canonical::encode_query;
///
/// assert_eq!(
///     encode_query([("Protocol", "http"), ("Endpoint", "http://h:80/")]),
///     "Endpoint=http%3A%2F%2Fh%3A80%2F&Protocol=http"
/// );
/// ```
#[must_use]
pub fn encode_query<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(key, value)| {
            (
                utf8_percent_encode(key, UNRESERVED).to_string(),
                utf8_percent_encode(value, UNRESERVED).to_string(),
            )
        })
        .collect();
    pairs.sort_unstable();

    let mut query = String::new();
    for (key, value) in &pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(key);
        query.push('=');
        query.push_str(value);
    }
    query
}
