//! Raw HTTP/1.1 message framing and webhook body decoding for snshook.
//!
//! snshook speaks HTTP directly over TCP sockets. This crate holds the pure
//! parts of that: turning header lists into a request, splitting a received
//! message into start line, headers and body, reading a connection until the
//! peer closes it, and pulling typed fields out of a JSON body.
//!
//! # Framing limits
//!
//! Messages are delimited by connection close. There is no `Content-Length`
//! or chunked transfer-encoding support: a peer that keeps the connection
//! open after writing stalls [`read_to_close`] until its read timeout fires,
//! and whatever arrived by then is treated as the full message.

pub mod error;
pub mod json;
pub mod message;
pub mod reader;

pub use error::{BodyError, CodecError};
pub use json::{parse_json_body, string_field};
pub use message::{
    HeaderMap, HttpMessage, build_ack, build_request, format_headers, parse_headers, parse_message,
};
pub use reader::{BUFFER_SIZE, READ_TIMEOUT, read_to_close};
