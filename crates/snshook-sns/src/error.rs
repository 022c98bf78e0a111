//! Error types for the SNS endpoint.
//!
//! Only one failure is fatal to the process: failing to resolve the host of
//! an outbound request. Everything else aborts the current message or command
//! and is reported to the caller to log.

use snshook_http::{BodyError, CodecError};

/// Failure sending one outbound request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS resolution of the target host failed.
    #[error("failed to resolve host {host}: {reason}")]
    Resolve {
        /// The host that could not be resolved.
        host: String,
        /// Resolver error text.
        reason: String,
    },

    /// The TCP connection could not be established.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// Writing the request failed.
    #[error("failed to send request: {0}")]
    Io(#[from] std::io::Error),

    /// The response could not be framed.
    #[error("malformed response: {0}")]
    Codec(#[from] CodecError),
}

impl TransportError {
    /// Whether this failure must terminate the process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Resolve { .. })
    }
}

/// Failure handling one webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The delivery is not a well-framed HTTP message.
    #[error("malformed webhook delivery: {0}")]
    Codec(#[from] CodecError),

    /// The delivery has no `x-amz-sns-message-type` header.
    #[error("invalid message format: missing x-amz-sns-message-type header")]
    MissingMessageType,

    /// The JSON body does not carry the field this message type needs.
    #[error("unusable webhook body: {0}")]
    Body(#[from] BodyError),

    /// The `SubscribeURL` cannot be used to confirm the subscription.
    #[error("invalid SubscribeURL {url}: {reason}")]
    InvalidSubscribeUrl {
        /// The URL as received.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The confirmation request failed.
    #[error("subscription confirmation failed: {0}")]
    Transport(#[from] TransportError),
}

impl DispatchError {
    /// Whether this failure must terminate the process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_fatal())
    }
}

/// An SNS API response that reports a failure or cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// The response body is not well-formed XML.
    #[error("malformed XML response: {0}")]
    Xml(String),

    /// SNS rejected the request.
    #[error("SNS returned HTTP {status}: {code}: {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// AWS error code, e.g. `InvalidClientTokenId`.
        code: String,
        /// AWS error message.
        message: String,
    },
}

/// Failure of an [`Endpoint`](crate::Endpoint) operation.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The listening socket could not be set up.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The requested listen address.
        addr: String,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// An outbound request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A webhook delivery failed fatally.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// An SNS response reported an error or could not be read.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl EndpointError {
    /// Whether this failure must terminate the process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Bind { .. } => true,
            Self::Transport(e) => e.is_fatal(),
            Self::Dispatch(e) => e.is_fatal(),
            Self::Response(_) => false,
        }
    }
}
