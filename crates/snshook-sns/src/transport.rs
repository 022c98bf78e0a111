//! Outbound request transport.

use std::future::Future;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use snshook_http::{HttpMessage, READ_TIMEOUT, parse_message, read_to_close};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, lookup_host};
use tracing::{debug, error};

use crate::error::TransportError;

/// Port used for every outbound request. TLS is not supported.
pub const HTTP_PORT: u16 = 80;

/// Sends one fully encoded request and returns the decoded response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` to `host:port` and read the response until the peer
    /// closes or stalls.
    async fn send(
        &self,
        host: &str,
        port: u16,
        request: Vec<u8>,
    ) -> Result<HttpMessage, TransportError>;
}

/// Opens a fresh TCP connection for every request.
#[derive(Debug, Clone, Copy)]
pub struct TcpTransport {
    read_timeout: Duration,
}

impl TcpTransport {
    /// Create a transport whose connects and reads give up after `read_timeout`.
    #[must_use]
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(READ_TIMEOUT)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(
        &self,
        host: &str,
        port: u16,
        request: Vec<u8>,
    ) -> Result<HttpMessage, TransportError> {
        let resolve_error = |reason: String| {
            error!(host, "error resolving the hostname");
            TransportError::Resolve {
                host: host.to_owned(),
                reason,
            }
        };

        let addr = lookup_host((host, port))
            .await
            .map_err(|e| resolve_error(e.to_string()))?
            .next()
            .ok_or_else(|| resolve_error("no addresses returned".to_owned()))?;

        let mut stream = connect_within(TcpStream::connect(addr), self.read_timeout)
            .await
            .map_err(|source| TransportError::Connect {
                host: host.to_owned(),
                port,
                source,
            })?;

        debug!(host, %addr, bytes = request.len(), "sending request");
        stream.write_all(&request).await?;

        let raw = read_to_close(&mut stream, self.read_timeout).await;
        Ok(parse_message(&raw)?)
    }
}

/// Give up on `connect` after `limit`, reporting it as `TimedOut`.
async fn connect_within<F>(connect: F, limit: Duration) -> io::Result<TcpStream>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    tokio::time::timeout(limit, connect)
        .await
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::TimedOut, "connect timed out")))
}
