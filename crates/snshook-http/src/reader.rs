//! Connection-close-delimited message reading.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// Size of each read from the socket.
pub const BUFFER_SIZE: usize = 4096;

/// How long a single read may block before the message is considered complete.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Read from `reader` until the peer closes, a read fails, or a read stalls
/// for longer than `read_timeout`.
///
/// All three outcomes end the message normally: whatever arrived so far is
/// returned. Bytes that are not valid UTF-8 are replaced rather than rejected.
pub async fn read_to_close<R>(reader: &mut R, read_timeout: Duration) -> String
where
    R: AsyncRead + Unpin,
{
    let mut received = Vec::new();
    let mut chunk = [0u8; BUFFER_SIZE];

    loop {
        match tokio::time::timeout(read_timeout, reader.read(&mut chunk)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => received.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => {
                debug!(error = %e, "read failed, ending message");
                break;
            }
            Err(_) => {
                debug!(timeout_ms = read_timeout.as_millis(), "read timed out, ending message");
                break;
            }
        }
    }

    String::from_utf8_lossy(&received).into_owned()
}
