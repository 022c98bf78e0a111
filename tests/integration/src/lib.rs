//! Integration tests for the snshook webhook listener.
//!
//! Every test binds a real listener on `127.0.0.1:0` and talks to it over
//! loopback TCP, so no network access or AWS account is needed.
//!
//! Run them with:
//! ```text
//! cargo test -p snshook-integration
//! ```

use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

use snshook_auth::Credentials;
use snshook_http::read_to_close;
use snshook_sns::{Endpoint, EndpointError, EndpointSettings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Host echoed in every acknowledgement.
pub const SNS_HOST: &str = "sns.us-east-1.amazonaws.com";

/// The acknowledgement every delivery must receive.
pub const ACK: &str = "HTTP/1.1 200 OK\r\nHost: sns.us-east-1.amazonaws.com\r\n\r\n";

/// Listener read timeout; short so stalled peers do not slow tests.
const TEST_READ_TIMEOUT: Duration = Duration::from_millis(200);

/// The fake SNS server must answer well inside the listener's read timeout.
const FAKE_SNS_READ_TIMEOUT: Duration = Duration::from_millis(50);

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A webhook listener running in a background task.
#[derive(Debug)]
pub struct RunningListener {
    /// Address the listener accepts on.
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), EndpointError>>,
}

impl RunningListener {
    /// Bind a listener on a free loopback port and start serving.
    pub async fn start() -> Self {
        init_tracing();

        let settings = EndpointSettings {
            listen_host: "127.0.0.1".to_owned(),
            listen_port: 0,
            sns_host: SNS_HOST.to_owned(),
            read_timeout: TEST_READ_TIMEOUT,
        };
        let mut endpoint = Endpoint::new(settings, Credentials::new("AKIDEXAMPLE", "secret"));
        let addr = endpoint.bind().await.expect("bind loopback listener");

        let (shutdown, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            endpoint
                .listen(async {
                    rx.await.ok();
                })
                .await
        });

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    /// Signal shutdown and wait for the accept loop to return.
    pub async fn stop(self) -> Result<(), EndpointError> {
        self.shutdown.send(()).ok();
        self.handle.await.expect("listener task panicked")
    }

    /// Wait for the accept loop to return on its own.
    pub async fn join(self) -> Result<(), EndpointError> {
        self.handle.await.expect("listener task panicked")
    }
}

/// Build a webhook delivery, with `x-amz-sns-message-type` set when given.
#[must_use]
pub fn delivery(message_type: Option<&str>, body: &str) -> String {
    let type_header = message_type
        .map(|t| format!("x-amz-sns-message-type: {t}\r\n"))
        .unwrap_or_default();
    format!(
        "POST / HTTP/1.1\r\nHost: 127.0.0.1\r\n{type_header}Content-Type: text/plain; charset=UTF-8\r\n\r\n{body}"
    )
}

/// Send `payload` to `addr`, close the write side, and return the full reply.
pub async fn deliver(addr: SocketAddr, payload: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect to listener");
    stream
        .write_all(payload.as_bytes())
        .await
        .expect("write delivery");
    stream.shutdown().await.expect("half-close delivery");

    let mut reply = String::new();
    stream
        .read_to_string(&mut reply)
        .await
        .expect("read acknowledgement");
    reply
}

/// A one-shot plain-HTTP server standing in for the SNS confirmation URL.
///
/// Accepts a single connection, answers `200 OK`, and yields the request it
/// received.
pub async fn fake_sns() -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake SNS");
    let addr = listener.local_addr().expect("fake SNS address");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept confirmation");
        let request = read_to_close(&mut stream, FAKE_SNS_READ_TIMEOUT).await;
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\n\r\n<ConfirmSubscriptionResponse/>",
            )
            .await
            .expect("write confirmation response");
        request
    });

    (addr, handle)
}

mod test_confirmation;
mod test_listener;
