//! The SNS endpoint: signed API calls and the webhook accept loop.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use snshook_auth::{Credentials, SignableRequest, build_authorization_header, encode_query};
use snshook_core::{AwsRegion, HookConfig, TopicArn};
use snshook_http::{READ_TIMEOUT, build_ack, build_request, format_headers, read_to_close};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream, lookup_host};
use tracing::{debug, error, info, warn};

use crate::dispatch::NotificationDispatcher;
use crate::error::EndpointError;
use crate::response::{ensure_success, parse_subscription_arn, parse_topic_page};
use crate::transport::{HTTP_PORT, TcpTransport, Transport};

/// Service name in the SigV4 credential scope.
const SNS_SERVICE: &str = "sns";

/// Subscription protocol requested by [`Endpoint::subscribe`].
const SUBSCRIBE_PROTOCOL: &str = "http";

/// One pending connection at most; deliveries are handled one at a time.
const LISTEN_BACKLOG: u32 = 1;

/// Pause after a failed `accept()` before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Addresses and timeouts of an [`Endpoint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    /// Address the webhook listener binds to.
    pub listen_host: String,
    /// Port the webhook listener binds to; `0` picks a free port.
    pub listen_port: u16,
    /// SNS host that signed requests go to. Also echoed in the acknowledgement.
    pub sns_host: String,
    /// How long a read may stall before the message is considered complete.
    pub read_timeout: Duration,
}

impl EndpointSettings {
    /// Take the listener and SNS addresses from `config`.
    #[must_use]
    pub fn from_config(config: &HookConfig) -> Self {
        Self {
            listen_host: config.listen_host.clone(),
            listen_port: config.listen_port,
            sns_host: config.sns_host.clone(),
            read_timeout: READ_TIMEOUT,
        }
    }
}

/// Talks to SNS and receives its webhook deliveries.
///
/// The endpoint owns the listening socket. It is opened by [`Endpoint::bind`]
/// (or lazily by [`Endpoint::listen`]) and released by [`Endpoint::close`].
#[derive(Debug)]
pub struct Endpoint<T = TcpTransport> {
    settings: EndpointSettings,
    credentials: Credentials,
    transport: T,
    listener: Option<TcpListener>,
}

impl Endpoint<TcpTransport> {
    /// Create an endpoint that sends requests over plain TCP.
    #[must_use]
    pub fn new(settings: EndpointSettings, credentials: Credentials) -> Self {
        let transport = TcpTransport::new(settings.read_timeout);
        Self::with_transport(settings, credentials, transport)
    }
}

impl<T: Transport> Endpoint<T> {
    /// Create an endpoint that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(
        settings: EndpointSettings,
        credentials: Credentials,
        transport: T,
    ) -> Self {
        Self {
            settings,
            credentials,
            transport,
            listener: None,
        }
    }

    /// The endpoint's settings.
    #[must_use]
    pub fn settings(&self) -> &EndpointSettings {
        &self.settings
    }

    /// The transport outbound requests go through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Address of the listening socket, if it is open.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Send a signed `GET` with `params` as its query and return the response body.
    ///
    /// # Errors
    ///
    /// Fails if the request cannot be sent or SNS answers with a non-2xx
    /// status. A host that does not resolve yields a fatal error.
    pub async fn send_signed(
        &self,
        region: &AwsRegion,
        params: &[(&str, &str)],
    ) -> Result<String, EndpointError> {
        let host = self.settings.sns_host.as_str();
        let query = encode_query(params.iter().copied());

        let signable = SignableRequest::new("GET", host, region.as_str(), SNS_SERVICE, &query);
        let signed = build_authorization_header(&self.credentials, &signable);

        let header_block = format_headers([
            ("Host", host),
            ("Connection", "close"),
            ("x-amz-date", signed.amz_date.as_str()),
            ("Authorization", signed.authorization.as_str()),
        ]);
        let request = build_request("GET", "/", &query, &header_block);

        debug!(host, region = %region, query = %query, "sending signed request");
        let response = self.transport.send(host, HTTP_PORT, request).await?;
        ensure_success(&response)?;

        Ok(response.body)
    }

    /// List every topic visible to the credentials in `region`, following
    /// `NextToken` until the last page.
    ///
    /// Each ARN is logged as it is read. A body without recognizable topics is
    /// logged verbatim.
    pub async fn list_topics(&self, region: &AwsRegion) -> Result<Vec<String>, EndpointError> {
        let mut topics = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut params = vec![("Action", "ListTopics")];
            if let Some(token) = next_token.as_deref() {
                params.push(("NextToken", token));
            }

            let body = self.send_signed(region, &params).await?;
            let page = match parse_topic_page(&body) {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "could not read ListTopics response");
                    info!("{body}");
                    return Ok(topics);
                }
            };

            if page.topic_arns.is_empty() && page.next_token.is_none() && topics.is_empty() {
                info!("{body}");
            }
            for arn in &page.topic_arns {
                info!(topic_arn = %arn, "available topic");
            }
            topics.extend(page.topic_arns);

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(topics),
            }
        }
    }

    /// Subscribe `endpoint` to `topic_arn` over HTTP.
    ///
    /// Returns the subscription ARN SNS reported, normally
    /// `pending confirmation` until the listener confirms it.
    pub async fn subscribe(
        &self,
        region: &AwsRegion,
        topic_arn: &TopicArn,
        endpoint: &str,
    ) -> Result<Option<String>, EndpointError> {
        let body = self
            .send_signed(
                region,
                &[
                    ("Action", "Subscribe"),
                    ("Endpoint", endpoint),
                    ("Protocol", SUBSCRIBE_PROTOCOL),
                    ("TopicArn", topic_arn.as_str()),
                ],
            )
            .await?;

        let subscription_arn = parse_subscription_arn(&body)?;
        info!(
            topic_arn = %topic_arn,
            endpoint,
            subscription_arn = subscription_arn.as_deref().unwrap_or("<none>"),
            "requested subscription",
        );
        Ok(subscription_arn)
    }

    /// Open the listening socket with address reuse and a backlog of one.
    ///
    /// Returns the bound address. Binding again replaces the previous socket.
    pub async fn bind(&mut self) -> Result<SocketAddr, EndpointError> {
        let host = self.settings.listen_host.as_str();
        let port = self.settings.listen_port;
        let bind_error = |source: io::Error| EndpointError::Bind {
            addr: format!("{host}:{port}"),
            source,
        };

        let addr = lookup_host((host, port))
            .await
            .map_err(bind_error)?
            .next()
            .ok_or_else(|| {
                bind_error(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    "listen host has no addresses",
                ))
            })?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_error)?;
        socket.set_reuseaddr(true).map_err(bind_error)?;
        socket.bind(addr).map_err(bind_error)?;

        let listener = socket.listen(LISTEN_BACKLOG).map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        info!("Listening on port {}...", local_addr.port());
        self.listener = Some(listener);
        Ok(local_addr)
    }

    /// Serve webhook deliveries until `shutdown` completes.
    ///
    /// Connections are handled strictly one at a time: read until the peer
    /// closes or stalls, reply `200 OK`, close, then dispatch. The reply does
    /// not depend on the delivery being valid. `shutdown` is observed while
    /// waiting for a connection and while one is being handled; an in-flight
    /// delivery is abandoned. The listening socket is closed on return.
    ///
    /// # Errors
    ///
    /// Returns when the socket cannot be bound or a delivery fails fatally.
    /// Any other per-delivery failure is logged and serving continues.
    pub async fn listen<F>(&mut self, shutdown: F) -> Result<(), EndpointError>
    where
        F: Future<Output = ()>,
    {
        if self.listener.is_none() {
            self.bind().await?;
        }

        let result = self.accept_loop(shutdown).await;
        self.close();
        result
    }

    /// Close the listening socket. Does nothing if it is not open.
    pub fn close(&mut self) {
        if self.listener.take().is_some() {
            debug!("closing listening socket");
        }
    }

    async fn accept_loop<F>(&self, shutdown: F) -> Result<(), EndpointError>
    where
        F: Future<Output = ()>,
    {
        let Some(listener) = self.listener.as_ref() else {
            return Ok(());
        };

        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                result = listener.accept() => result,
                () = &mut shutdown => {
                    info!("received shutdown signal, closing listener");
                    return Ok(());
                }
            };

            let (stream, peer_addr) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };

            tokio::select! {
                result = self.handle_connection(stream, peer_addr) => result?,
                () = &mut shutdown => {
                    info!(%peer_addr, "received shutdown signal during delivery, closing listener");
                    return Ok(());
                }
            }
        }
    }

    async fn handle_connection(
        &self,
        mut stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<(), EndpointError> {
        debug!(%peer_addr, "connection established");

        let raw = read_to_close(&mut stream, self.settings.read_timeout).await;

        if let Err(e) = stream.write_all(&build_ack(&self.settings.sns_host)).await {
            debug!(%peer_addr, error = %e, "failed to send acknowledgement");
        }
        if let Err(e) = stream.shutdown().await {
            debug!(%peer_addr, error = %e, "failed to shut down connection");
        }
        drop(stream);

        match NotificationDispatcher::new(&self.transport).dispatch(&raw).await {
            Ok(outcome) => {
                debug!(%peer_addr, ?outcome, "handled webhook delivery");
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                error!(%peer_addr, error = %e, "failed to handle webhook delivery");
                Ok(())
            }
        }
    }
}
