//! Webhook delivery dispatch.
//!
//! A delivery is handled independently of every other: there is no state
//! across messages, so a duplicate delivery confirms or emits again.

use snshook_http::{build_request, format_headers, parse_message};
use tracing::{debug, info, warn};
use url::{Host, Url};

use crate::error::DispatchError;
use crate::message::SnsMessage;
use crate::transport::{HTTP_PORT, Transport};

/// What handling one delivery did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The subscription was confirmed with a `GET` to `host`.
    Confirmed {
        /// Host the confirmation was sent to.
        host: String,
    },
    /// A notification was surfaced to the operator.
    Notified {
        /// The notification text.
        message: String,
    },
    /// The message type is not handled; nothing was done.
    Ignored {
        /// The message type as received.
        message_type: String,
    },
}

/// Routes webhook deliveries to the confirm or notify handler.
#[derive(Debug)]
pub struct NotificationDispatcher<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> NotificationDispatcher<'a, T> {
    /// Create a dispatcher that sends confirmations through `transport`.
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Handle one raw delivery, exactly as read from the socket.
    pub async fn dispatch(&self, raw: &str) -> Result<DispatchOutcome, DispatchError> {
        let delivery = parse_message(raw)?;

        match SnsMessage::classify(&delivery)? {
            SnsMessage::SubscriptionConfirmation { subscribe_url } => {
                debug!("received SubscriptionConfirmation message");
                self.confirm_subscription(&subscribe_url).await
            }
            SnsMessage::Notification { message } => {
                debug!("received Notification message");
                info!("Message: {message}");
                Ok(DispatchOutcome::Notified { message })
            }
            SnsMessage::Unrecognized { message_type } => {
                debug!(message_type = %message_type, "received unrecognized message type");
                Ok(DispatchOutcome::Ignored { message_type })
            }
        }
    }

    /// Confirm a subscription with one unsigned `GET` of its `SubscribeURL`.
    ///
    /// The request always goes out as plain HTTP; the URL scheme only
    /// matters for an explicit port.
    async fn confirm_subscription(
        &self,
        subscribe_url: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let invalid = |reason: String| DispatchError::InvalidSubscribeUrl {
            url: subscribe_url.to_owned(),
            reason,
        };

        let url = Url::parse(subscribe_url).map_err(|e| invalid(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("no host".to_owned()))?
            .to_owned();
        // Resolvers take IPv6 literals without brackets.
        let connect_host = match url.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => host.clone(),
        };
        let port = url.port().unwrap_or(HTTP_PORT);

        let header_block = format_headers([("Host", host.as_str())]);
        let request = build_request("GET", url.path(), url.query().unwrap_or(""), &header_block);

        let response = self.transport.send(&connect_host, port, request).await?;
        match response.status_code() {
            Some(status) if (200..300).contains(&status) => {
                debug!(host = %host, status, "confirmed subscription to topic");
            }
            status => {
                warn!(host = %host, ?status, "subscription confirmation was not accepted");
            }
        }

        Ok(DispatchOutcome::Confirmed { host })
    }
}
