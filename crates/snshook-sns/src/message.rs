//! Classification of webhook deliveries.

use snshook_http::{HttpMessage, parse_json_body, string_field};

use crate::error::DispatchError;

/// Header carrying the SNS message type of a delivery.
pub const MESSAGE_TYPE_HEADER: &str = "x-amz-sns-message-type";

const SUBSCRIPTION_CONFIRMATION: &str = "SubscriptionConfirmation";
const NOTIFICATION: &str = "Notification";

/// A webhook delivery, classified by its message type header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnsMessage {
    /// SNS asks the endpoint to confirm a new subscription.
    SubscriptionConfirmation {
        /// URL to `GET` to confirm.
        subscribe_url: String,
    },
    /// A message published to the topic.
    Notification {
        /// The published message text.
        message: String,
    },
    /// Any other message type, e.g. `UnsubscribeConfirmation`.
    Unrecognized {
        /// The header value as received.
        message_type: String,
    },
}

impl SnsMessage {
    /// Classify a parsed delivery.
    ///
    /// The message type comes from the header alone; the body is only parsed
    /// for the two known types, and only the one field each of them needs.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingMessageType`] without the type header,
    /// or [`DispatchError::Body`] when the needed field cannot be extracted.
    pub fn classify(delivery: &HttpMessage) -> Result<Self, DispatchError> {
        let message_type = delivery
            .header(MESSAGE_TYPE_HEADER)
            .ok_or(DispatchError::MissingMessageType)?;

        match message_type {
            SUBSCRIPTION_CONFIRMATION => {
                let body = parse_json_body(&delivery.body)?;
                Ok(Self::SubscriptionConfirmation {
                    subscribe_url: string_field(&body, "SubscribeURL")?,
                })
            }
            NOTIFICATION => {
                let body = parse_json_body(&delivery.body)?;
                Ok(Self::Notification {
                    message: string_field(&body, "Message")?,
                })
            }
            other => Ok(Self::Unrecognized {
                message_type: other.to_owned(),
            }),
        }
    }
}
