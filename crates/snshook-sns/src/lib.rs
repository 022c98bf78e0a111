//! SNS client, webhook listener, and notification dispatch for snshook.
//!
//! [`Endpoint`] is the piece that touches sockets: it sends SigV4-signed
//! requests to SNS (`ListTopics`, `Subscribe`) and runs the accept loop that
//! receives webhook deliveries. Each delivery is acknowledged with a fixed
//! `200 OK` and then handed to [`NotificationDispatcher`], which classifies it
//! by its `x-amz-sns-message-type` header and either confirms the
//! subscription or surfaces the notification text.
//!
//! All outbound traffic goes through the [`Transport`] trait so the
//! dispatcher and endpoint can be exercised without a network.

pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod response;
pub mod transport;

pub use dispatch::{DispatchOutcome, NotificationDispatcher};
pub use endpoint::{Endpoint, EndpointSettings};
pub use error::{DispatchError, EndpointError, ResponseError, TransportError};
pub use message::{MESSAGE_TYPE_HEADER, SnsMessage};
pub use transport::{HTTP_PORT, TcpTransport, Transport};
