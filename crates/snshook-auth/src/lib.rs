//! AWS Signature Version 4 request signing for snshook.
//!
//! This crate implements the signing side of SigV4 for the narrow request
//! shape snshook sends to SNS: a `GET` (or other method) against `/` with a
//! query string, signing exactly the `host` and `x-amz-date` headers.
//!
//! # Usage
//!
//! ```rust
//! use snshook_auth::{Credentials, SignableRequest, build_authorization_header};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//! let request = SignableRequest::new(
//!     "GET",
//!     "sns.us-east-1.amazonaws.com",
//!     "us-east-1",
//!     "sns",
//!     "Action=ListTopics",
//! );
//! let signed = build_authorization_header(&credentials, &request);
//! assert!(signed.authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction and query encoding
//! - [`credentials`] - The access key pair used to sign
//! - [`sigv4`] - Key derivation, string to sign, and header assembly

pub mod canonical;
pub mod credentials;
pub mod sigv4;

pub use canonical::encode_query;
pub use credentials::Credentials;
pub use sigv4::{
    SignableRequest, SignedRequest, build_authorization_header, derive_signing_key, hash_payload,
    sign,
};
