//! AWS Signature Version 4 signing.
//!
//! Signing one request takes a single clock read. From it come the
//! `x-amz-date` header and the scope date; the canonical request is hashed
//! into the string to sign, which is MACed with a key chained from the
//! secret through date, region, service and `aws4_request`.
//!
//! The main entry point is [`build_authorization_header`]; [`sign_request_at`]
//! does the same work against a caller-supplied instant.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{CanonicalRequest, SIGNED_HEADERS};
use crate::credentials::Credentials;

/// The only algorithm produced by this implementation.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Terminator of the credential scope and final input of the key chain.
const SCOPE_TERMINATOR: &str = "aws4_request";

type HmacSha256 = Hmac<Sha256>;

/// Everything the signer needs to know about one outbound request.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    /// HTTP method, e.g. `GET`.
    pub method: &'a str,
    /// Value of the `Host` header.
    pub host: &'a str,
    /// Region of the credential scope.
    pub region: &'a str,
    /// Service of the credential scope, e.g. `sns`.
    pub service: &'a str,
    /// Query string exactly as it will be sent, without the leading `?`.
    pub query_string: &'a str,
    /// Request body; empty unless set with [`SignableRequest::with_payload`].
    pub payload: &'a [u8],
}

impl<'a> SignableRequest<'a> {
    /// Describe a request with an empty payload.
    #[must_use]
    pub fn new(
        method: &'a str,
        host: &'a str,
        region: &'a str,
        service: &'a str,
        query_string: &'a str,
    ) -> Self {
        Self {
            method,
            host,
            region,
            service,
            query_string,
            payload: b"",
        }
    }

    /// Attach a request body to be covered by the payload hash.
    #[must_use]
    pub fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = payload;
        self
    }
}

/// The outcome of signing one request.
///
/// The caller must send `amz_date` verbatim as the `x-amz-date` header; the
/// signature only verifies against that exact timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Value for the `Authorization` header.
    pub authorization: String,
    /// Value for the `x-amz-date` header (`YYYYMMDDTHHMMSSZ`).
    pub amz_date: String,
    /// The canonical request the signature covers.
    pub canonical_request: String,
    /// The string to sign derived from the canonical request.
    pub string_to_sign: String,
    /// Hex-encoded signature.
    pub signature: String,
}

/// Compute HMAC-SHA256 of `message` under `key`.
///
/// # Examples
///
/// ```
/// let mac = snshook_auth::sign(b"key", "message");
/// assert_eq!(mac.len(), 32);
/// ```
#[must_use]
pub fn sign(key: &[u8], message: &str) -> [u8; 32] {
    hmac_sha256(key, message.as_bytes())
}

/// Chain the secret through the scope components into the signing key.
///
/// The order is fixed: `"AWS4" + secret`, then `date`, `region`, `service`
/// and finally `aws4_request`, each step keyed by the previous MAC.
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> [u8; 32] {
    let date_key = sign(format!("AWS4{secret_key}").as_bytes(), date);
    let date_region_key = sign(&date_key, region);
    let date_region_service_key = sign(&date_region_key, service);
    sign(&date_region_service_key, SCOPE_TERMINATOR)
}

/// Build the credential scope `date/region/service/aws4_request`.
#[must_use]
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Join algorithm, timestamp, scope and canonical request hash, one per line.
#[must_use]
pub fn build_string_to_sign(amz_date: &str, scope: &str, canonical_hash: &str) -> String {
    format!("{ALGORITHM}\n{amz_date}\n{scope}\n{canonical_hash}")
}

/// Hex MAC of the string to sign.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(sign(signing_key, data))
}

/// Hex SHA-256 of a request body; bodiless requests hash the empty string.
///
/// ```
/// use snshook_auth::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Sign `request` with the current UTC time.
///
/// The clock is read exactly once, so the timestamp and the scope date can
/// never straddle midnight.
#[must_use]
pub fn build_authorization_header(
    credentials: &Credentials,
    request: &SignableRequest<'_>,
) -> SignedRequest {
    sign_request_at(credentials, request, Utc::now())
}

/// Sign `request` as of the instant `now`.
#[must_use]
pub fn sign_request_at(
    credentials: &Credentials,
    request: &SignableRequest<'_>,
    now: DateTime<Utc>,
) -> SignedRequest {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = now.format("%Y%m%d").to_string();

    let payload_hash = hash_payload(request.payload);
    let canonical_request = CanonicalRequest {
        method: request.method,
        query_string: request.query_string,
        host: request.host,
        amz_date: &amz_date,
        payload_hash: &payload_hash,
    }
    .to_string();

    let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let scope = credential_scope(&date_stamp, request.region, request.service);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical_hash);

    debug!(
        method = request.method,
        host = request.host,
        region = request.region,
        service = request.service,
        amz_date = %amz_date,
        "signing request"
    );

    let signing_key = derive_signing_key(
        credentials.secret_key(),
        &date_stamp,
        request.region,
        request.service,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key_id(),
    );

    SignedRequest {
        authorization,
        amz_date,
        canonical_request,
        string_to_sign,
        signature,
    }
}

/// HMAC accepts keys of any length, so key setup cannot fail.
fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 takes keys of any length");
    mac.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}
