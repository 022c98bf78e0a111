//! The access key pair used to sign outbound requests.

use std::fmt;

/// An AWS access key ID and its secret.
///
/// Immutable once built. The secret is never rendered by `Debug`, so a
/// `Credentials` value can sit inside structs that get logged.
///
/// # Examples
///
/// ```
/// use snshook_auth::Credentials;
///
/// let credentials = Credentials::new("AKIDEXAMPLE", "secret");
/// assert_eq!(credentials.access_key_id(), "AKIDEXAMPLE");
/// assert!(!format!("{credentials:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_key: String,
}

impl Credentials {
    /// Create credentials from an access key ID and secret key.
    pub fn new(access_key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The access key ID, as it appears in the `Credential=` component.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
