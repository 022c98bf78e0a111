//! Error types for the snshook core.

/// Configuration error. Every variant is fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required configuration variable: {0}")]
    Missing(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("invalid value for {var}: {reason}")]
    Invalid {
        /// The offending variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Convenience result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
