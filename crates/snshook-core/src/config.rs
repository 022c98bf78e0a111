//! Configuration management for snshook.
//!
//! All configuration is driven by environment variables. Unlike optional
//! tuning knobs, most values here are required: a missing or malformed value
//! is reported as a [`ConfigError`] and the process must not start.

use std::fmt;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{AwsRegion, TopicArn};

/// Listen address used when `LISTEN_HOST` is unset.
const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";

/// Runtime configuration for the snshook binary.
#[derive(Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Log level filter.
    pub log_level: String,
    /// Address the webhook listener binds to.
    pub listen_host: String,
    /// Port the webhook listener binds to.
    pub listen_port: u16,
    /// SNS endpoint host, e.g. `sns.us-east-1.amazonaws.com`.
    pub sns_host: String,
    /// Region used in the SigV4 credential scope.
    pub sns_region: AwsRegion,
    /// Topic that `--subscribe` subscribes to.
    pub topic_arn: TopicArn,
    /// AWS access key ID.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_key: String,
}

impl fmt::Debug for HookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookConfig")
            .field("log_level", &self.log_level)
            .field("listen_host", &self.listen_host)
            .field("listen_port", &self.listen_port)
            .field("sns_host", &self.sns_host)
            .field("sns_region", &self.sns_region)
            .field("topic_arn", &self.topic_arn)
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl HookConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let listen_port = require("LISTEN_PORT")?;
        let listen_port = listen_port
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                var: "LISTEN_PORT",
                reason: format!("{listen_port}: {e}"),
            })?;

        let topic_arn = TopicArn::new(require("SNS_TOPIC_ARN")?).map_err(|reason| {
            ConfigError::Invalid {
                var: "SNS_TOPIC_ARN",
                reason,
            }
        })?;

        let secret_key = get("AWS_SECRET_KEY")
            .or_else(|| get("AWS_SECRET_ACCESS_KEY"))
            .ok_or(ConfigError::Missing("AWS_SECRET_KEY"))?;

        Ok(Self {
            log_level: require("LOG_LEVEL")?,
            listen_host: get("LISTEN_HOST").unwrap_or_else(|| DEFAULT_LISTEN_HOST.to_owned()),
            listen_port,
            sns_host: require("SNS_HOST")?,
            sns_region: AwsRegion::new(require("SNS_REGION")?),
            topic_arn,
            access_key_id: require("AWS_ACCESS_KEY_ID")?,
            secret_key,
        })
    }
}
