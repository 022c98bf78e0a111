//! Core types and configuration for snshook.
//!
//! This crate holds the pieces shared by every other snshook crate: the
//! environment-driven [`HookConfig`], the AWS identifiers the tool passes
//! around ([`AwsRegion`], [`TopicArn`]), and the configuration error type.

mod config;
mod error;
mod types;

pub use config::HookConfig;
pub use error::{ConfigError, ConfigResult};
pub use types::{AwsRegion, TopicArn};
