//! AWS identifiers used across snshook.

use std::fmt;

/// AWS Region identifier, e.g. `us-east-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Wrap a region name. Names are not checked against a known list.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// The region name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SNS topic ARN (`arn:<partition>:sns:<region>:<account>:<name>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicArn(String);

impl TopicArn {
    /// Parse a topic ARN.
    ///
    /// # Errors
    /// Returns the rejection reason if the value does not have the six
    /// colon-separated ARN fields with service `sns`.
    pub fn new(arn: impl Into<String>) -> Result<Self, String> {
        let arn = arn.into();
        let parts: Vec<&str> = arn.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" {
            return Err(format!("{arn} is not an ARN"));
        }
        if parts[2] != "sns" {
            return Err(format!("{arn} is not an SNS ARN"));
        }
        if parts[5].is_empty() {
            return Err(format!("{arn} has no topic name"));
        }
        Ok(Self(arn))
    }

    /// The full ARN.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The region field of the ARN.
    #[must_use]
    pub fn region(&self) -> &str {
        self.0.split(':').nth(3).unwrap_or_default()
    }
}

impl fmt::Display for TopicArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
