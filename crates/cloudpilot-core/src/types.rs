//! Common value types shared across services.

use std::fmt;

/// AWS region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region when none is configured or reported by the provider.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the provider's default region.
    ///
    /// The default region is special-cased in several S3 calls: bucket
    /// creation must not send a location constraint for it, and
    /// `GetBucketLocation` reports it as an empty constraint.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// The public static-website endpoint for a bucket hosted in this region.
    #[must_use]
    pub fn website_url(&self, bucket: &str) -> String {
        format!("http://{bucket}.s3-website-{}.amazonaws.com", self.0)
    }

    /// The static-website origin domain for a bucket hosted in this region,
    /// as used when fronting the site with a distribution.
    #[must_use]
    pub fn website_domain(&self, bucket: &str) -> String {
        format!("{bucket}.s3-website-{}.amazonaws.com", self.0)
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
