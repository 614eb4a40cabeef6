//! The set of operations the API exposes.

use std::fmt;

/// Identifies one API operation, as resolved from the request method and
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    // Object storage
    /// Create a bucket.
    CreateBucket,
    /// List all buckets.
    ListBuckets,
    /// Aggregate size and object count for a bucket.
    BucketInfo,
    /// Upload a single object.
    UploadObject,
    /// Delete a bucket and its contents.
    DeleteBucket,
    /// List the objects in a bucket.
    ListObjects,
    /// Deploy a website archive into a bucket.
    UploadWebsite,
    /// Enable static-website hosting on a bucket.
    EnableStaticWebsite,
    /// Attach an identity-scoped read policy to a bucket.
    SetBucketPolicy,

    // Content delivery
    /// Create an origin access identity.
    CreateOriginAccessIdentity,
    /// Create a distribution for an identity-scoped bucket.
    CreateDistribution,
    /// Create a distribution for a bucket's website endpoint.
    CreateDistributionForWebsite,

    // Compute
    /// Launch an instance.
    CreateInstance,
    /// Start a stopped instance.
    StartInstance,
    /// Stop a running instance.
    StopInstance,
    /// Terminate an instance.
    TerminateInstance,
    /// Reboot an instance.
    RebootInstance,
    /// Enable detailed monitoring on an instance.
    MonitorInstance,
    /// Disable detailed monitoring on an instance.
    UnmonitorInstance,
    /// Describe all instances.
    DescribeInstances,

    // Metrics
    /// Retrieve the standard metric dashboard series.
    GetMetrics,
    /// List configured alarms.
    GetAlarms,
    /// Report per-service health.
    GetServiceHealth,
    /// Compute utilization insights.
    GetInsights,
}

impl ApiOperation {
    /// Operation name as a static string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateBucket => "CreateBucket",
            Self::ListBuckets => "ListBuckets",
            Self::BucketInfo => "BucketInfo",
            Self::UploadObject => "UploadObject",
            Self::DeleteBucket => "DeleteBucket",
            Self::ListObjects => "ListObjects",
            Self::UploadWebsite => "UploadWebsite",
            Self::EnableStaticWebsite => "EnableStaticWebsite",
            Self::SetBucketPolicy => "SetBucketPolicy",
            Self::CreateOriginAccessIdentity => "CreateOriginAccessIdentity",
            Self::CreateDistribution => "CreateDistribution",
            Self::CreateDistributionForWebsite => "CreateDistributionForWebsite",
            Self::CreateInstance => "CreateInstance",
            Self::StartInstance => "StartInstance",
            Self::StopInstance => "StopInstance",
            Self::TerminateInstance => "TerminateInstance",
            Self::RebootInstance => "RebootInstance",
            Self::MonitorInstance => "MonitorInstance",
            Self::UnmonitorInstance => "UnmonitorInstance",
            Self::DescribeInstances => "DescribeInstances",
            Self::GetMetrics => "GetMetrics",
            Self::GetAlarms => "GetAlarms",
            Self::GetServiceHealth => "GetServiceHealth",
            Self::GetInsights => "GetInsights",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_operation_name() {
        assert_eq!(ApiOperation::UploadWebsite.to_string(), "UploadWebsite");
        assert_eq!(ApiOperation::GetMetrics.as_str(), "GetMetrics");
    }
}
