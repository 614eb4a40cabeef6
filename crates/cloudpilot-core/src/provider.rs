//! Collaborator contracts for the cloud provider services.
//!
//! CloudPilot never talks to the provider through ambient globals: every
//! handler and the deployment orchestrator receive explicitly constructed
//! `Arc<dyn Trait>` handles, so tests can substitute in-memory fakes. The
//! AWS-backed implementations live in `cloudpilot-aws`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ProviderResult;
use crate::types::AwsRegion;

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

/// Summary of a bucket, as returned by a bucket listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Creation timestamp (RFC 3339).
    pub creation_date: Option<String>,
}

/// Summary of a stored object, as returned by an object listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: i64,
    /// Last-modified timestamp (RFC 3339).
    pub last_modified: Option<String>,
}

/// Aggregate size and object count for a bucket.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct BucketStats {
    /// Total size of all objects, in bytes.
    pub size_bytes: i64,
    /// Number of objects.
    pub object_count: usize,
}

/// Object storage collaborator: put/list/delete objects in a named bucket,
/// create/configure buckets, and attach bucket policies.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create a bucket in the given region.
    async fn create_bucket(&self, bucket: &str, region: &AwsRegion) -> ProviderResult<()>;

    /// Whether the bucket exists and is accessible.
    async fn bucket_exists(&self, bucket: &str) -> ProviderResult<bool>;

    /// Delete a bucket, removing any remaining contents first.
    async fn delete_bucket(&self, bucket: &str) -> ProviderResult<()>;

    /// List all buckets.
    async fn list_buckets(&self) -> ProviderResult<Vec<BucketSummary>>;

    /// List the objects in a bucket.
    async fn list_objects(&self, bucket: &str) -> ProviderResult<Vec<ObjectSummary>>;

    /// Total size and object count for a bucket, paging through all objects.
    async fn bucket_stats(&self, bucket: &str) -> ProviderResult<BucketStats>;

    /// The region a bucket lives in.
    async fn bucket_location(&self, bucket: &str) -> ProviderResult<AwsRegion>;

    /// Store an object under the given key with the given media type.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> ProviderResult<()>;

    /// Enable static-website hosting on a bucket.
    async fn put_bucket_website(
        &self,
        bucket: &str,
        index_document: &str,
        error_document: &str,
    ) -> ProviderResult<()>;

    /// Replace the bucket policy with the given policy document.
    async fn put_bucket_policy(&self, bucket: &str, policy_json: &str) -> ProviderResult<()>;
}

// ---------------------------------------------------------------------------
// Content delivery
// ---------------------------------------------------------------------------

/// A provider-managed origin access identity.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OriginAccessIdentity {
    /// Identity ID.
    pub id: String,
    /// Canonical user ID used as the policy principal.
    pub canonical_user_id: String,
    /// Free-form comment.
    pub comment: String,
}

/// The origin shape a distribution points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionOrigin {
    /// The bucket's public static-website endpoint (custom HTTP origin).
    Website,
    /// The bucket's REST endpoint, read through an access identity.
    BucketWithIdentity {
        /// The origin access identity granted read access.
        access_identity_id: String,
    },
}

/// Parameters for creating a content-delivery distribution.
#[derive(Debug, Clone)]
pub struct DistributionRequest {
    /// Origin domain name.
    pub origin_domain: String,
    /// Origin shape.
    pub origin: DistributionOrigin,
    /// Distribution comment.
    pub comment: String,
    /// Object served for the root URL, if any.
    pub default_root_object: Option<String>,
}

/// Summary of a created distribution.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DistributionSummary {
    /// Distribution ID.
    pub id: String,
    /// Public distribution domain name.
    pub domain_name: String,
    /// Deployment status reported by the provider.
    pub status: String,
}

/// Content-delivery collaborator: origin access identities and distributions.
#[async_trait]
pub trait DistributionProvisioner: Send + Sync {
    /// Create an origin access identity.
    async fn create_origin_access_identity(
        &self,
        comment: &str,
    ) -> ProviderResult<OriginAccessIdentity>;

    /// Look up an existing origin access identity by ID.
    async fn origin_access_identity(&self, id: &str) -> ProviderResult<OriginAccessIdentity>;

    /// Create a distribution for the given origin.
    async fn create_distribution(
        &self,
        request: DistributionRequest,
    ) -> ProviderResult<DistributionSummary>;
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

/// Parameters for launching a compute instance.
#[derive(Debug, Clone)]
pub struct RunInstanceRequest {
    /// Machine image ID.
    pub image_id: String,
    /// Instance type.
    pub instance_type: String,
    /// Key pair name, if any.
    pub key_name: Option<String>,
}

/// Lifecycle state of a compute instance.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceState {
    /// State name (e.g. `running`, `stopped`).
    pub name: String,
    /// Numeric state code.
    pub code: i32,
}

/// A key/value resource tag.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceTag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// A security group attached to an instance.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupRef {
    /// Security group ID.
    pub group_id: String,
    /// Security group name.
    pub group_name: String,
}

/// Details of a compute instance, serialized with the provider's field names.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceDetails {
    /// Instance ID.
    pub instance_id: String,
    /// Instance type.
    pub instance_type: String,
    /// Lifecycle state.
    pub state: InstanceState,
    /// Public IP address, empty when unassigned.
    pub public_ip_address: String,
    /// Private IP address, empty when unassigned.
    pub private_ip_address: String,
    /// Launch timestamp (RFC 3339).
    pub launch_time: String,
    /// Value of the `Name` tag, empty when untagged.
    pub name: String,
    /// Platform, defaulting to `linux`.
    pub platform: String,
    /// CPU architecture.
    pub architecture: String,
    /// VPC ID, empty when not in a VPC.
    pub vpc_id: String,
    /// Subnet ID, empty when not in a subnet.
    pub subnet_id: String,
    /// Attached security groups.
    pub security_groups: Vec<SecurityGroupRef>,
    /// All resource tags.
    pub tags: Vec<ResourceTag>,
}

/// Compute collaborator: single-call instance lifecycle operations.
#[async_trait]
pub trait Compute: Send + Sync {
    /// Launch a single instance and return its ID.
    async fn run_instance(&self, request: RunInstanceRequest) -> ProviderResult<String>;

    /// Describe all instances.
    async fn describe_instances(&self) -> ProviderResult<Vec<InstanceDetails>>;

    /// Current lifecycle state of one instance.
    async fn instance_state(&self, instance_id: &str) -> ProviderResult<InstanceState>;

    /// Start a stopped instance.
    async fn start_instance(&self, instance_id: &str) -> ProviderResult<()>;

    /// Stop a running instance.
    async fn stop_instance(&self, instance_id: &str) -> ProviderResult<()>;

    /// Terminate an instance.
    async fn terminate_instance(&self, instance_id: &str) -> ProviderResult<()>;

    /// Reboot an instance.
    async fn reboot_instance(&self, instance_id: &str) -> ProviderResult<()>;

    /// Enable or disable detailed monitoring for an instance.
    async fn set_monitoring(&self, instance_id: &str, enabled: bool) -> ProviderResult<()>;
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A metric data query.
#[derive(Debug, Clone)]
pub struct MetricQuery {
    /// Metric namespace (e.g. `AWS/EC2`).
    pub namespace: String,
    /// Metric name (e.g. `CPUUtilization`).
    pub metric_name: String,
    /// Aggregation period in seconds.
    pub period_seconds: i32,
    /// Statistic to retrieve (e.g. `Average`, `Sum`).
    pub stat: String,
    /// Size of the trailing query window, in hours.
    pub window_hours: i64,
}

/// A retrieved metric series.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricData {
    /// Data point timestamps (RFC 3339), oldest first.
    pub timestamps: Vec<String>,
    /// Data point values, aligned with `timestamps`.
    pub values: Vec<f64>,
}

/// Summary of a configured alarm.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AlarmSummary {
    /// Alarm name.
    pub name: String,
    /// Alarm description, if any.
    pub description: Option<String>,
    /// Metric the alarm watches.
    pub metric_name: Option<String>,
    /// Namespace of the watched metric.
    pub namespace: Option<String>,
    /// Current alarm state.
    pub state: String,
    /// Reason for the current state, if reported.
    pub state_reason: Option<String>,
}

/// Metrics collaborator: single-call metric and alarm retrieval.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Retrieve one metric series.
    async fn metric_series(&self, query: &MetricQuery) -> ProviderResult<MetricData>;

    /// List configured alarms.
    async fn alarms(&self) -> ProviderResult<Vec<AlarmSummary>>;
}
