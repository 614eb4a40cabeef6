//! Typed request inputs.
//!
//! JSON-body inputs derive `Deserialize` directly; required-field validation
//! beyond presence (e.g. non-empty bucket names) happens in the handlers so
//! the error message can name the field the way the API always has.

use serde::Deserialize;

/// Input for `POST /s3/create_bucket`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBucketInput {
    /// Bucket to create.
    pub bucket_name: Option<String>,
    /// Region to create the bucket in; the configured default when absent.
    pub region: Option<String>,
}

/// Input for operations addressing one bucket
/// (`/s3/delete_bucket`, `/cloudfront/create_distribution_for_website`).
#[derive(Debug, Clone, Deserialize)]
pub struct BucketInput {
    /// Target bucket.
    pub bucket_name: Option<String>,
}

/// Input for `POST /s3/enable_static_website`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnableStaticWebsiteInput {
    /// Target bucket.
    pub bucket_name: Option<String>,
    /// Index document; `index.html` when absent.
    pub index_document: Option<String>,
    /// Error document; `error.html` when absent.
    pub error_document: Option<String>,
}

/// Input for `POST /set_s3_bucket_policy`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetBucketPolicyInput {
    /// Target bucket.
    pub bucket_name: Option<String>,
    /// Origin access identity granted read access.
    pub oai_id: Option<String>,
}

/// Input for `POST /create_cloudfront_oai`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOaiInput {
    /// Identity comment.
    pub comment: Option<String>,
}

/// Input for `POST /create_cloudfront_distribution`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDistributionInput {
    /// Origin bucket.
    pub bucket_name: Option<String>,
    /// Origin access identity scoping reads to the distribution.
    pub oai_id: Option<String>,
}

/// Input for `POST /create_instance`. Field names follow the provider's
/// PascalCase convention.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInstanceInput {
    /// Machine image; the configured default when absent.
    #[serde(rename = "ImageId")]
    pub image_id: Option<String>,
    /// Instance type; the configured default when absent.
    #[serde(rename = "InstanceType")]
    pub instance_type: Option<String>,
    /// Key pair name; the configured default when absent.
    #[serde(rename = "KeyName")]
    pub key_name: Option<String>,
}

/// Input for the single-instance lifecycle operations.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceInput {
    /// Target instance.
    #[serde(rename = "InstanceId")]
    pub instance_id: Option<String>,
}
