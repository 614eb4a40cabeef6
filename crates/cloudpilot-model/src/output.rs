//! Typed response outputs.
//!
//! Each struct serializes to the exact JSON shape the API emits. The compute
//! surface keeps the provider's PascalCase keys; everything else is
//! snake_case.

use serde::Serialize;

use cloudpilot_core::provider::{
    AlarmSummary, BucketSummary, DistributionSummary, MetricData, ObjectSummary,
};

/// A bare `{"message": ...}` response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Object storage
// ---------------------------------------------------------------------------

/// Response for `GET /s3/list_buckets`.
#[derive(Debug, Clone, Serialize)]
pub struct ListBucketsResponse {
    /// All buckets.
    pub buckets: Vec<BucketSummary>,
}

/// Response for `GET /s3/bucket_info`.
#[derive(Debug, Clone, Serialize)]
pub struct BucketInfoResponse {
    /// The queried bucket.
    pub bucket_name: String,
    /// Total size of all objects, in bytes.
    pub size: i64,
    /// Number of objects.
    pub objects: usize,
}

/// Response for `POST /s3/upload`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadObjectResponse {
    /// Confirmation message.
    pub message: String,
    /// Public URL of the uploaded object.
    pub url: String,
    /// The key the object was stored under.
    pub filename: String,
}

/// Response for `GET /s3/list_objects`.
#[derive(Debug, Clone, Serialize)]
pub struct ListObjectsResponse {
    /// The queried bucket.
    pub bucket_name: String,
    /// Objects, newest first.
    pub objects: Vec<ObjectSummary>,
}

/// One failed upload in a website deployment.
#[derive(Debug, Clone, Serialize)]
pub struct UploadFailure {
    /// Object key the upload targeted.
    pub path: String,
    /// Media type the file was classified as.
    pub content_type: String,
    /// The store's error message.
    pub error: String,
}

/// Response for `POST /s3/upload_website`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadWebsiteResponse {
    /// Confirmation message.
    pub message: String,
    /// Successfully uploaded keys, in archive encounter order.
    pub files: Vec<String>,
    /// The deployed bucket.
    pub bucket: String,
    /// Public website URL.
    pub website_url: String,
    /// Whether the access policy was attached.
    pub policy_applied: bool,
    /// Per-file failures, in archive encounter order.
    pub failures: Vec<UploadFailure>,
    /// The created distribution, when one was requested and provisioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionSummary>,
    /// Warning recorded when distribution provisioning failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_warning: Option<String>,
}

/// Response for `POST /s3/enable_static_website`.
#[derive(Debug, Clone, Serialize)]
pub struct EnableStaticWebsiteResponse {
    /// Confirmation message.
    pub message: String,
    /// Public website URL.
    pub website_url: String,
}

// ---------------------------------------------------------------------------
// Content delivery
// ---------------------------------------------------------------------------

/// Response for `POST /create_cloudfront_oai`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOaiResponse {
    /// Identity ID.
    #[serde(rename = "Id")]
    pub id: String,
    /// Canonical user ID used as a policy principal.
    #[serde(rename = "S3CanonicalUserId")]
    pub s3_canonical_user_id: String,
    /// Identity comment.
    #[serde(rename = "Comment")]
    pub comment: String,
}

/// Response for `POST /create_cloudfront_distribution`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDistributionResponse {
    /// Confirmation message.
    pub message: String,
    /// Public distribution domain.
    #[serde(rename = "DistributionDomain")]
    pub distribution_domain: String,
}

/// Response for `POST /cloudfront/create_distribution_for_website`.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionForWebsiteResponse {
    /// Confirmation message.
    pub message: String,
    /// Public distribution domain.
    pub distribution_domain: String,
    /// Distribution ID.
    pub distribution_id: String,
    /// Deployment status reported by the provider.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

/// Response for `POST /create_instance`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateInstanceResponse {
    /// Confirmation message.
    pub message: String,
    /// The launched instance.
    #[serde(rename = "InstanceId")]
    pub instance_id: String,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// One labeled metric series, in the dashboard's shape.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledSeries {
    /// Display label.
    #[serde(rename = "Label")]
    pub label: String,
    /// Data point timestamps (RFC 3339).
    #[serde(rename = "Timestamps")]
    pub timestamps: Vec<String>,
    /// Data point values.
    #[serde(rename = "Values")]
    pub values: Vec<f64>,
}

impl LabeledSeries {
    /// Attach a display label to retrieved metric data.
    #[must_use]
    pub fn new(label: impl Into<String>, data: MetricData) -> Self {
        Self {
            label: label.into(),
            timestamps: data.timestamps,
            values: data.values,
        }
    }
}

/// Response for `GET /cloudwatch/get_metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    /// Compute series.
    pub ec2_metrics: Vec<LabeledSeries>,
    /// Storage series.
    pub s3_metrics: Vec<LabeledSeries>,
    /// Content-delivery series.
    pub cloudfront_metrics: Vec<LabeledSeries>,
}

/// Response for `GET /cloudwatch/get_alarms`.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmsResponse {
    /// Configured alarms.
    pub alarms: Vec<AlarmSummary>,
}

/// Health numbers for one service.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthNumbers {
    /// Availability percentage.
    pub availability: f64,
    /// Latency in milliseconds.
    pub latency: f64,
    /// Error rate percentage.
    pub errors: f64,
}

/// Health snapshot for one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Health status string.
    pub status: String,
    /// Snapshot timestamp (RFC 3339).
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    /// Health numbers.
    pub metrics: HealthNumbers,
}

/// Per-service health map.
#[derive(Debug, Clone, Serialize)]
pub struct HealthMetrics {
    /// Compute health.
    #[serde(rename = "EC2")]
    pub ec2: ServiceHealth,
    /// Storage health.
    #[serde(rename = "S3")]
    pub s3: ServiceHealth,
    /// Content-delivery health.
    #[serde(rename = "CloudFront")]
    pub cloudfront: ServiceHealth,
}

/// Response for `GET /cloudwatch/get_service_health`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthResponse {
    /// Per-service health.
    pub health_metrics: HealthMetrics,
}

/// Aggregates over the insight window.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PerformanceSummary {
    /// Mean CPU utilization.
    pub avg_cpu: f64,
    /// Peak CPU utilization.
    pub max_cpu: f64,
    /// Total network-in bytes.
    pub total_network: f64,
}

/// Response for `GET /cloudwatch/get_insights`.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsResponse {
    /// Aggregates over the window.
    pub performance_summary: PerformanceSummary,
    /// Detected anomalies.
    pub anomalies: Vec<String>,
    /// Utilization recommendations.
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_upload_website_response_keys() {
        let response = UploadWebsiteResponse {
            message: "Website uploaded successfully".to_owned(),
            files: vec!["index.html".to_owned()],
            bucket: "demo-site".to_owned(),
            website_url: "http://demo-site.s3-website-us-east-1.amazonaws.com".to_owned(),
            policy_applied: true,
            failures: Vec::new(),
            distribution: None,
            distribution_warning: None,
        };

        let value = serde_json::to_value(&response).expect("serializes");
        assert_eq!(value["files"][0], "index.html");
        assert_eq!(value["policy_applied"], true);
        assert!(value.get("distribution").is_none());
    }

    #[test]
    fn test_should_serialize_compute_keys_in_provider_casing() {
        let response = CreateInstanceResponse {
            message: "Instance created".to_owned(),
            instance_id: "i-0abc".to_owned(),
        };

        let value = serde_json::to_value(&response).expect("serializes");
        assert_eq!(value["InstanceId"], "i-0abc");
    }

    #[test]
    fn test_should_serialize_labeled_series_in_dashboard_shape() {
        let series = LabeledSeries::new(
            "CPU Utilization",
            MetricData {
                timestamps: vec!["2026-01-01T00:00:00Z".to_owned()],
                values: vec![42.0],
            },
        );

        let value = serde_json::to_value(&series).expect("serializes");
        assert_eq!(value["Label"], "CPU Utilization");
        assert_eq!(value["Values"][0], 42.0);
    }

    #[test]
    fn test_should_serialize_oai_response_keys() {
        let response = CreateOaiResponse {
            id: "OAI1".to_owned(),
            s3_canonical_user_id: "canon".to_owned(),
            comment: "c".to_owned(),
        };

        let value = serde_json::to_value(&response).expect("serializes");
        assert_eq!(value["Id"], "OAI1");
        assert_eq!(value["S3CanonicalUserId"], "canon");
    }
}
