//! The [`CloudPilot`] handler and its operation dispatch.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use cloudpilot_core::Config;
use cloudpilot_core::provider::{Compute, DistributionProvisioner, MetricsSource, ObjectStore};
use cloudpilot_deploy::WebsiteDeployer;
use cloudpilot_http::body::ApiBody;
use cloudpilot_http::dispatch::ApiHandler;
use cloudpilot_model::{ApiError, ApiOperation, ApiResult};

/// The CloudPilot handler: explicitly constructed provider handles plus the
/// deployment orchestrator. Cloning is cheap; every field is shared.
#[derive(Clone)]
pub struct CloudPilot {
    pub(crate) config: Config,
    pub(crate) store: Arc<dyn ObjectStore>,
    pub(crate) cdn: Arc<dyn DistributionProvisioner>,
    pub(crate) compute: Arc<dyn Compute>,
    pub(crate) metrics: Arc<dyn MetricsSource>,
    pub(crate) deployer: WebsiteDeployer,
}

impl std::fmt::Debug for CloudPilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudPilot")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CloudPilot {
    /// Wire a handler from configuration and provider handles.
    #[must_use]
    pub fn new(
        config: Config,
        store: Arc<dyn ObjectStore>,
        cdn: Arc<dyn DistributionProvisioner>,
        compute: Arc<dyn Compute>,
        metrics: Arc<dyn MetricsSource>,
    ) -> Self {
        let deployer = WebsiteDeployer::new(Arc::clone(&store))
            .with_cdn(Arc::clone(&cdn))
            .with_concurrency(config.upload_concurrency);

        Self {
            config,
            store,
            cdn,
            compute,
            metrics,
            deployer,
        }
    }

    /// Route one resolved operation to its handler method.
    async fn dispatch(
        self,
        op: ApiOperation,
        parts: http::request::Parts,
        body: Bytes,
    ) -> ApiResult<http::Response<ApiBody>> {
        match op {
            // Object storage
            ApiOperation::CreateBucket => self.create_bucket(&body).await,
            ApiOperation::ListBuckets => self.list_buckets().await,
            ApiOperation::BucketInfo => self.bucket_info(&parts).await,
            ApiOperation::UploadObject => self.upload_object(&parts, &body).await,
            ApiOperation::DeleteBucket => self.delete_bucket(&body).await,
            ApiOperation::ListObjects => self.list_objects(&parts).await,
            ApiOperation::UploadWebsite => self.upload_website(&parts, &body).await,
            ApiOperation::EnableStaticWebsite => self.enable_static_website(&body).await,
            ApiOperation::SetBucketPolicy => self.set_bucket_policy(&body).await,

            // Content delivery
            ApiOperation::CreateOriginAccessIdentity => {
                self.create_origin_access_identity(&body).await
            }
            ApiOperation::CreateDistribution => self.create_distribution(&body).await,
            ApiOperation::CreateDistributionForWebsite => {
                self.create_distribution_for_website(&body).await
            }

            // Compute
            ApiOperation::CreateInstance => self.create_instance(&body).await,
            ApiOperation::StartInstance => self.start_instance(&body).await,
            ApiOperation::StopInstance => self.stop_instance(&body).await,
            ApiOperation::TerminateInstance => self.terminate_instance(&body).await,
            ApiOperation::RebootInstance => self.reboot_instance(&body).await,
            ApiOperation::MonitorInstance => self.set_instance_monitoring(&body, true).await,
            ApiOperation::UnmonitorInstance => self.set_instance_monitoring(&body, false).await,
            ApiOperation::DescribeInstances => self.describe_instances().await,

            // Metrics
            ApiOperation::GetMetrics => self.get_metrics().await,
            ApiOperation::GetAlarms => self.get_alarms().await,
            ApiOperation::GetServiceHealth => self.get_service_health(),
            ApiOperation::GetInsights => self.get_insights().await,
        }
    }
}

impl ApiHandler for CloudPilot {
    fn handle_operation(
        &self,
        op: ApiOperation,
        parts: http::request::Parts,
        body: Bytes,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ApiBody>, ApiError>> + Send>> {
        let this = self.clone();
        Box::pin(async move { this.dispatch(op, parts, body).await })
    }
}

// ---------------------------------------------------------------------------
// Input helpers shared by the handler methods
// ---------------------------------------------------------------------------

/// Deserialize a JSON request body; an empty body reads as `{}` so
/// endpoints with only optional fields accept bare POSTs.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let raw: &[u8] = if body.is_empty() { b"{}" } else { body };
    serde_json::from_slice(raw)
        .map_err(|e| ApiError::invalid_request(format!("invalid JSON body: {e}")))
}

/// Require a non-empty string field.
pub(crate) fn require(value: Option<String>, field: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field(field))
}

/// Require a non-empty query parameter.
pub(crate) fn require_query(parts: &http::request::Parts, key: &str) -> ApiResult<String> {
    let params = cloudpilot_http::router::parse_query(parts.uri.query().unwrap_or(""));
    cloudpilot_http::router::query_value(&params, key)
        .filter(|v| !v.trim().is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| ApiError::missing_field(key))
}
