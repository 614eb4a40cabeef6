//! The website deployment handler.

use tracing::info;

use cloudpilot_deploy::{
    AccessMode, BucketTarget, DeployError, DeploymentRequest, DeploymentResult,
};
use cloudpilot_http::body::ApiBody;
use cloudpilot_http::response::ok_json;
use cloudpilot_model::output::{UploadFailure, UploadWebsiteResponse};
use cloudpilot_model::{ApiError, ApiErrorCode, ApiResult};

use crate::handler::{CloudPilot, require};
use crate::ops::storage::parse_form;

impl CloudPilot {
    /// `POST /s3/upload_website`
    ///
    /// Runs the full deployment pipeline: bucket setup, unpack, per-file
    /// uploads, hosting configuration, policy attachment, and optionally a
    /// fronting distribution when the form carries `with_distribution=true`.
    pub(crate) async fn upload_website(
        &self,
        parts: &http::request::Parts,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let form = parse_form(parts, body)?;
        let Some(file) = form.file("website") else {
            return Err(ApiError::invalid_request("No website file provided"));
        };
        let bucket = require(form.field("bucket_name").map(ToOwned::to_owned), "bucket_name")?;

        let mut target = BucketTarget::new(&bucket, self.config.default_region.clone());
        if let Some(index) = form.field("index_document") {
            target.index_document = index.to_owned();
        }
        if let Some(error) = form.field("error_document") {
            target.error_document = error.to_owned();
        }

        let request = DeploymentRequest {
            archive: file.data.clone(),
            archive_name: Some(
                file.filename
                    .clone()
                    .unwrap_or_else(|| "website.zip".to_owned()),
            ),
            target,
            access: AccessMode::PublicRead,
            attach_distribution: form.field("with_distribution") == Some("true"),
        };

        // A client disconnect must not cancel in-flight uploads; the
        // deployment runs on the runtime and is awaited from here.
        let deployer = self.deployer.clone();
        let result = tokio::spawn(async move { deployer.deploy(request).await })
            .await
            .map_err(|e| ApiError::internal(format!("deployment task failed: {e}")))?
            .map_err(deploy_error_to_api)?;

        info!(
            bucket = %result.bucket,
            uploaded = result.uploaded_paths.len(),
            failed = result.failures.len(),
            "website deployment finished",
        );
        Ok(ok_json(&deployment_response(result)))
    }
}

/// Map a fatal deployment error to its API error.
fn deploy_error_to_api(err: DeployError) -> ApiError {
    match &err {
        DeployError::Archive(cloudpilot_deploy::ArchiveError::Corrupt(_)) => {
            ApiError::new(ApiErrorCode::ArchiveCorrupt, err.to_string())
        }
        DeployError::Archive(cloudpilot_deploy::ArchiveError::Io(_)) => {
            ApiError::internal(err.to_string())
        }
        DeployError::Stage { .. } => ApiError::new(ApiErrorCode::ProviderFailure, err.to_string()),
    }
}

/// Shape a deployment result into the endpoint's response.
fn deployment_response(result: DeploymentResult) -> UploadWebsiteResponse {
    UploadWebsiteResponse {
        message: "Website uploaded successfully".to_owned(),
        files: result.uploaded_paths,
        bucket: result.bucket,
        website_url: result.website_url,
        policy_applied: result.policy_applied,
        failures: result
            .failures
            .into_iter()
            .map(|outcome| UploadFailure {
                path: outcome.path,
                content_type: outcome.content_type,
                error: outcome.error_detail.unwrap_or_default(),
            })
            .collect(),
        distribution: result.distribution,
        distribution_warning: result.distribution_warning,
    }
}
