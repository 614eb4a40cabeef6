//! Content delivery handlers.

use tracing::info;

use cloudpilot_core::provider::{DistributionOrigin, DistributionRequest};
use cloudpilot_http::body::ApiBody;
use cloudpilot_http::response::{created_json, ok_json};
use cloudpilot_model::input::{BucketInput, CreateDistributionInput, CreateOaiInput};
use cloudpilot_model::output::{
    CreateDistributionResponse, CreateOaiResponse, DistributionForWebsiteResponse,
};
use cloudpilot_model::ApiResult;

use crate::handler::{CloudPilot, parse_json, require};

impl CloudPilot {
    /// `POST /create_cloudfront_oai`
    pub(crate) async fn create_origin_access_identity(
        &self,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let input: CreateOaiInput = parse_json(body)?;
        let comment = input
            .comment
            .unwrap_or_else(|| "Default OAI Comment".to_owned());

        let identity = self.cdn.create_origin_access_identity(&comment).await?;
        info!(oai_id = %identity.id, "created origin access identity");
        Ok(created_json(&CreateOaiResponse {
            id: identity.id,
            s3_canonical_user_id: identity.canonical_user_id,
            comment: identity.comment,
        }))
    }

    /// `POST /create_cloudfront_distribution`
    pub(crate) async fn create_distribution(
        &self,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let input: CreateDistributionInput = parse_json(body)?;
        let bucket = require(input.bucket_name, "bucket_name")?;
        let oai_id = require(input.oai_id, "oai_id")?;

        let summary = self
            .cdn
            .create_distribution(DistributionRequest {
                origin_domain: format!("{bucket}.s3.amazonaws.com"),
                origin: DistributionOrigin::BucketWithIdentity {
                    access_identity_id: oai_id,
                },
                comment: format!("CloudFront Distribution for {bucket}"),
                default_root_object: None,
            })
            .await?;

        info!(bucket = %bucket, distribution_id = %summary.id, "created identity distribution");
        Ok(created_json(&CreateDistributionResponse {
            message: format!("CloudFront distribution created for {bucket}"),
            distribution_domain: summary.domain_name,
        }))
    }

    /// `POST /cloudfront/create_distribution_for_website`
    pub(crate) async fn create_distribution_for_website(
        &self,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let input: BucketInput = parse_json(body)?;
        let bucket = require(input.bucket_name, "bucket_name")?;

        let region = self.store.bucket_location(&bucket).await?;
        let summary = self
            .cdn
            .create_distribution(DistributionRequest {
                origin_domain: region.website_domain(&bucket),
                origin: DistributionOrigin::Website,
                comment: format!("Distribution for {bucket} website"),
                default_root_object: Some("index.html".to_owned()),
            })
            .await?;

        info!(bucket = %bucket, distribution_id = %summary.id, "created website distribution");
        Ok(ok_json(&DistributionForWebsiteResponse {
            message: "CloudFront distribution created successfully".to_owned(),
            distribution_domain: summary.domain_name,
            distribution_id: summary.id,
            status: summary.status,
        }))
    }
}
