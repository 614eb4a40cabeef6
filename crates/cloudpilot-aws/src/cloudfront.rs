//! CloudFront-backed distribution provisioner.

use async_trait::async_trait;
use aws_sdk_cloudfront::types::{
    AllowedMethods, CachedMethods, CloudFrontOriginAccessIdentityConfig, CookiePreference,
    CustomOriginConfig, DefaultCacheBehavior, DistributionConfig, ForwardedValues, HttpVersion,
    ItemSelection, Method, Origin, OriginProtocolPolicy, Origins, PriceClass, S3OriginConfig,
    TrustedSigners, ViewerProtocolPolicy,
};
use tracing::debug;
use uuid::Uuid;

use cloudpilot_core::provider::{
    DistributionOrigin, DistributionProvisioner, DistributionRequest, DistributionSummary,
    OriginAccessIdentity,
};
use cloudpilot_core::{ProviderError, ProviderResult};

use crate::error::{build_error, sdk_error};

/// Origin ID used for website-endpoint origins.
const WEBSITE_ORIGIN_ID: &str = "S3Origin";

/// Distribution provisioner backed by the AWS CloudFront API.
#[derive(Debug, Clone)]
pub struct AwsDistributionProvisioner {
    client: aws_sdk_cloudfront::Client,
}

impl AwsDistributionProvisioner {
    /// Wrap a CloudFront client.
    #[must_use]
    pub fn new(client: aws_sdk_cloudfront::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DistributionProvisioner for AwsDistributionProvisioner {
    async fn create_origin_access_identity(
        &self,
        comment: &str,
    ) -> ProviderResult<OriginAccessIdentity> {
        let config = CloudFrontOriginAccessIdentityConfig::builder()
            .caller_reference(Uuid::new_v4().to_string())
            .comment(comment)
            .build()
            .map_err(|e| build_error("cloudfront", e))?;

        let response = self
            .client
            .create_cloud_front_origin_access_identity()
            .cloud_front_origin_access_identity_config(config)
            .send()
            .await
            .map_err(|e| sdk_error("cloudfront", e))?;

        let identity = response.cloud_front_origin_access_identity().ok_or_else(|| {
            ProviderError::api("cloudfront", "response did not include the created identity")
        })?;

        debug!(oai_id = %identity.id(), "create_origin_access_identity completed");
        Ok(OriginAccessIdentity {
            id: identity.id().to_owned(),
            canonical_user_id: identity.s3_canonical_user_id().to_owned(),
            comment: comment.to_owned(),
        })
    }

    async fn origin_access_identity(&self, id: &str) -> ProviderResult<OriginAccessIdentity> {
        let response = self
            .client
            .get_cloud_front_origin_access_identity()
            .id(id)
            .send()
            .await
            .map_err(|e| sdk_error("cloudfront", e))?;

        let identity = response.cloud_front_origin_access_identity().ok_or_else(|| {
            ProviderError::api("cloudfront", format!("no such origin access identity: {id}"))
        })?;

        Ok(OriginAccessIdentity {
            id: identity.id().to_owned(),
            canonical_user_id: identity.s3_canonical_user_id().to_owned(),
            comment: identity
                .cloud_front_origin_access_identity_config()
                .map(|c| c.comment().to_owned())
                .unwrap_or_default(),
        })
    }

    async fn create_distribution(
        &self,
        request: DistributionRequest,
    ) -> ProviderResult<DistributionSummary> {
        let config = distribution_config(&request)?;

        let response = self
            .client
            .create_distribution()
            .distribution_config(config)
            .send()
            .await
            .map_err(|e| sdk_error("cloudfront", e))?;

        let distribution = response.distribution().ok_or_else(|| {
            ProviderError::api(
                "cloudfront",
                "response did not include the created distribution",
            )
        })?;

        debug!(
            distribution_id = %distribution.id(),
            domain = %distribution.domain_name(),
            "create_distribution completed",
        );
        Ok(DistributionSummary {
            id: distribution.id().to_owned(),
            domain_name: distribution.domain_name().to_owned(),
            status: distribution.status().to_owned(),
        })
    }
}

/// Build the full distribution configuration for either origin shape.
fn distribution_config(request: &DistributionRequest) -> ProviderResult<DistributionConfig> {
    let (origin_id, origin) = match &request.origin {
        DistributionOrigin::Website => {
            // Website endpoints only speak plain HTTP, so the origin is a
            // custom origin rather than an S3 origin.
            let origin = Origin::builder()
                .id(WEBSITE_ORIGIN_ID)
                .domain_name(&request.origin_domain)
                .custom_origin_config(
                    CustomOriginConfig::builder()
                        .http_port(80)
                        .https_port(443)
                        .origin_protocol_policy(OriginProtocolPolicy::HttpOnly)
                        .build()
                        .map_err(|e| build_error("cloudfront", e))?,
                )
                .build()
                .map_err(|e| build_error("cloudfront", e))?;
            (WEBSITE_ORIGIN_ID.to_owned(), origin)
        }
        DistributionOrigin::BucketWithIdentity { access_identity_id } => {
            let origin_id = request
                .origin_domain
                .split('.')
                .next()
                .unwrap_or(&request.origin_domain)
                .to_owned();
            let origin = Origin::builder()
                .id(&origin_id)
                .domain_name(&request.origin_domain)
                .s3_origin_config(
                    S3OriginConfig::builder()
                        .origin_access_identity(format!(
                            "origin-access-identity/cloudfront/{access_identity_id}"
                        ))
                        .build(),
                )
                .build()
                .map_err(|e| build_error("cloudfront", e))?;
            (origin_id, origin)
        }
    };

    let allowed_methods = AllowedMethods::builder()
        .quantity(2)
        .items(Method::Get)
        .items(Method::Head)
        .cached_methods(
            CachedMethods::builder()
                .quantity(2)
                .items(Method::Get)
                .items(Method::Head)
                .build()
                .map_err(|e| build_error("cloudfront", e))?,
        )
        .build()
        .map_err(|e| build_error("cloudfront", e))?;

    let forwarded_values = ForwardedValues::builder()
        .query_string(false)
        .cookies(
            CookiePreference::builder()
                .forward(ItemSelection::None)
                .build()
                .map_err(|e| build_error("cloudfront", e))?,
        )
        .build()
        .map_err(|e| build_error("cloudfront", e))?;

    let mut behavior = DefaultCacheBehavior::builder()
        .target_origin_id(origin_id)
        .viewer_protocol_policy(ViewerProtocolPolicy::RedirectToHttps)
        .allowed_methods(allowed_methods)
        .forwarded_values(forwarded_values);

    behavior = match request.origin {
        DistributionOrigin::Website => behavior
            .trusted_signers(
                TrustedSigners::builder()
                    .enabled(false)
                    .quantity(0)
                    .build()
                    .map_err(|e| build_error("cloudfront", e))?,
            )
            .min_ttl(86_400)
            .default_ttl(86_400)
            .max_ttl(31_536_000)
            .compress(true),
        DistributionOrigin::BucketWithIdentity { .. } => behavior.min_ttl(0),
    };

    let mut config = DistributionConfig::builder()
        .caller_reference(Uuid::new_v4().to_string())
        .origins(
            Origins::builder()
                .quantity(1)
                .items(origin)
                .build()
                .map_err(|e| build_error("cloudfront", e))?,
        )
        .default_cache_behavior(
            behavior
                .build()
                .map_err(|e| build_error("cloudfront", e))?,
        )
        .comment(&request.comment)
        .enabled(true);

    if matches!(request.origin, DistributionOrigin::Website) {
        if let Some(root) = &request.default_root_object {
            config = config.default_root_object(root);
        }
        config = config
            .price_class(PriceClass::PriceClassAll)
            .http_version(HttpVersion::Http2)
            .is_ipv6_enabled(true);
    }

    config.build().map_err(|e| build_error("cloudfront", e))
}
