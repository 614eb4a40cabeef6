//! Shared SDK configuration for all provider clients.

use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};

use cloudpilot_core::Config;

/// Load the shared SDK configuration from the service configuration.
///
/// Credentials come from the SDK's default chain. The endpoint override (for
/// LocalStack and similar local stacks) and the operation timeout are applied
/// here so every service client inherits them.
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.default_region.as_str().to_owned()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(secs) = config.call_timeout_secs {
        loader = loader.timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(secs))
                .build(),
        );
    }

    loader.load().await
}

/// Build an S3 client from the shared configuration.
///
/// Endpoint overrides require path-style addressing (`endpoint/bucket/key`)
/// because local stacks rarely resolve virtual-hosted bucket subdomains.
#[must_use]
pub fn s3_client(sdk_config: &SdkConfig, force_path_style: bool) -> aws_sdk_s3::Client {
    if force_path_style {
        let config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(true)
            .build();
        return aws_sdk_s3::Client::from_conf(config);
    }
    aws_sdk_s3::Client::new(sdk_config)
}
