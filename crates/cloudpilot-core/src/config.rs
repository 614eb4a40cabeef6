//! Configuration for the CloudPilot service.
//!
//! All configuration is driven by environment variables.

use crate::types::AwsRegion;

/// Global configuration for CloudPilot.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Bind address for the HTTP server.
    pub listen: String,
    /// Default AWS region.
    pub default_region: AwsRegion,
    /// Log level.
    pub log_level: String,
    /// Optional provider endpoint override (local stacks such as LocalStack).
    pub endpoint_url: Option<String>,
    /// Maximum number of concurrent per-file uploads during a deployment.
    pub upload_concurrency: usize,
    /// Operation timeout applied to provider SDK calls, in seconds.
    pub call_timeout_secs: Option<u64>,
    /// Default machine image for new compute instances.
    pub default_image_id: String,
    /// Default instance type for new compute instances.
    pub default_instance_type: String,
    /// Default key pair name for new compute instances.
    pub default_key_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_owned(),
            default_region: AwsRegion::default(),
            log_level: "info".to_owned(),
            endpoint_url: None,
            upload_concurrency: 8,
            call_timeout_secs: None,
            default_image_id: "ami-063d43db0594b521b".to_owned(),
            default_instance_type: "t2.micro".to_owned(),
            default_key_name: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("LISTEN_ADDR") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("AWS_DEFAULT_REGION") {
            config.default_region = AwsRegion::new(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("AWS_ENDPOINT_URL") {
            if !v.trim().is_empty() {
                config.endpoint_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("UPLOAD_CONCURRENCY") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 {
                    config.upload_concurrency = n;
                }
            }
        }
        if let Ok(v) = std::env::var("CLOUD_CALL_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                config.call_timeout_secs = Some(secs);
            }
        }
        if let Ok(v) = std::env::var("DEFAULT_IMAGE_ID") {
            config.default_image_id = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_INSTANCE_TYPE") {
            config.default_instance_type = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_KEY_NAME") {
            config.default_key_name = Some(v);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = Config::default();
        assert_eq!(config.listen, "0.0.0.0:5000");
        assert_eq!(config.default_region.as_str(), "us-east-1");
        assert_eq!(config.upload_concurrency, 8);
        assert!(config.endpoint_url.is_none());
        assert!(config.call_timeout_secs.is_none());
    }

    #[test]
    fn test_should_keep_default_instance_settings() {
        let config = Config::default();
        assert_eq!(config.default_instance_type, "t2.micro");
        assert!(config.default_key_name.is_none());
    }
}
