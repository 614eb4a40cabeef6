//! AWS SDK implementations of the CloudPilot provider contracts.
//!
//! One struct per collaborator trait, each wrapping the corresponding SDK
//! client: [`AwsObjectStore`] (S3), [`AwsDistributionProvisioner`]
//! (CloudFront), [`AwsCompute`] (EC2), and [`AwsMetricsSource`]
//! (CloudWatch). Client construction goes through [`client::load_sdk_config`]
//! so every service shares the region, the optional endpoint override for
//! local stacks, and the operation timeout.

pub mod client;
mod cloudfront;
mod cloudwatch;
mod ec2;
mod error;
mod s3;

pub use cloudfront::AwsDistributionProvisioner;
pub use cloudwatch::AwsMetricsSource;
pub use ec2::AwsCompute;
pub use s3::AwsObjectStore;
