//! EC2-backed compute provider.

use async_trait::async_trait;
use aws_sdk_ec2::types::{Instance, InstanceType, Tag};
use tracing::debug;

use cloudpilot_core::provider::{
    Compute, InstanceDetails, InstanceState, ResourceTag, RunInstanceRequest, SecurityGroupRef,
};
use cloudpilot_core::{ProviderError, ProviderResult};

use crate::error::sdk_error;

/// Compute provider backed by the AWS EC2 API.
#[derive(Debug, Clone)]
pub struct AwsCompute {
    client: aws_sdk_ec2::Client,
}

impl AwsCompute {
    /// Wrap an EC2 client.
    #[must_use]
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

/// The value of the `Name` tag, if present.
fn name_from_tags(tags: &[Tag]) -> String {
    tags.iter()
        .find(|tag| tag.key() == Some("Name"))
        .and_then(Tag::value)
        .unwrap_or_default()
        .to_owned()
}

/// Flatten one SDK instance into the details shape the API emits.
fn instance_details(instance: &Instance) -> InstanceDetails {
    let state = instance.state();
    InstanceDetails {
        instance_id: instance.instance_id().unwrap_or_default().to_owned(),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_owned())
            .unwrap_or_default(),
        state: InstanceState {
            name: state
                .and_then(|s| s.name())
                .map(|n| n.as_str().to_owned())
                .unwrap_or_default(),
            code: state.and_then(|s| s.code()).unwrap_or_default(),
        },
        public_ip_address: instance.public_ip_address().unwrap_or_default().to_owned(),
        private_ip_address: instance.private_ip_address().unwrap_or_default().to_owned(),
        launch_time: instance
            .launch_time()
            .map(ToString::to_string)
            .unwrap_or_default(),
        name: name_from_tags(instance.tags()),
        platform: instance
            .platform()
            .map_or_else(|| "linux".to_owned(), |p| p.as_str().to_owned()),
        architecture: instance
            .architecture()
            .map_or_else(|| "x86_64".to_owned(), |a| a.as_str().to_owned()),
        vpc_id: instance.vpc_id().unwrap_or_default().to_owned(),
        subnet_id: instance.subnet_id().unwrap_or_default().to_owned(),
        security_groups: instance
            .security_groups()
            .iter()
            .map(|group| SecurityGroupRef {
                group_id: group.group_id().unwrap_or_default().to_owned(),
                group_name: group.group_name().unwrap_or_default().to_owned(),
            })
            .collect(),
        tags: instance
            .tags()
            .iter()
            .map(|tag| ResourceTag {
                key: tag.key().unwrap_or_default().to_owned(),
                value: tag.value().unwrap_or_default().to_owned(),
            })
            .collect(),
    }
}

#[async_trait]
impl Compute for AwsCompute {
    async fn run_instance(&self, request: RunInstanceRequest) -> ProviderResult<String> {
        let response = self
            .client
            .run_instances()
            .image_id(&request.image_id)
            .instance_type(InstanceType::from(request.instance_type.as_str()))
            .set_key_name(request.key_name.clone())
            .min_count(1)
            .max_count(1)
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;

        let instance_id = response
            .instances()
            .first()
            .and_then(Instance::instance_id)
            .ok_or_else(|| ProviderError::api("ec2", "response did not include an instance"))?
            .to_owned();

        debug!(instance_id = %instance_id, "run_instance completed");
        Ok(instance_id)
    }

    async fn describe_instances(&self) -> ProviderResult<Vec<InstanceDetails>> {
        let response = self
            .client
            .describe_instances()
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;

        Ok(response
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .map(instance_details)
            .collect())
    }

    async fn instance_state(&self, instance_id: &str) -> ProviderResult<InstanceState> {
        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;

        response
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .next()
            .and_then(Instance::state)
            .map(|state| InstanceState {
                name: state
                    .name()
                    .map(|n| n.as_str().to_owned())
                    .unwrap_or_default(),
                code: state.code().unwrap_or_default(),
            })
            .ok_or_else(|| ProviderError::NoSuchInstance(instance_id.to_owned()))
    }

    async fn start_instance(&self, instance_id: &str) -> ProviderResult<()> {
        self.client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;
        debug!(instance_id = %instance_id, "start_instance completed");
        Ok(())
    }

    async fn stop_instance(&self, instance_id: &str) -> ProviderResult<()> {
        self.client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;
        debug!(instance_id = %instance_id, "stop_instance completed");
        Ok(())
    }

    async fn terminate_instance(&self, instance_id: &str) -> ProviderResult<()> {
        self.client
            .terminate_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;
        debug!(instance_id = %instance_id, "terminate_instance completed");
        Ok(())
    }

    async fn reboot_instance(&self, instance_id: &str) -> ProviderResult<()> {
        self.client
            .reboot_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error("ec2", e))?;
        debug!(instance_id = %instance_id, "reboot_instance completed");
        Ok(())
    }

    async fn set_monitoring(&self, instance_id: &str, enabled: bool) -> ProviderResult<()> {
        if enabled {
            self.client
                .monitor_instances()
                .instance_ids(instance_id)
                .send()
                .await
                .map_err(|e| sdk_error("ec2", e))?;
        } else {
            self.client
                .unmonitor_instances()
                .instance_ids(instance_id)
                .send()
                .await
                .map_err(|e| sdk_error("ec2", e))?;
        }
        debug!(instance_id = %instance_id, enabled, "set_monitoring completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_extract_name_tag() {
        let tags = vec![
            Tag::builder().key("env").value("prod").build(),
            Tag::builder().key("Name").value("web-1").build(),
        ];
        assert_eq!(name_from_tags(&tags), "web-1");
    }

    #[test]
    fn test_should_default_missing_name_tag_to_empty() {
        let tags = vec![Tag::builder().key("env").value("prod").build()];
        assert_eq!(name_from_tags(&tags), "");
        assert_eq!(name_from_tags(&[]), "");
    }

    #[test]
    fn test_should_flatten_instance_defaults() {
        let details = instance_details(&Instance::builder().instance_id("i-0abc").build());
        assert_eq!(details.instance_id, "i-0abc");
        assert_eq!(details.platform, "linux");
        assert_eq!(details.architecture, "x86_64");
        assert_eq!(details.public_ip_address, "");
        assert!(details.security_groups.is_empty());
    }
}
