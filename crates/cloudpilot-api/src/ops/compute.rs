//! Compute instance handlers.
//!
//! These are single-call passthroughs to the compute provider. Start and
//! stop first check the current instance state so callers get a clear
//! answer for no-op and transitional cases instead of a provider error.

use tracing::info;

use cloudpilot_core::provider::RunInstanceRequest;
use cloudpilot_http::body::ApiBody;
use cloudpilot_http::response::{created_json, ok_json};
use cloudpilot_model::input::{CreateInstanceInput, InstanceInput};
use cloudpilot_model::output::{CreateInstanceResponse, MessageResponse};
use cloudpilot_model::{ApiError, ApiErrorCode, ApiResult};

use crate::handler::{CloudPilot, parse_json};

impl CloudPilot {
    /// `POST /create_instance`
    pub(crate) async fn create_instance(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let input: CreateInstanceInput = parse_json(body)?;

        let request = RunInstanceRequest {
            image_id: input
                .image_id
                .unwrap_or_else(|| self.config.default_image_id.clone()),
            instance_type: input
                .instance_type
                .unwrap_or_else(|| self.config.default_instance_type.clone()),
            key_name: input.key_name.or_else(|| self.config.default_key_name.clone()),
        };

        let instance_id = self.compute.run_instance(request).await?;
        info!(instance_id = %instance_id, "created instance");
        Ok(created_json(&CreateInstanceResponse {
            message: "Instance created".to_owned(),
            instance_id,
        }))
    }

    /// `POST /start_instance`
    pub(crate) async fn start_instance(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let instance_id = required_instance_id(body)?;

        let state = self.compute.instance_state(&instance_id).await?;
        match state.name.as_str() {
            "running" => {
                return Ok(ok_json(&MessageResponse::new(format!(
                    "Instance {instance_id} is already running"
                ))));
            }
            "pending" | "stopping" => {
                return Err(ApiError::invalid_request(format!(
                    "Instance {instance_id} is in {} state. Please wait.",
                    state.name
                )));
            }
            _ => {}
        }

        self.compute.start_instance(&instance_id).await?;
        info!(instance_id = %instance_id, "started instance");
        Ok(ok_json(&MessageResponse::new(format!(
            "Instance {instance_id} starting"
        ))))
    }

    /// `POST /stop_instance`
    pub(crate) async fn stop_instance(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let instance_id = required_instance_id(body)?;

        let state = self.compute.instance_state(&instance_id).await?;
        match state.name.as_str() {
            "stopped" => {
                return Ok(ok_json(&MessageResponse::new(format!(
                    "Instance {instance_id} is already stopped"
                ))));
            }
            "pending" | "stopping" => {
                return Err(ApiError::invalid_request(format!(
                    "Instance {instance_id} is in {} state. Please wait.",
                    state.name
                )));
            }
            _ => {}
        }

        self.compute.stop_instance(&instance_id).await?;
        info!(instance_id = %instance_id, "stopped instance");
        Ok(ok_json(&MessageResponse::new(format!(
            "Instance {instance_id} stopping"
        ))))
    }

    /// `POST /terminate_instance`
    pub(crate) async fn terminate_instance(
        &self,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let instance_id = required_instance_id(body)?;
        self.compute.terminate_instance(&instance_id).await?;
        info!(instance_id = %instance_id, "terminated instance");
        Ok(ok_json(&MessageResponse::new(format!(
            "Instance {instance_id} terminated successfully"
        ))))
    }

    /// `POST /reboot_instance`
    pub(crate) async fn reboot_instance(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let instance_id = required_instance_id(body)?;
        self.compute.reboot_instance(&instance_id).await?;
        info!(instance_id = %instance_id, "rebooted instance");
        Ok(ok_json(&MessageResponse::new(format!(
            "Instance {instance_id} rebooted successfully"
        ))))
    }

    /// `POST /monitor_instance` and `POST /unmonitor_instance`
    pub(crate) async fn set_instance_monitoring(
        &self,
        body: &[u8],
        enabled: bool,
    ) -> ApiResult<http::Response<ApiBody>> {
        let instance_id = required_instance_id(body)?;
        self.compute.set_monitoring(&instance_id, enabled).await?;
        info!(instance_id = %instance_id, enabled, "set instance monitoring");

        let message = if enabled {
            format!("Monitoring enabled for instance {instance_id}")
        } else {
            format!("Monitoring disabled for instance {instance_id}")
        };
        Ok(ok_json(&MessageResponse::new(message)))
    }

    /// `GET /describe_instances`
    pub(crate) async fn describe_instances(&self) -> ApiResult<http::Response<ApiBody>> {
        let instances = self.compute.describe_instances().await?;
        Ok(ok_json(&instances))
    }
}

/// Parse and require the `InstanceId` field.
fn required_instance_id(body: &[u8]) -> ApiResult<String> {
    let input: InstanceInput = parse_json(body)?;
    input
        .instance_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::new(ApiErrorCode::MissingField, "InstanceId is required"))
}
