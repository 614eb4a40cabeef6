//! SDK error conversion helpers.

use aws_sdk_s3::error::DisplayErrorContext;

use cloudpilot_core::ProviderError;

/// Convert an SDK error into a provider error, keeping the full error chain
/// in the message.
pub(crate) fn sdk_error<E>(service: &'static str, err: E) -> ProviderError
where
    E: std::error::Error,
{
    ProviderError::api(service, format!("{}", DisplayErrorContext(err)))
}

/// Convert a builder validation error into a provider error.
pub(crate) fn build_error(
    service: &'static str,
    err: aws_sdk_s3::error::BuildError,
) -> ProviderError {
    ProviderError::api(service, err.to_string())
}
