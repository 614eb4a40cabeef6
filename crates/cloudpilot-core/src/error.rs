//! Error types for provider collaborator calls.

/// Error produced by a cloud provider collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The specified bucket does not exist.
    #[error("the specified bucket does not exist: {0}")]
    NoSuchBucket(String),

    /// The specified compute instance does not exist.
    #[error("the specified instance does not exist: {0}")]
    NoSuchInstance(String),

    /// A provider API call failed.
    #[error("{service} request failed: {message}")]
    Api {
        /// The provider service that produced the error.
        service: &'static str,
        /// The provider's error message, surfaced verbatim.
        message: String,
    },
}

impl ProviderError {
    /// Construct an API error for the given provider service.
    #[must_use]
    pub fn api(service: &'static str, message: impl Into<String>) -> Self {
        Self::Api {
            service,
            message: message.into(),
        }
    }
}

/// Convenience result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_api_error_with_service() {
        let err = ProviderError::api("s3", "access denied");
        assert_eq!(err.to_string(), "s3 request failed: access denied");
    }

    #[test]
    fn test_should_format_no_such_bucket() {
        let err = ProviderError::NoSuchBucket("missing".to_owned());
        assert!(err.to_string().contains("missing"));
    }
}
