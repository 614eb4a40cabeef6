//! API error type with HTTP status mapping.
//!
//! Every error response renders as `{"error": message}`; the status code is
//! derived from the error code: 4xx for caller input problems, 5xx for
//! provider failures.

use http::StatusCode;

use cloudpilot_core::ProviderError;

/// Classification of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ApiErrorCode {
    /// The request body or parameters are malformed.
    InvalidRequest,
    /// A required field is absent.
    MissingField,
    /// The uploaded archive is not a valid compressed bundle.
    ArchiveCorrupt,
    /// No route matches the request path.
    NotFound,
    /// The path exists but not for this HTTP method.
    MethodNotAllowed,
    /// A provider collaborator call failed.
    ProviderFailure,
    /// An unexpected internal error.
    Internal,
}

impl ApiErrorCode {
    /// The HTTP status this error code maps to.
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::MissingField | Self::ArchiveCorrupt => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ProviderFailure | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An error surfaced to API callers.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Error classification.
    pub code: ApiErrorCode,
    /// Human-readable message rendered in the response body.
    pub message: String,
}

impl ApiError {
    /// Create an error with an explicit code and message.
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A malformed-request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidRequest, message)
    }

    /// A missing-required-field error.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(ApiErrorCode::MissingField, format!("Missing {field}"))
    }

    /// An unknown-route error.
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::new(ApiErrorCode::NotFound, format!("No such route: {path}"))
    }

    /// A method-not-allowed error.
    #[must_use]
    pub fn method_not_allowed(method: &str) -> Self {
        Self::new(
            ApiErrorCode::MethodNotAllowed,
            format!("Method {method} is not allowed for this route"),
        )
    }

    /// An internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }

    /// The HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::new(ApiErrorCode::ProviderFailure, err.to_string())
    }
}

/// Convenience result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
