//! API operations, error types, and request/response models for CloudPilot.
//!
//! Inputs deserialize from the JSON bodies, query strings, and multipart
//! forms the HTTP surface accepts; outputs serialize to the exact JSON
//! shapes the API emits, including the provider-style PascalCase keys on the
//! compute surface.

pub mod error;
pub mod input;
pub mod operations;
pub mod output;

pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use operations::ApiOperation;
