//! Operation dispatch: bridges the HTTP layer to the handler crate.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use cloudpilot_model::{ApiError, ApiOperation};

use crate::body::ApiBody;

/// Trait the handler layer implements.
///
/// This is the boundary between HTTP plumbing and the provider-backed
/// handlers: the implementor receives the resolved operation, the raw
/// request parts, and the collected body, and must return a fully formed
/// response or an [`ApiError`].
pub trait ApiHandler: Send + Sync + 'static {
    /// Handle one API operation.
    fn handle_operation(
        &self,
        op: ApiOperation,
        parts: http::request::Parts,
        body: Bytes,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ApiBody>, ApiError>> + Send>>;
}

/// Dispatch a resolved request to the handler.
pub async fn dispatch_operation<H: ApiHandler>(
    handler: &H,
    op: ApiOperation,
    parts: http::request::Parts,
    body: Bytes,
) -> Result<http::Response<ApiBody>, ApiError> {
    tracing::debug!(operation = %op, "dispatching operation");
    handler.handle_operation(op, parts, body).await
}

/// Handler that rejects every operation; useful for exercising the routing
/// and service layers in isolation.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl ApiHandler for NotImplementedHandler {
    fn handle_operation(
        &self,
        op: ApiOperation,
        _parts: http::request::Parts,
        _body: Bytes,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ApiBody>, ApiError>> + Send>> {
        Box::pin(async move {
            Err(ApiError::internal(format!(
                "operation not implemented: {op}"
            )))
        })
    }
}
