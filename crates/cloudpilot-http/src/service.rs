//! The hyper `Service` tying routing, dispatch, and response rendering
//! together.
//!
//! Request lifecycle:
//!
//! 1. Health check interception (`GET /health`)
//! 2. CORS preflight (`OPTIONS`)
//! 3. Route resolution via [`router::resolve`]
//! 4. Request body collection
//! 5. Dispatch to the [`ApiHandler`]
//! 6. Error rendering (`{"error": ...}` with the mapped status)
//! 7. Common response headers (`x-request-id`, `Server`, CORS)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use cloudpilot_model::ApiError;

use crate::body::ApiBody;
use crate::dispatch::{ApiHandler, dispatch_operation};
use crate::response::error_to_response;
use crate::router;

/// The CloudPilot HTTP service.
#[derive(Debug)]
pub struct ApiHttpService<H: ApiHandler> {
    handler: Arc<H>,
}

impl<H: ApiHandler> ApiHttpService<H> {
    /// Create a service around a handler.
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Create a service from a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>) -> Self {
        Self { handler }
    }
}

impl<H: ApiHandler> Clone for ApiHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ApiHandler> Service<http::Request<Incoming>> for ApiHttpService<H> {
    type Response = http::Response<ApiBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, handler.as_ref(), &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process one request through the full pipeline.
async fn process_request<H: ApiHandler>(
    req: http::Request<Incoming>,
    handler: &H,
    request_id: &str,
) -> http::Response<ApiBody> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let operation = match router::resolve(&method, uri.path()) {
        Ok(operation) => operation,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route request");
            return error_to_response(&err);
        }
    };

    info!(operation = %operation, %method, path = %uri.path(), request_id, "routed request");

    let (parts, incoming) = req.into_parts();
    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return error_to_response(&ApiError::internal("failed to read request body"));
        }
    };

    match dispatch_operation(handler, operation, parts, body).await {
        Ok(response) => response,
        Err(err) => {
            debug!(operation = %operation, error = %err, request_id, "operation returned error");
            error_to_response(&err)
        }
    }
}

/// Collect the full body from a hyper `Incoming` stream into `Bytes`.
async fn collect_body(incoming: Incoming) -> Result<Bytes, hyper::Error> {
    let collected = incoming.collect().await?;
    Ok(collected.to_bytes())
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce a health check response.
fn health_check_response() -> http::Response<ApiBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(ApiBody::from_string(
            r#"{"status":"running","service":"cloudpilot"}"#,
        ))
        .expect("static health response should be valid")
}

/// Produce a CORS preflight response. The console frontend is served from a
/// different origin, so CORS is wide open.
fn cors_preflight_response() -> http::Response<ApiBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Authorization, Content-Type")
        .header("Access-Control-Max-Age", "86400")
        .body(ApiBody::empty())
        .expect("static CORS response should be valid")
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ApiBody>,
    request_id: &str,
) -> http::Response<ApiBody> {
    let headers = response.headers_mut();

    if let Ok(value) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", value);
    }
    headers.insert(
        "Server",
        http::header::HeaderValue::from_static("CloudPilot"),
    );
    headers.insert(
        "Access-Control-Allow-Origin",
        http::header::HeaderValue::from_static("*"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_detect_health_check_paths() {
        assert!(is_health_check(&http::Method::GET, "/health"));
        assert!(is_health_check(&http::Method::GET, "/_health"));
        assert!(!is_health_check(&http::Method::POST, "/health"));
        assert!(!is_health_check(&http::Method::GET, "/s3/list_buckets"));
    }

    #[test]
    fn test_should_produce_health_check_response() {
        let response = health_check_response();
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[test]
    fn test_should_produce_cors_preflight_response() {
        let response = cors_preflight_response();
        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.headers().contains_key("Access-Control-Allow-Origin"));
        assert!(response.headers().contains_key("Access-Control-Allow-Methods"));
    }

    #[test]
    fn test_should_add_common_headers() {
        let response = http::Response::builder()
            .status(http::StatusCode::OK)
            .body(ApiBody::empty())
            .expect("valid response");
        let response = add_common_headers(response, "req-1");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-1"),
        );
        assert_eq!(
            response
                .headers()
                .get("Server")
                .and_then(|v| v.to_str().ok()),
            Some("CloudPilot"),
        );
    }
}
