//! JSON response serialization.

use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde::Serialize;

use cloudpilot_model::ApiError;

use crate::body::ApiBody;

/// Serialize a value as a JSON response with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> http::Response<ApiBody> {
    let payload = serde_json::to_vec(value)
        .unwrap_or_else(|_| br#"{"error":"response serialization failed"}"#.to_vec());

    http::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(ApiBody::from_bytes(payload))
        .expect("static response parts are valid")
}

/// Serialize a value as a 200 OK JSON response.
pub fn ok_json<T: Serialize>(value: &T) -> http::Response<ApiBody> {
    json_response(StatusCode::OK, value)
}

/// Serialize a value as a 201 Created JSON response.
pub fn created_json<T: Serialize>(value: &T) -> http::Response<ApiBody> {
    json_response(StatusCode::CREATED, value)
}

/// Render an API error as its `{"error": ...}` response.
#[must_use]
pub fn error_to_response(err: &ApiError) -> http::Response<ApiBody> {
    json_response(err.status(), &serde_json::json!({ "error": err.message }))
}
