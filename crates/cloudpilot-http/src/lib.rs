//! HTTP plumbing for CloudPilot: routing, multipart parsing, response
//! serialization, and the hyper `Service`.
//!
//! The layering mirrors the rest of the workspace: this crate knows nothing
//! about providers. It resolves a request to an
//! [`ApiOperation`](cloudpilot_model::ApiOperation), hands the raw parts and
//! collected body to an [`ApiHandler`](dispatch::ApiHandler), and renders
//! the handler's typed result or error as JSON.

pub mod body;
pub mod dispatch;
pub mod multipart;
pub mod response;
pub mod router;
pub mod service;

pub use body::ApiBody;
pub use dispatch::ApiHandler;
pub use service::ApiHttpService;
