//! Provider-backed operation handlers for CloudPilot.
//!
//! [`CloudPilot`] owns the provider handles and the deployment orchestrator
//! and implements the HTTP layer's
//! [`ApiHandler`](cloudpilot_http::ApiHandler) trait: one handler method per
//! operation, grouped by concern under [`ops`].

mod handler;
pub mod ops;

pub use handler::CloudPilot;
