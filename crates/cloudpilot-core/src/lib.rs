//! Core types, configuration, and provider contracts for CloudPilot.
//!
//! This crate provides the foundational building blocks shared across the
//! CloudPilot service: environment-driven configuration, common value types,
//! the provider error type, and the collaborator traits through which the
//! rest of the system talks to the cloud provider. Provider handles are
//! constructed explicitly and passed around as `Arc<dyn Trait>` so tests can
//! substitute in-memory fakes.

mod config;
mod error;
pub mod provider;
mod types;

pub use config::Config;
pub use error::{ProviderError, ProviderResult};
pub use types::AwsRegion;
