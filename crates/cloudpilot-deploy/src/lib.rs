//! Static-website deployment pipeline for CloudPilot.
//!
//! Given an uploaded archive and a target bucket, the pipeline creates or
//! validates the bucket, unpacks and classifies every file in the archive,
//! uploads each file with an appropriate media type, enables static-website
//! hosting, attaches an access policy, and optionally fronts the result with
//! a content-delivery distribution.
//!
//! The pipeline is an explicit state machine driven by
//! [`WebsiteDeployer::deploy`]; see [`orchestrator`] for the stage-by-stage
//! fatal/non-fatal classification.

pub mod archive;
pub mod content_type;
mod error;
pub mod orchestrator;
pub mod policy;

pub use archive::{ArchiveEntry, ArchiveReader};
pub use content_type::classify;
pub use error::{ArchiveError, DeployError};
pub use orchestrator::{
    AccessMode, BucketTarget, DeployStage, DeploymentRequest, DeploymentResult, UploadOutcome,
    UploadStatus, WebsiteDeployer,
};
pub use policy::AccessPolicy;
