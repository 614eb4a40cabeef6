//! Error types for the deployment pipeline.

use cloudpilot_core::ProviderError;

use crate::orchestrator::DeployStage;

/// Error produced while reading an uploaded archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The byte stream is not a valid compressed bundle.
    #[error("archive is not a valid zip bundle: {0}")]
    Corrupt(String),

    /// An entry could not be staged through the extraction area.
    #[error("failed to stage archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal error aborting a deployment.
///
/// Per-file upload failures are not errors; they are collected as
/// [`UploadOutcome`](crate::orchestrator::UploadOutcome) values on the
/// deployment result. A `DeployError` means the pipeline stopped in the
/// recorded state and the site is not servable.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The uploaded archive could not be read.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// A collaborator call failed in the given state.
    #[error("deployment failed in state {stage}: {source}")]
    Stage {
        /// The state the pipeline was in when the fatal error occurred.
        stage: DeployStage,
        /// The underlying provider error.
        #[source]
        source: ProviderError,
    },
}

impl DeployError {
    /// Construct a stage error for a fatal collaborator failure.
    #[must_use]
    pub fn at(stage: DeployStage, source: ProviderError) -> Self {
        Self::Stage { stage, source }
    }

    /// The state the pipeline stopped in, if this was a stage failure.
    #[must_use]
    pub fn stage(&self) -> Option<DeployStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::Archive(_) => None,
        }
    }
}
