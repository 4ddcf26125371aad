//! Save destination port interface

use async_trait::async_trait;

use crate::domain::error::SaveError;
use crate::domain::recording::RecordingArtifact;
use crate::domain::save::{Destination, DestinationKind, FileName, SaveOutcome};

/// Port for a place recordings can be saved to
#[async_trait]
pub trait SaveDestination: Send + Sync {
    /// Which destination kind this adapter handles
    fn kind(&self) -> DestinationKind;

    /// Persist the artifact.
    ///
    /// # Arguments
    /// * `artifact` - Non-empty finished recording
    /// * `file_name` - Normalized file name
    /// * `destination` - The validated destination (carries the custom path)
    async fn save(
        &self,
        artifact: &RecordingArtifact,
        file_name: &FileName,
        destination: &Destination,
    ) -> Result<SaveOutcome, SaveError>;
}

/// Blanket implementation for boxed destination types
#[async_trait]
impl SaveDestination for Box<dyn SaveDestination> {
    fn kind(&self) -> DestinationKind {
        self.as_ref().kind()
    }

    async fn save(
        &self,
        artifact: &RecordingArtifact,
        file_name: &FileName,
        destination: &Destination,
    ) -> Result<SaveOutcome, SaveError> {
        self.as_ref().save(artifact, file_name, destination).await
    }
}
