//! Save recording use case

use tracing::{debug, info};

use crate::domain::error::SaveError;
use crate::domain::recording::RecordingArtifact;
use crate::domain::save::{FileName, SaveOutcome, SaveRequest};

use super::ports::SaveDestination;

/// Routes a finished recording to the destination the user picked
pub struct SaveRecordingUseCase {
    destinations: Vec<Box<dyn SaveDestination>>,
}

impl SaveRecordingUseCase {
    /// Create a use case over the available destinations
    pub fn new(destinations: Vec<Box<dyn SaveDestination>>) -> Self {
        Self { destinations }
    }

    /// Save `artifact` according to `request`.
    ///
    /// Fails with `NothingToSave` for a missing or empty artifact and with
    /// `MissingPath` for a custom destination without a path; in both cases no
    /// destination is touched.
    pub async fn execute(
        &self,
        artifact: Option<&RecordingArtifact>,
        request: &SaveRequest,
    ) -> Result<SaveOutcome, SaveError> {
        let artifact = artifact
            .filter(|a| !a.is_empty())
            .ok_or(SaveError::NothingToSave)?;
        request.validate()?;

        let file_name = FileName::normalize(&request.file_name, artifact.media_type());
        let kind = request.destination.kind();
        let destination = self
            .destinations
            .iter()
            .find(|d| d.kind() == kind)
            .ok_or_else(|| SaveError::UnsupportedDestination(kind.to_string()))?;

        debug!(%kind, file = %file_name, bytes = artifact.size_bytes(), "saving recording");
        let outcome = destination
            .save(artifact, &file_name, &request.destination)
            .await?;
        info!(?outcome, "save finished");

        Ok(outcome)
    }
}
