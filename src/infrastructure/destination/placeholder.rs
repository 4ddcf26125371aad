//! Destinations that acknowledge a save without storing anything yet

use async_trait::async_trait;
use tracing::warn;

use crate::application::ports::SaveDestination;
use crate::domain::error::SaveError;
use crate::domain::recording::RecordingArtifact;
use crate::domain::save::{Destination, DestinationKind, FileName, SaveOutcome};

/// Remote drive upload. No transfer is performed.
#[derive(Debug, Default)]
pub struct RemoteDriveUpload;

#[async_trait]
impl SaveDestination for RemoteDriveUpload {
    fn kind(&self) -> DestinationKind {
        DestinationKind::Drive
    }

    async fn save(
        &self,
        _artifact: &RecordingArtifact,
        file_name: &FileName,
        _destination: &Destination,
    ) -> Result<SaveOutcome, SaveError> {
        warn!(file = %file_name, "drive upload is not available");
        Ok(SaveOutcome::NotImplemented {
            message: "Google Drive integration would be implemented here".to_string(),
        })
    }
}

/// Save to a user-supplied path. Nothing is written.
#[derive(Debug, Default)]
pub struct CustomPathSave;

#[async_trait]
impl SaveDestination for CustomPathSave {
    fn kind(&self) -> DestinationKind {
        DestinationKind::Custom
    }

    async fn save(
        &self,
        _artifact: &RecordingArtifact,
        file_name: &FileName,
        destination: &Destination,
    ) -> Result<SaveOutcome, SaveError> {
        let path = match destination {
            Destination::Custom { path } if !path.trim().is_empty() => path.trim(),
            _ => return Err(SaveError::MissingPath),
        };

        warn!(file = %file_name, %path, "custom path save is not available");
        Ok(SaveOutcome::NotImplemented {
            message: format!("Custom path save would be implemented for: {}", path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::{Chunk, ChunkSequence, Duration, MediaType};

    fn artifact() -> RecordingArtifact {
        let mut chunks = ChunkSequence::new();
        chunks.push(Chunk::from(&b"x"[..]));
        RecordingArtifact::assemble(chunks, MediaType::Webm, Duration::from_millis(10))
    }

    fn name() -> FileName {
        FileName::normalize("clip", MediaType::Webm)
    }

    #[tokio::test]
    async fn drive_reports_placeholder() {
        let outcome = RemoteDriveUpload
            .save(&artifact(), &name(), &Destination::Drive)
            .await
            .unwrap();
        assert!(!outcome.is_saved());
        assert_eq!(
            outcome,
            SaveOutcome::NotImplemented {
                message: "Google Drive integration would be implemented here".into()
            }
        );
    }

    #[tokio::test]
    async fn custom_echoes_path() {
        let destination = Destination::Custom {
            path: "/mnt/share".into(),
        };
        let outcome = CustomPathSave
            .save(&artifact(), &name(), &destination)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::NotImplemented {
                message: "Custom path save would be implemented for: /mnt/share".into()
            }
        );
    }

    #[tokio::test]
    async fn custom_requires_path() {
        let destination = Destination::Custom { path: "  ".into() };
        let err = CustomPathSave
            .save(&artifact(), &name(), &destination)
            .await
            .unwrap_err();
        assert_eq!(err, SaveError::MissingPath);
    }
}
