//! Local download folder destination

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::application::ports::SaveDestination;
use crate::domain::error::SaveError;
use crate::domain::recording::RecordingArtifact;
use crate::domain::save::{Destination, DestinationKind, FileName, SaveOutcome};

/// Numbered alternatives tried when the requested name is taken
const MAX_NAME_ATTEMPTS: u32 = 999;

/// Writes the recording into the user's download directory.
///
/// Existing files are never replaced: a taken name gets a ` (n)` suffix,
/// the way browser downloads do.
pub struct LocalDownload {
    dir: PathBuf,
}

impl LocalDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Create a file that did not exist before, numbering the name if needed
    async fn create_unique(&self, file_name: &FileName) -> Result<(File, FileName), SaveError> {
        let mut candidate = file_name.clone();
        for n in 1..=MAX_NAME_ATTEMPTS {
            let target = self.dir.join(candidate.as_str());
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(file) => return Ok((file, candidate)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %target.display(), "name taken, trying next");
                    candidate = file_name.numbered(n);
                }
                Err(e) => {
                    return Err(SaveError::WriteFailed(format!("{}: {}", target.display(), e)))
                }
            }
        }
        Err(SaveError::WriteFailed(format!(
            "{}: too many files named {}",
            self.dir.display(),
            file_name
        )))
    }
}

#[async_trait]
impl SaveDestination for LocalDownload {
    fn kind(&self) -> DestinationKind {
        DestinationKind::Download
    }

    async fn save(
        &self,
        artifact: &RecordingArtifact,
        file_name: &FileName,
        _destination: &Destination,
    ) -> Result<SaveOutcome, SaveError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SaveError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        let (mut file, written_name) = self.create_unique(file_name).await?;
        let target = self.dir.join(written_name.as_str());
        let write_failed =
            |e: io::Error| SaveError::WriteFailed(format!("{}: {}", target.display(), e));
        file.write_all(artifact.data()).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        info!(path = %target.display(), size = %artifact.human_readable_size(), "recording written");
        Ok(SaveOutcome::Saved {
            file_name: written_name.to_string(),
            location: self.dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::{Chunk, ChunkSequence, Duration, MediaType};
    use tempfile::TempDir;

    fn artifact() -> RecordingArtifact {
        let mut chunks = ChunkSequence::new();
        chunks.push(Chunk::from(&b"webm"[..]));
        chunks.push(Chunk::from(&b"data"[..]));
        RecordingArtifact::assemble(chunks, MediaType::Webm, Duration::from_millis(1500))
    }

    #[tokio::test]
    async fn writes_file_into_directory() {
        let dir = TempDir::new().unwrap();
        let target_dir = dir.path().join("Downloads");
        let destination = LocalDownload::new(&target_dir);
        let name = FileName::normalize("clip", MediaType::Webm);

        let outcome = destination
            .save(&artifact(), &name, &Destination::Download)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                file_name: "clip.webm".into(),
                location: target_dir.clone(),
            }
        );
        let written = std::fs::read(target_dir.join("clip.webm")).unwrap();
        assert_eq!(written, b"webmdata");
    }

    #[tokio::test]
    async fn existing_file_is_kept_and_name_is_numbered() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("clip.webm"), b"older").unwrap();
        std::fs::write(dir.path().join("clip (1).webm"), b"old").unwrap();
        let destination = LocalDownload::new(dir.path());
        let name = FileName::normalize("clip", MediaType::Webm);

        let outcome = destination
            .save(&artifact(), &name, &Destination::Download)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                file_name: "clip (2).webm".into(),
                location: dir.path().to_path_buf(),
            }
        );
        assert_eq!(std::fs::read(dir.path().join("clip.webm")).unwrap(), b"older");
        assert_eq!(std::fs::read(dir.path().join("clip (1).webm")).unwrap(), b"old");
        assert_eq!(
            std::fs::read(dir.path().join("clip (2).webm")).unwrap(),
            b"webmdata"
        );
    }

    #[tokio::test]
    async fn path_like_names_stay_inside_directory() {
        let root = TempDir::new().unwrap();
        let downloads = root.path().join("Downloads");
        let destination = LocalDownload::new(&downloads);

        let outside = root.path().join("elsewhere").join("evil");
        for input in [outside.to_string_lossy().to_string(), "../up".to_string()] {
            let name = FileName::normalize(&input, MediaType::Webm);
            destination
                .save(&artifact(), &name, &Destination::Download)
                .await
                .unwrap();
        }

        assert!(downloads.join("evil.webm").exists());
        assert!(downloads.join("up.webm").exists());
        assert!(!root.path().join("elsewhere").exists());
        assert!(!root.path().join("up.webm").exists());
    }

    #[tokio::test]
    async fn unwritable_directory_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let destination = LocalDownload::new(blocker.join("sub"));
        let name = FileName::normalize("clip", MediaType::Webm);

        let err = destination
            .save(&artifact(), &name, &Destination::Download)
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::WriteFailed(_)));
    }
}
