//! Recording artifact value object

use std::fmt;

use super::chunk::ChunkSequence;
use super::duration::Duration;

/// Encoder configuration requested from the host (VP9 video, Opus audio)
pub const ENCODER_MIME: &str = "video/webm; codecs=vp9";

/// Declared media type of a finished recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    #[default]
    Webm,
}

impl MediaType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "video/webm",
        }
    }

    /// Get the file extension (without dot)
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finalized recording: the ordered concatenation of every delivered chunk.
/// Immutable once produced.
#[derive(Debug, Clone)]
pub struct RecordingArtifact {
    data: Vec<u8>,
    media_type: MediaType,
    duration: Duration,
}

impl RecordingArtifact {
    /// Assemble an artifact from a chunk sequence
    pub fn assemble(chunks: ChunkSequence, media_type: MediaType, duration: Duration) -> Self {
        Self {
            data: chunks.concat(),
            media_type,
            duration,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Wall-clock time between start and finalize
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::Chunk;

    fn artifact_of(chunks: &[&[u8]]) -> RecordingArtifact {
        let mut seq = ChunkSequence::new();
        for c in chunks {
            seq.push(Chunk::from(*c));
        }
        RecordingArtifact::assemble(seq, MediaType::Webm, Duration::from_millis(1500))
    }

    #[test]
    fn media_type_strings() {
        assert_eq!(MediaType::Webm.as_str(), "video/webm");
        assert_eq!(MediaType::Webm.extension(), "webm");
        assert!(ENCODER_MIME.starts_with(MediaType::Webm.as_str()));
    }

    #[test]
    fn assemble_concatenates() {
        let artifact = artifact_of(&[&b"ab"[..], &b""[..], &b"cd"[..]]);
        assert_eq!(artifact.data(), b"abcd");
        assert_eq!(artifact.media_type(), MediaType::Webm);
        assert_eq!(artifact.duration().as_millis(), 1500);
    }

    #[test]
    fn empty_artifact() {
        let artifact = artifact_of(&[]);
        assert!(artifact.is_empty());
        assert_eq!(artifact.human_readable_size(), "0 B");
    }

    #[test]
    fn human_readable_sizes() {
        let kb = RecordingArtifact::assemble(
            {
                let mut s = ChunkSequence::new();
                s.push(Chunk::new(vec![0u8; 2048]));
                s
            },
            MediaType::Webm,
            Duration::from_millis(0),
        );
        assert_eq!(kb.human_readable_size(), "2.0 KB");

        let mb = RecordingArtifact::assemble(
            {
                let mut s = ChunkSequence::new();
                s.push(Chunk::new(vec![0u8; 3 * 1024 * 1024]));
                s
            },
            MediaType::Webm,
            Duration::from_millis(0),
        );
        assert_eq!(mb.human_readable_size(), "3.0 MB");
    }
}
