//! Domain layer - Core recording logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod recording;
pub mod save;
pub mod status;

// Re-export common types
pub use capture::{CaptureSource, MediaConstraints, MediaTrack, TrackKind};
pub use config::AppConfig;
pub use error::*;
pub use recording::{
    Chunk, ChunkSequence, Duration, MediaType, RecordingArtifact, SessionLifecycle, SessionState,
};
pub use save::{Destination, DestinationKind, FileName, SaveOutcome, SaveRequest};
pub use status::{Status, StatusLevel};
