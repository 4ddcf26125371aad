//! Recording domain module

mod artifact;
mod chunk;
mod duration;
mod session;

pub use artifact::{MediaType, RecordingArtifact, ENCODER_MIME};
pub use chunk::{Chunk, ChunkSequence};
pub use duration::{Duration, DEFAULT_TIMESLICE_MS};
pub use session::{InvalidStateTransition, SessionLifecycle, SessionState};
