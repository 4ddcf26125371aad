//! Application layer - Use cases and port interfaces
//!
//! Contains the recording operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod save;
pub mod session;
pub mod studio;

// Re-export use cases
pub use save::SaveRecordingUseCase;
pub use session::{RecordingSession, SessionError};
pub use studio::{RecordingStudio, RecordingSummary, StudioConfig, StudioError};
