//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod destination;
pub mod encoder;
pub mod status;

// Re-export common types
pub use capture::{DeviceError, MediaDevices};
pub use config::ConfigStore;
pub use destination::SaveDestination;
pub use encoder::{EncoderError, EncoderHandle, MediaEncoder};
pub use status::StatusReporter;
