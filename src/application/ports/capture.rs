//! Capture device port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::{CaptureSource, MediaConstraints};

/// Capture acquisition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("Permission denied for {device}")]
    PermissionDenied { device: String },

    #[error("No matching device: {device}")]
    NotFound { device: String },

    #[error("Device {device} is already in use")]
    Busy { device: String },

    #[error("Capture unavailable: {0}")]
    Unavailable(String),
}

/// Port for acquiring live camera/microphone streams
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Request access to the devices named by `constraints`.
    ///
    /// # Returns
    /// A live capture source whose tracks are immediately usable, or the
    /// reason access was refused
    async fn acquire(&self, constraints: MediaConstraints) -> Result<CaptureSource, DeviceError>;
}
