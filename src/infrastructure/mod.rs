//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like FFmpeg, V4L2 and the filesystem.

pub mod capture;
pub mod config;
pub mod destination;
pub mod encoder;

// Re-export adapters
pub use capture::{create_media_devices, V4l2MediaDevices};
pub use config::XdgConfigStore;
pub use destination::{create_destinations, CustomPathSave, LocalDownload, RemoteDriveUpload};
pub use encoder::{create_encoder, FfmpegEncoder};
