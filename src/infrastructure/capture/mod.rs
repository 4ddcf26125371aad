//! Capture device infrastructure module
//!
//! Camera access goes through V4L2 device nodes; microphone discovery
//! uses cpal's default host.

mod v4l2;

pub use v4l2::{list_audio_inputs, list_video_devices, V4l2MediaDevices};

use crate::domain::config::AppConfig;

/// Create the device provider described by the configuration
pub fn create_media_devices(config: &AppConfig) -> V4l2MediaDevices {
    V4l2MediaDevices::new(
        config.video_device_or_default(),
        config.audio_input_or_default(),
    )
}
