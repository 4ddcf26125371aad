//! Encoder infrastructure module
//!
//! Provides streaming WebM encoding through an ffmpeg child process.

mod ffmpeg;

pub use ffmpeg::FfmpegEncoder;

use crate::domain::config::AppConfig;

/// Create the encoder described by the configuration
pub fn create_encoder(config: &AppConfig) -> FfmpegEncoder {
    FfmpegEncoder::new(config.audio_backend_or_default())
}
