//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{Duration, DEFAULT_TIMESLICE_MS};
use crate::domain::save::{DestinationKind, DEFAULT_BASE_NAME};

/// Default V4L2 camera node
pub const DEFAULT_VIDEO_DEVICE: &str = "/dev/video0";

/// Default ffmpeg audio input format
pub const DEFAULT_AUDIO_BACKEND: &str = "pulse";

/// Default audio input name within the backend
pub const DEFAULT_AUDIO_INPUT: &str = "default";

/// Capture device configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub video_device: Option<String>,
    pub audio_backend: Option<String>,
    pub audio_input: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub timeslice_ms: Option<u64>,
    pub max_duration: Option<String>,
    pub destination: Option<String>,
    pub file_name: Option<String>,
    pub download_dir: Option<String>,
    pub capture: Option<CaptureConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            timeslice_ms: Some(DEFAULT_TIMESLICE_MS),
            max_duration: None,
            destination: Some(DestinationKind::Download.to_string()),
            file_name: Some(DEFAULT_BASE_NAME.to_string()),
            download_dir: None,
            capture: Some(CaptureConfig {
                video_device: Some(DEFAULT_VIDEO_DEVICE.to_string()),
                audio_backend: Some(DEFAULT_AUDIO_BACKEND.to_string()),
                audio_input: Some(DEFAULT_AUDIO_INPUT.to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            timeslice_ms: other.timeslice_ms.or(self.timeslice_ms),
            max_duration: other.max_duration.or(self.max_duration),
            destination: other.destination.or(self.destination),
            file_name: other.file_name.or(self.file_name),
            download_dir: other.download_dir.or(self.download_dir),
            capture: Self::merge_capture_config(self.capture, other.capture),
        }
    }

    /// Merge capture config sections
    fn merge_capture_config(
        base: Option<CaptureConfig>,
        other: Option<CaptureConfig>,
    ) -> Option<CaptureConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(CaptureConfig {
                video_device: o.video_device.or(b.video_device),
                audio_backend: o.audio_backend.or(b.audio_backend),
                audio_input: o.audio_input.or(b.audio_input),
            }),
        }
    }

    /// Chunk delivery interval; zero or unset falls back to the default
    pub fn timeslice_or_default(&self) -> Duration {
        match self.timeslice_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => Duration::default_timeslice(),
        }
    }

    /// Recording limit, or None to record until stopped
    pub fn max_duration_parsed(&self) -> Option<Duration> {
        self.max_duration.as_ref().and_then(|s| s.parse().ok())
    }

    /// Get destination kind, or download if not set/invalid
    pub fn destination_or_default(&self) -> DestinationKind {
        self.destination
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the file name as typed (normalized at save time)
    pub fn file_name_or_default(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_BASE_NAME)
    }

    /// Download directory: configured, else the platform's, else the working directory
    pub fn download_dir_or_default(&self) -> PathBuf {
        self.download_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn video_device_or_default(&self) -> &str {
        self.capture
            .as_ref()
            .and_then(|c| c.video_device.as_deref())
            .unwrap_or(DEFAULT_VIDEO_DEVICE)
    }

    pub fn audio_backend_or_default(&self) -> &str {
        self.capture
            .as_ref()
            .and_then(|c| c.audio_backend.as_deref())
            .unwrap_or(DEFAULT_AUDIO_BACKEND)
    }

    pub fn audio_input_or_default(&self) -> &str {
        self.capture
            .as_ref()
            .and_then(|c| c.audio_input.as_deref())
            .unwrap_or(DEFAULT_AUDIO_INPUT)
    }
}
