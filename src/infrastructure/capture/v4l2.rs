//! Linux capture devices: V4L2 camera node plus a cpal input
//!
//! Acquisition probes the devices the encoder will open so that permission
//! and availability problems surface before recording starts.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use tracing::{debug, info};

use crate::application::ports::{DeviceError, MediaDevices};
use crate::domain::capture::{CaptureSource, MediaConstraints, MediaTrack, TrackKind};
use crate::domain::config::DEFAULT_AUDIO_INPUT;

/// `EBUSY` as reported by drivers that allow a single opener
#[cfg(unix)]
const DEVICE_BUSY: i32 = nix::errno::Errno::EBUSY as i32;

/// V4L2 camera + cpal microphone device provider
pub struct V4l2MediaDevices {
    video_device: PathBuf,
    audio_input: String,
}

impl V4l2MediaDevices {
    /// Create a provider for the given camera node and audio input name
    pub fn new(video_device: impl Into<PathBuf>, audio_input: impl Into<String>) -> Self {
        Self {
            video_device: video_device.into(),
            audio_input: audio_input.into(),
        }
    }

    /// Open the camera node read/write to check it exists and is usable
    fn probe_video(path: &Path) -> Result<MediaTrack, DeviceError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| map_open_error(path, &e))?;

        Ok(MediaTrack::new(
            TrackKind::Video,
            video_label(path),
            path.to_string_lossy(),
        ))
    }

    /// Check the configured input exists and report its name.
    ///
    /// `default` resolves to the host's default input; any other name must
    /// match one of the host's input devices.
    fn probe_audio(input: &str) -> Result<MediaTrack, DeviceError> {
        let host = cpal::default_host();
        let label = if input == DEFAULT_AUDIO_INPUT {
            let device = host.default_input_device().ok_or_else(|| DeviceError::NotFound {
                device: "default audio input".to_string(),
            })?;
            device
                .name()
                .unwrap_or_else(|_| "Default microphone".to_string())
        } else {
            let names: Vec<String> = host
                .input_devices()
                .map_err(|e| DeviceError::Unavailable(e.to_string()))?
                .filter_map(|d| d.name().ok())
                .collect();
            match_input_name(&names, input)
                .ok_or_else(|| DeviceError::NotFound {
                    device: input.to_string(),
                })?
                .to_string()
        };

        Ok(MediaTrack::new(TrackKind::Audio, label, input))
    }
}

impl Default for V4l2MediaDevices {
    fn default() -> Self {
        Self::new(
            crate::domain::config::DEFAULT_VIDEO_DEVICE,
            crate::domain::config::DEFAULT_AUDIO_INPUT,
        )
    }
}

#[async_trait]
impl MediaDevices for V4l2MediaDevices {
    async fn acquire(&self, constraints: MediaConstraints) -> Result<CaptureSource, DeviceError> {
        let video_device = self.video_device.clone();
        let audio_input = self.audio_input.clone();

        // cpal and device probing block; keep them off the async executor
        let tracks = tokio::task::spawn_blocking(move || {
            let mut tracks = Vec::with_capacity(2);
            if constraints.video {
                tracks.push(Self::probe_video(&video_device)?);
            }
            if constraints.audio {
                tracks.push(Self::probe_audio(&audio_input)?);
            }
            Ok::<_, DeviceError>(tracks)
        })
        .await
        .map_err(|e| DeviceError::Unavailable(e.to_string()))??;

        if tracks.is_empty() {
            return Err(DeviceError::Unavailable(
                "no audio or video requested".to_string(),
            ));
        }

        let source = CaptureSource::new(tracks);
        info!(tracks = %source.describe(), "media devices acquired");
        Ok(source)
    }
}

/// Translate an open() failure on a device node into a device error
pub(crate) fn map_open_error(path: &Path, err: &io::Error) -> DeviceError {
    let device = path.to_string_lossy().to_string();
    debug!(%device, error = %err, "device probe failed");

    #[cfg(unix)]
    if err.raw_os_error() == Some(DEVICE_BUSY) {
        return DeviceError::Busy { device };
    }
    match err.kind() {
        io::ErrorKind::NotFound => DeviceError::NotFound { device },
        io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied { device },
        _ => DeviceError::Unavailable(format!("{}: {}", device, err)),
    }
}

/// Find the input device called `wanted`, exact match first, then ignoring case
pub(crate) fn match_input_name<'a>(names: &'a [String], wanted: &str) -> Option<&'a str> {
    let wanted = wanted.trim();
    names
        .iter()
        .find(|name| name.as_str() == wanted)
        .or_else(|| names.iter().find(|name| name.eq_ignore_ascii_case(wanted)))
        .map(String::as_str)
}

/// Driver-provided name from sysfs, falling back to the node path
fn video_label(path: &Path) -> String {
    path.file_name()
        .map(|node| {
            Path::new("/sys/class/video4linux")
                .join(node)
                .join("name")
        })
        .and_then(|name_file| fs::read_to_string(name_file).ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// List V4L2 capture nodes as (path, label), sorted by path
pub fn list_video_devices() -> Vec<(PathBuf, String)> {
    let mut devices: Vec<(PathBuf, String)> = fs::read_dir("/dev")
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("video"))
                })
                .map(|path| {
                    let label = video_label(&path);
                    (path, label)
                })
                .collect()
        })
        .unwrap_or_default();
    devices.sort();
    devices
}

/// List audio input device names known to cpal
pub fn list_audio_inputs() -> Vec<String> {
    let host = cpal::default_host();
    host.input_devices()
        .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}
