//! Capture source entity

use std::fmt;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kinds of tracks to request from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl MediaConstraints {
    /// Combined camera and microphone access
    pub const fn audio_video() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self::audio_video()
    }
}

/// A single live device track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    kind: TrackKind,
    /// Human-readable device name
    label: String,
    /// Host identifier the encoder opens (device node, input name)
    device: String,
    live: bool,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            device: device.into(),
            live: true,
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Stop the track. Returns whether it was live.
    fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.live, false)
    }
}

/// Handle to a device-provided audio+video stream.
///
/// Once released it cannot be reused; acquire a fresh one instead.
/// Dropping the source releases every track.
#[derive(Debug)]
pub struct CaptureSource {
    tracks: Vec<MediaTrack>,
}

impl CaptureSource {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    /// First track of the given kind, if any
    pub fn track(&self, kind: TrackKind) -> Option<&MediaTrack> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }

    pub fn has_track(&self, kind: TrackKind) -> bool {
        self.track(kind).is_some()
    }

    /// True while at least one track is live
    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(MediaTrack::is_live)
    }

    /// Stop every track. Idempotent.
    ///
    /// Returns whether any track was stopped by this call.
    pub fn release(&mut self) -> bool {
        let mut stopped = false;
        for track in &mut self.tracks {
            stopped |= track.stop();
        }
        stopped
    }

    /// Short description of the tracks, e.g. "video: HD Webcam, audio: default"
    pub fn describe(&self) -> String {
        self.tracks
            .iter()
            .map(|t| format!("{}: {}", t.kind(), t.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Drop for CaptureSource {
    fn drop(&mut self) {
        self.release();
    }
}
