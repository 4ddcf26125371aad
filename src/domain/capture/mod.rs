//! Capture domain module

mod source;

pub use source::{CaptureSource, MediaConstraints, MediaTrack, TrackKind};
