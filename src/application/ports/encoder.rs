//! Media encoder port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::capture::DeviceError;
use crate::domain::capture::CaptureSource;
use crate::domain::recording::{Chunk, Duration, MediaType};

/// Encoder errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    #[error("ffmpeg not found. Please install ffmpeg.")]
    EncoderNotFound,

    #[error("Capture source is not live")]
    SourceNotLive,

    #[error("Failed to start encoder: {0}")]
    StartFailed(String),

    /// The encoder could not open a capture device
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// A running encoder.
///
/// Chunks arrive in delivery order. Once the stop trigger fires (or is
/// dropped) the encoder delivers whatever it still holds and then closes the
/// channel; channel closure is the flush-complete signal.
#[derive(Debug)]
pub struct EncoderHandle {
    chunks: mpsc::Receiver<Chunk>,
    stop: oneshot::Sender<()>,
}

impl EncoderHandle {
    pub fn new(chunks: mpsc::Receiver<Chunk>, stop: oneshot::Sender<()>) -> Self {
        Self { chunks, stop }
    }

    /// Split into the chunk receiver and the stop trigger
    pub fn into_parts(self) -> (mpsc::Receiver<Chunk>, oneshot::Sender<()>) {
        (self.chunks, self.stop)
    }
}

/// Port for streaming encoders
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    /// Declared media type of the encoded output
    fn media_type(&self) -> MediaType;

    /// Start encoding the tracks of `source`, delivering a chunk every `timeslice`.
    ///
    /// Fails instead of returning a handle when the encoder cannot get going,
    /// for example because a device is held by another process.
    async fn start(
        &self,
        source: &CaptureSource,
        timeslice: Duration,
    ) -> Result<EncoderHandle, EncoderError>;
}
