//! Recording session: drives an encoder over a capture source and
//! assembles the delivered chunks into an artifact.

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::domain::capture::CaptureSource;
use crate::domain::recording::{
    ChunkSequence, Duration, InvalidStateTransition, MediaType, RecordingArtifact,
    SessionLifecycle, SessionState,
};

use super::ports::{EncoderError, MediaEncoder};

/// Errors from starting a recording session
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// One recording, from start to finished artifact.
///
/// The session owns its capture source while recording and releases it on
/// stop (or on drop). Once stopped it accepts no further operations; a new
/// recording needs a new session.
#[derive(Debug)]
pub struct RecordingSession {
    lifecycle: SessionLifecycle,
    media_type: MediaType,
    source: Option<CaptureSource>,
    stop: Option<oneshot::Sender<()>>,
    collector: Option<JoinHandle<ChunkSequence>>,
    started_at: Option<Instant>,
    duration: Option<Duration>,
}

impl RecordingSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            lifecycle: SessionLifecycle::new(),
            media_type: MediaType::default(),
            source: None,
            stop: None,
            collector: None,
            started_at: None,
            duration: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn is_recording(&self) -> bool {
        self.lifecycle.is_recording()
    }

    /// Elapsed time while recording, or the final duration once stopped
    pub fn elapsed(&self) -> Duration {
        if let Some(duration) = self.duration {
            return duration;
        }
        self.started_at
            .map(|start| Duration::from_std(start.elapsed()))
            .unwrap_or(Duration::from_millis(0))
    }

    /// Transition Idle -> Recording.
    ///
    /// Takes ownership of `source`. On failure the session stays idle and the
    /// source is released when dropped.
    pub async fn start<E>(
        &mut self,
        encoder: &E,
        source: CaptureSource,
        timeslice: Duration,
    ) -> Result<(), SessionError>
    where
        E: MediaEncoder + ?Sized,
    {
        if !self.lifecycle.is_idle() {
            return Err(InvalidStateTransition {
                current_state: self.lifecycle.state(),
                action: "start recording".to_string(),
            }
            .into());
        }
        if !source.is_live() {
            return Err(EncoderError::SourceNotLive.into());
        }

        let handle = encoder.start(&source, timeslice).await?;
        self.lifecycle.begin()?;

        let (mut chunks, stop) = handle.into_parts();
        let collector = tokio::spawn(async move {
            let mut sequence = ChunkSequence::new();
            while let Some(chunk) = chunks.recv().await {
                if !sequence.push(chunk) {
                    trace!("dropped empty chunk");
                }
            }
            sequence
        });

        self.media_type = encoder.media_type();
        self.started_at = Some(Instant::now());
        self.stop = Some(stop);
        self.collector = Some(collector);
        info!(
            tracks = %source.describe(),
            timeslice_ms = timeslice.as_millis(),
            "recording started"
        );
        self.source = Some(source);

        Ok(())
    }

    /// Transition Recording -> Stopped and return the finished artifact.
    ///
    /// No-op (returns `None`) unless currently recording.
    pub async fn stop(&mut self) -> Option<RecordingArtifact> {
        if !self.lifecycle.is_recording() {
            debug!(state = %self.lifecycle.state(), "stop ignored");
            return None;
        }

        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(mut source) = self.source.take() {
            source.release();
        }

        // The collector finishes once the encoder has delivered its last chunk
        // and closed the channel.
        let chunks = match self.collector.take() {
            Some(collector) => collector.await.unwrap_or_else(|e| {
                warn!(error = %e, "chunk collector failed");
                ChunkSequence::new()
            }),
            None => ChunkSequence::new(),
        };

        let duration = self
            .started_at
            .map(|start| Duration::from_std(start.elapsed()))
            .unwrap_or(Duration::from_millis(0));
        self.duration = Some(duration);
        let _ = self.lifecycle.finish();

        info!(
            chunks = chunks.len(),
            bytes = chunks.total_bytes(),
            duration_ms = duration.as_millis(),
            "recording finalized"
        );

        Some(RecordingArtifact::assemble(chunks, self.media_type, duration))
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
