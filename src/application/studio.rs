//! Recording studio: the application context that ties capture, recording
//! and saving together and reports every outcome on the status channel.

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::capture::{CaptureSource, MediaConstraints};
use crate::domain::error::SaveError;
use crate::domain::recording::{
    Duration, InvalidStateTransition, RecordingArtifact, SessionState,
};
use crate::domain::save::{SaveOutcome, SaveRequest};
use crate::domain::status::Status;

use super::ports::{DeviceError, EncoderError, MediaDevices, MediaEncoder, StatusReporter};
use super::save::SaveRecordingUseCase;
use super::session::{RecordingSession, SessionError};

/// Errors from studio operations
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Configuration for the studio
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Tracks to request on acquisition
    pub constraints: MediaConstraints,
    /// Chunk delivery interval
    pub timeslice: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            constraints: MediaConstraints::default(),
            timeslice: Duration::default_timeslice(),
        }
    }
}

/// Summary of a finished recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingSummary {
    pub duration: Duration,
    pub size_bytes: usize,
}

/// Application context owning the live source, the current session and the
/// last finished recording.
///
/// Only one recording can be active at a time.
pub struct RecordingStudio<D, E, S>
where
    D: MediaDevices,
    E: MediaEncoder,
    S: StatusReporter,
{
    devices: D,
    encoder: E,
    reporter: S,
    saver: SaveRecordingUseCase,
    config: StudioConfig,
    source: Option<CaptureSource>,
    session: Option<RecordingSession>,
    artifact: Option<RecordingArtifact>,
}

impl<D, E, S> RecordingStudio<D, E, S>
where
    D: MediaDevices,
    E: MediaEncoder,
    S: StatusReporter,
{
    /// Create a new studio instance
    pub fn new(
        devices: D,
        encoder: E,
        reporter: S,
        saver: SaveRecordingUseCase,
        config: StudioConfig,
    ) -> Self {
        Self {
            devices,
            encoder,
            reporter,
            saver,
            config,
            source: None,
            session: None,
            artifact: None,
        }
    }

    /// Current recording state (idle when no session was ever started)
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(RecordingSession::state)
            .unwrap_or_default()
    }

    pub fn is_recording(&self) -> bool {
        self.state() == SessionState::Recording
    }

    /// Whether a live capture source is held for preview
    pub fn has_live_source(&self) -> bool {
        self.source.as_ref().is_some_and(CaptureSource::is_live)
    }

    /// The live capture source, if one is held
    pub fn source(&self) -> Option<&CaptureSource> {
        self.source.as_ref().filter(|s| s.is_live())
    }

    /// The last finished recording, until the next start discards it
    pub fn artifact(&self) -> Option<&RecordingArtifact> {
        self.artifact.as_ref()
    }

    /// Elapsed time of the current (or last) session
    pub fn elapsed(&self) -> Duration {
        self.session
            .as_ref()
            .map(RecordingSession::elapsed)
            .unwrap_or(Duration::from_millis(0))
    }

    /// Acquire the camera and microphone up front so they are ready for preview.
    pub async fn init_camera(&mut self) -> Result<(), StudioError> {
        match self.acquire_source().await {
            Ok(()) => {
                self.reporter
                    .report(&Status::success("Camera and microphone ready"));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "error accessing media devices");
                self.reporter.report(&Status::error(format!(
                    "Error accessing camera or microphone: {}",
                    e
                )));
                Err(e.into())
            }
        }
    }

    /// Start a new recording.
    ///
    /// Acquires a source if none is live and discards the previous recording.
    /// Rejected while another recording is active.
    pub async fn start_recording(&mut self) -> Result<(), StudioError> {
        match self.try_start().await {
            Ok(()) => {
                self.reporter.report(&Status::warning("Recording started..."));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "error starting recording");
                self.reporter
                    .report(&Status::error(format!("Error starting recording: {}", e)));
                Err(e)
            }
        }
    }

    async fn try_start(&mut self) -> Result<(), StudioError> {
        if let Some(session) = &self.session {
            if session.is_recording() {
                return Err(SessionError::from(InvalidStateTransition {
                    current_state: SessionState::Recording,
                    action: "start recording".to_string(),
                })
                .into());
            }
        }

        if !self.has_live_source() {
            self.acquire_source().await?;
        }
        let source = self
            .source
            .take()
            .ok_or_else(|| DeviceError::Unavailable("no capture source".to_string()))?;

        self.artifact = None;
        let mut session = RecordingSession::new();
        session
            .start(&self.encoder, source, self.config.timeslice)
            .await
            .map_err(|e| match e {
                SessionError::Encoder(EncoderError::Device(device)) => StudioError::Device(device),
                other => other.into(),
            })?;
        self.session = Some(session);

        Ok(())
    }

    /// Stop the active recording.
    ///
    /// Returns `None` when nothing was recording.
    pub async fn stop_recording(&mut self) -> Option<RecordingSummary> {
        let session = self.session.as_mut()?;
        let artifact = session.stop().await?;

        let summary = RecordingSummary {
            duration: artifact.duration(),
            size_bytes: artifact.size_bytes(),
        };
        self.reporter.report(&Status::success(format!(
            "Recording stopped. Duration: {}",
            summary.duration.seconds_label()
        )));
        self.artifact = Some(artifact);

        Some(summary)
    }

    /// Save the last finished recording.
    pub async fn save_recording(&mut self, request: &SaveRequest) -> Result<SaveOutcome, StudioError> {
        match self.saver.execute(self.artifact.as_ref(), request).await {
            Ok(outcome) => {
                let status = match &outcome {
                    SaveOutcome::Saved {
                        file_name,
                        location,
                    } => Status::success(format!(
                        "Video saved as {} in {}",
                        file_name,
                        location.display()
                    )),
                    SaveOutcome::NotImplemented { message } => Status::warning(message.clone()),
                };
                self.reporter.report(&status);
                Ok(outcome)
            }
            Err(e) => {
                let message = match &e {
                    SaveError::NothingToSave | SaveError::MissingPath => e.to_string(),
                    other => format!("Error saving recording: {}", other),
                };
                warn!(error = %e, "error saving recording");
                self.reporter.report(&Status::error(message));
                Err(e.into())
            }
        }
    }

    async fn acquire_source(&mut self) -> Result<(), DeviceError> {
        let source = self.devices.acquire(self.config.constraints).await?;
        debug!(tracks = %source.describe(), "capture source acquired");
        self.source = Some(source);
        Ok(())
    }
}
