//! FFmpeg-based streaming encoder adapter
//!
//! FFmpeg reads the camera and microphone directly and writes a WebM
//! (VP9 + Opus) stream to its stdout. A pump task slices that stream into
//! chunks once per timeslice.
//!
//! `start` only returns once ffmpeg has produced output (or stayed up for a
//! grace period), so a device that cannot be opened fails the start instead
//! of yielding an empty recording.

use std::collections::VecDeque;
use std::process::Stdio;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::ports::{DeviceError, EncoderError, EncoderHandle, MediaEncoder};
use crate::domain::capture::{CaptureSource, TrackKind};
use crate::domain::recording::{Chunk, Duration, MediaType};

const VIDEO_CODEC: &str = "libvpx-vp9";
const AUDIO_CODEC: &str = "libopus";

/// Read buffer for ffmpeg's stdout
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Queued chunks before the pump waits for the consumer
const CHUNK_QUEUE: usize = 64;

/// Time ffmpeg gets to either write output or fail before it counts as running
const STARTUP_GRACE: StdDuration = StdDuration::from_secs(3);

/// Time allowed for reading the rest of stderr once ffmpeg has died
const STDERR_DRAIN: StdDuration = StdDuration::from_millis(500);

/// stderr lines kept for error reports
const STDERR_TAIL: usize = 8;

/// strerror(EBUSY) as printed by ffmpeg
const BUSY_MARKER: &str = "Device or resource busy";

/// How ffmpeg behaved right after spawning
#[derive(Debug)]
enum Startup {
    /// First bytes of the stream
    Output(Vec<u8>),
    /// Still running but nothing written yet
    Quiet,
    /// Exited (or closed its output) with this status
    Exited(String),
}

/// Streaming WebM encoder backed by an ffmpeg child process
pub struct FfmpegEncoder {
    program: String,
    audio_backend: String,
}

impl FfmpegEncoder {
    /// Create an encoder reading audio through the given ffmpeg input format
    /// (e.g. "pulse", "alsa")
    pub fn new(audio_backend: impl Into<String>) -> Self {
        Self::with_program("ffmpeg", audio_backend)
    }

    /// Create an encoder using a specific ffmpeg executable
    pub fn with_program(program: impl Into<String>, audio_backend: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            audio_backend: audio_backend.into(),
        }
    }

    /// Build FFmpeg args for the tracks present in the source
    fn build_ffmpeg_args(&self, video_device: Option<&str>, audio_input: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostats"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(device) = video_device {
            args.extend(["-f", "v4l2", "-i", device].map(String::from));
        }
        if let Some(input) = audio_input {
            args.extend(["-f", self.audio_backend.as_str(), "-i", input].map(String::from));
        }

        if video_device.is_some() {
            args.extend(
                [
                    "-c:v", VIDEO_CODEC,
                    "-deadline", "realtime",
                    "-cpu-used", "8",
                    "-row-mt", "1",
                    "-b:v", "1M",
                ]
                .map(String::from),
            );
        }
        if audio_input.is_some() {
            args.extend(["-c:a", AUDIO_CODEC, "-b:a", "96k"].map(String::from));
        }

        args.extend(["-f", "webm", "pipe:1"].map(String::from));
        args
    }

    /// Check that this ffmpeg build ships the encoders we need
    async fn check_codecs(&self, need_video: bool, need_audio: bool) -> Result<(), EncoderError> {
        let output = Command::new(&self.program)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::EncoderNotFound
                } else {
                    EncoderError::StartFailed(e.to_string())
                }
            })?;

        let listing = String::from_utf8_lossy(&output.stdout);
        let required = [(need_video, VIDEO_CODEC), (need_audio, AUDIO_CODEC)];
        for (needed, codec) in required {
            if needed && !listing.contains(codec) {
                return Err(EncoderError::UnsupportedCodec(codec.to_string()));
            }
        }
        Ok(())
    }

    /// Spawn FFmpeg process
    fn spawn_ffmpeg(&self, args: &[String]) -> Result<Child, EncoderError> {
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::EncoderNotFound
                } else {
                    EncoderError::StartFailed(e.to_string())
                }
            })
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new(crate::domain::config::DEFAULT_AUDIO_BACKEND)
    }
}

#[async_trait]
impl MediaEncoder for FfmpegEncoder {
    fn media_type(&self) -> MediaType {
        MediaType::Webm
    }

    async fn start(
        &self,
        source: &CaptureSource,
        timeslice: Duration,
    ) -> Result<EncoderHandle, EncoderError> {
        if !source.is_live() {
            return Err(EncoderError::SourceNotLive);
        }

        let video = source
            .track(TrackKind::Video)
            .filter(|t| t.is_live())
            .map(|t| t.device().to_string());
        let audio = source
            .track(TrackKind::Audio)
            .filter(|t| t.is_live())
            .map(|t| t.device().to_string());

        self.check_codecs(video.is_some(), audio.is_some()).await?;

        let args = self.build_ffmpeg_args(video.as_deref(), audio.as_deref());
        debug!(program = %self.program, ?args, "spawning ffmpeg");
        let mut child = self.spawn_ffmpeg(&args)?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| EncoderError::StartFailed("ffmpeg stdout not captured".to_string()))?;
        let stderr_task = child.stderr.take().map(|e| tokio::spawn(forward_stderr(e)));

        let pending = match await_startup(&mut child, &mut stdout).await {
            Startup::Output(bytes) => bytes,
            Startup::Quiet => {
                debug!("no ffmpeg output yet, treating it as running");
                Vec::new()
            }
            Startup::Exited(status) => {
                let stderr = match stderr_task {
                    Some(task) => timeout(STDERR_DRAIN, task)
                        .await
                        .ok()
                        .and_then(Result::ok)
                        .unwrap_or_default(),
                    None => Vec::new(),
                };
                warn!(%status, ?stderr, "ffmpeg exited during startup");
                return Err(startup_error(
                    &status,
                    &stderr,
                    video.as_deref(),
                    audio.as_deref(),
                ));
            }
        };

        let (chunk_tx, chunk_rx) = mpsc::channel(CHUNK_QUEUE);
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(pump(child, stdout, pending, chunk_tx, stop_rx, timeslice));

        info!(video = ?video, audio = ?audio, "ffmpeg encoder started");
        Ok(EncoderHandle::new(chunk_rx, stop_tx))
    }
}

/// Wait until ffmpeg writes its first bytes, exits, or the grace period ends
async fn await_startup(child: &mut Child, stdout: &mut ChildStdout) -> Startup {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    tokio::select! {
        read = stdout.read(&mut buf) => match read {
            Ok(n) if n > 0 => {
                buf.truncate(n);
                Startup::Output(buf)
            }
            Ok(_) => Startup::Exited(exit_status(child).await),
            Err(e) => Startup::Exited(e.to_string()),
        },
        status = child.wait() => Startup::Exited(match status {
            Ok(status) => status.to_string(),
            Err(e) => e.to_string(),
        }),
        _ = sleep(STARTUP_GRACE) => Startup::Quiet,
    }
}

/// Exit status of a child that has closed its stdout
async fn exit_status(child: &mut Child) -> String {
    match timeout(STARTUP_GRACE, child.wait()).await {
        Ok(Ok(status)) => status.to_string(),
        Ok(Err(e)) => e.to_string(),
        Err(_) => "closed its output".to_string(),
    }
}

/// Turn an early ffmpeg exit into an encoder error.
///
/// A busy capture device becomes `DeviceError::Busy`; ffmpeg names the input
/// it failed to open at the start of the line.
fn startup_error(
    status: &str,
    stderr: &[String],
    video_device: Option<&str>,
    audio_input: Option<&str>,
) -> EncoderError {
    let busy: Vec<&String> = stderr.iter().filter(|l| l.contains(BUSY_MARKER)).collect();
    if !busy.is_empty() {
        let device = [video_device, audio_input]
            .into_iter()
            .flatten()
            .find(|device| busy.iter().any(|line| line.starts_with(device)))
            .or(video_device)
            .or(audio_input)
            .unwrap_or("capture device");
        return DeviceError::Busy {
            device: device.to_string(),
        }
        .into();
    }

    if stderr.is_empty() {
        EncoderError::StartFailed(format!("ffmpeg exited ({})", status))
    } else {
        EncoderError::StartFailed(format!("ffmpeg exited ({}): {}", status, stderr.join("; ")))
    }
}

/// Slice the child's stdout into chunks until it reaches EOF.
///
/// `pending` holds bytes already read during startup. On stop (or when the
/// stop sender is dropped) the child is interrupted so it can finalize the
/// container; everything it still writes is delivered before the channel
/// closes.
async fn pump(
    mut child: Child,
    mut stdout: ChildStdout,
    mut pending: Vec<u8>,
    chunks: mpsc::Sender<Chunk>,
    mut stop: oneshot::Receiver<()>,
    timeslice: Duration,
) {
    let mut ticker = interval(timeslice.as_std());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut stopping = false;

    loop {
        tokio::select! {
            read = stdout.read(&mut buf) => match read {
                Ok(0) => break,
                Ok(n) => pending.extend_from_slice(&buf[..n]),
                Err(e) => {
                    warn!(error = %e, "reading ffmpeg output failed");
                    break;
                }
            },
            _ = ticker.tick() => {
                let chunk = Chunk::new(std::mem::take(&mut pending));
                if chunks.send(chunk).await.is_err() {
                    debug!("chunk consumer gone");
                    break;
                }
            },
            _ = &mut stop, if !stopping => {
                stopping = true;
                interrupt(&mut child);
            }
        }
    }

    if !pending.is_empty() {
        let _ = chunks.send(Chunk::new(pending)).await;
    }

    match child.wait().await {
        Ok(status) if status.success() || stopping => debug!(%status, "ffmpeg exited"),
        Ok(status) => warn!(%status, "ffmpeg exited before stop was requested"),
        Err(e) => warn!(error = %e, "waiting for ffmpeg failed"),
    }
}

/// Ask ffmpeg to finish writing and exit
#[cfg(unix)]
fn interrupt(child: &mut Child) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    if let Some(id) = child.id() {
        if let Err(e) = signal::kill(Pid::from_raw(id as i32), Signal::SIGINT) {
            warn!(error = %e, "failed to interrupt ffmpeg");
        }
    }
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!(error = %e, "failed to stop ffmpeg");
    }
}

/// Log ffmpeg's stderr and return its last lines once it closes
async fn forward_stderr(stderr: ChildStderr) -> Vec<String> {
    let mut tail = VecDeque::with_capacity(STDERR_TAIL);
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(target: "ffmpeg", "{}", line);
        if tail.len() == STDERR_TAIL {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    tail.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::MediaTrack;

    fn source() -> CaptureSource {
        CaptureSource::new(vec![
            MediaTrack::new(TrackKind::Video, "cam", "/dev/video0"),
            MediaTrack::new(TrackKind::Audio, "mic", "default"),
        ])
    }

    #[test]
    fn args_for_audio_and_video() {
        let encoder = FfmpegEncoder::new("pulse");
        let args = encoder.build_ffmpeg_args(Some("/dev/video0"), Some("default"));
        let joined = args.join(" ");

        assert!(joined.contains("-f v4l2 -i /dev/video0"));
        assert!(joined.contains("-f pulse -i default"));
        assert!(joined.contains("-c:v libvpx-vp9"));
        assert!(joined.contains("-c:a libopus"));
        assert!(joined.ends_with("-f webm pipe:1"));
    }

    #[test]
    fn args_for_audio_only() {
        let encoder = FfmpegEncoder::new("alsa");
        let joined = encoder.build_ffmpeg_args(None, Some("hw:1")).join(" ");

        assert!(!joined.contains("v4l2"));
        assert!(!joined.contains("libvpx-vp9"));
        assert!(joined.contains("-f alsa -i hw:1"));
    }

    #[tokio::test]
    async fn missing_ffmpeg_is_reported() {
        let encoder = FfmpegEncoder::with_program("/nonexistent/ffmpeg", "pulse");
        let err = encoder
            .start(&source(), Duration::default_timeslice())
            .await
            .unwrap_err();
        assert_eq!(err, EncoderError::EncoderNotFound);
    }

    #[tokio::test]
    async fn released_source_is_rejected() {
        let encoder = FfmpegEncoder::default();
        let mut source = source();
        source.release();

        let err = encoder
            .start(&source, Duration::default_timeslice())
            .await
            .unwrap_err();
        assert_eq!(err, EncoderError::SourceNotLive);
    }

    #[test]
    fn busy_input_maps_to_busy_device() {
        let stderr = vec![
            "[video4linux2,v4l2 @ 0x5581] ioctl(VIDIOC_STREAMON): Device or resource busy".to_string(),
            "/dev/video0: Device or resource busy".to_string(),
        ];
        let err = startup_error("exit status: 1", &stderr, Some("/dev/video0"), Some("default"));
        assert_eq!(
            err,
            EncoderError::Device(DeviceError::Busy {
                device: "/dev/video0".into()
            })
        );
    }

    #[test]
    fn busy_audio_input_is_named() {
        let stderr = vec!["hw:1: Device or resource busy".to_string()];
        let err = startup_error("exit status: 1", &stderr, Some("/dev/video0"), Some("hw:1"));
        assert_eq!(
            err,
            EncoderError::Device(DeviceError::Busy {
                device: "hw:1".into()
            })
        );
    }

    #[test]
    fn other_early_exit_carries_stderr() {
        let stderr = vec!["default: No such process".to_string()];
        let err = startup_error("exit status: 1", &stderr, None, Some("default"));
        assert_eq!(
            err,
            EncoderError::StartFailed(
                "ffmpeg exited (exit status: 1): default: No such process".into()
            )
        );

        let err = startup_error("exit status: 1", &[], None, Some("default"));
        assert_eq!(err, EncoderError::StartFailed("ffmpeg exited (exit status: 1)".into()));
    }

    /// Write an executable stand-in for ffmpeg that lists the needed encoders
    /// and otherwise runs `body`
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &tempfile::TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("ffmpeg");
        let script = format!(
            "#!/bin/sh\ncase \"$*\" in\n  *-encoders*) echo ' V..... libvpx-vp9'; echo ' A..... libopus'; exit 0 ;;\nesac\n{}\n",
            body
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn ffmpeg_dying_on_busy_camera_fails_start() {
        let dir = tempfile::TempDir::new().unwrap();
        let program = fake_ffmpeg(
            &dir,
            "echo '/dev/video0: Device or resource busy' >&2\nexit 1",
        );
        let encoder = FfmpegEncoder::with_program(program, "pulse");

        let err = encoder
            .start(&source(), Duration::default_timeslice())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EncoderError::Device(DeviceError::Busy {
                device: "/dev/video0".into()
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_stays_idle_when_ffmpeg_dies() {
        use crate::application::RecordingSession;
        use crate::domain::recording::SessionState;

        let dir = tempfile::TempDir::new().unwrap();
        let program = fake_ffmpeg(&dir, "echo 'default: Connection refused' >&2\nexit 1");
        let encoder = FfmpegEncoder::with_program(program, "pulse");
        let mut session = RecordingSession::new();

        let result = session
            .start(&encoder, source(), Duration::default_timeslice())
            .await;

        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.stop().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn running_ffmpeg_streams_until_stopped() {
        let dir = tempfile::TempDir::new().unwrap();
        let program = fake_ffmpeg(&dir, "printf WEBM\nexec sleep 30");
        let encoder = FfmpegEncoder::with_program(program, "pulse");

        let handle = encoder
            .start(&source(), Duration::from_millis(20))
            .await
            .unwrap();
        let (mut chunks, stop) = handle.into_parts();
        stop.send(()).unwrap();

        let mut bytes = Vec::new();
        while let Some(chunk) = chunks.recv().await {
            bytes.extend_from_slice(chunk.data());
        }
        assert_eq!(bytes, b"WEBM");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pump_delivers_output_then_closes_after_stop() {
        let mut child = Command::new("sh")
            .args(["-c", "printf hello; exec sleep 30"])
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .unwrap();
        let stdout = child.stdout.take().unwrap();

        let (tx, mut rx) = mpsc::channel(CHUNK_QUEUE);
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(pump(
            child,
            stdout,
            b"head-".to_vec(),
            tx,
            stop_rx,
            Duration::from_millis(20),
        ));

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        stop_tx.send(()).unwrap();

        let mut bytes = Vec::new();
        while let Some(chunk) = rx.recv().await {
            bytes.extend_from_slice(chunk.data());
        }
        assert_eq!(bytes, b"head-hello");
    }
}
