//! Recorder app runner

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::application::ports::{ConfigStore, MediaDevices, MediaEncoder, StatusReporter};
use crate::application::{RecordingStudio, SaveRecordingUseCase, StudioConfig};
use crate::domain::capture::MediaConstraints;
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::infrastructure::{
    create_destinations, create_encoder, create_media_devices, XdgConfigStore,
};

use super::args::RecorderOptions;
use super::presenter::Presenter;
use super::signals::{ControlSignal, ControlSignalHandler};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Spinner refresh while recording
const PROGRESS_TICK: StdDuration = StdDuration::from_millis(250);

/// Set up stderr logging. `RUST_LOG` wins over the verbosity flag.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

/// Run the recorder: interactive, or one-shot when a duration was given
pub async fn run_recorder(options: RecorderOptions, config: &AppConfig) -> ExitCode {
    let presenter = Arc::new(Presenter::new());

    let mut signals = match ControlSignalHandler::new() {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let devices = create_media_devices(config);
    let encoder = create_encoder(config);
    let saver = SaveRecordingUseCase::new(create_destinations(config.download_dir_or_default()));
    let studio_config = StudioConfig {
        constraints: MediaConstraints::default(),
        timeslice: config.timeslice_or_default(),
    };
    let mut studio = RecordingStudio::new(
        devices,
        encoder,
        Arc::clone(&presenter),
        saver,
        studio_config,
    );

    if !options.lazy_camera && studio.init_camera().await.is_err() {
        presenter.info("Run 'testimonial-recorder devices' to list cameras and microphones");
    }

    let code = recorder_loop(&mut studio, &mut signals, &presenter, &options).await;
    ExitCode::from(code)
}

/// Drive the studio from control signals until shutdown.
///
/// In one-shot mode recording starts right away and the loop exits after the
/// first clip is saved. In interactive mode a clip whose save failed is kept,
/// and the next Enter retries the save instead of starting over. Returns the
/// process exit code.
pub async fn recorder_loop<D, E, S>(
    studio: &mut RecordingStudio<D, E, S>,
    signals: &mut ControlSignalHandler,
    presenter: &Presenter,
    options: &RecorderOptions,
) -> u8
where
    D: MediaDevices,
    E: MediaEncoder,
    S: StatusReporter,
{
    let limit = options.limit();

    if options.is_one_shot() {
        if !start(studio, presenter).await {
            return EXIT_ERROR;
        }
    } else {
        presenter.info("Press Enter to start/stop recording, Ctrl+C to quit");
    }

    let mut ticker = interval(PROGRESS_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut unsaved = false;

    loop {
        if !studio.is_recording() {
            match signals.recv().await {
                Some(ControlSignal::Toggle) if unsaved => {
                    presenter.info("Retrying save of the last recording");
                    let saved = studio.save_recording(&options.save_request).await.is_ok();
                    unsaved = awaiting_retry(studio, saved, presenter);
                }
                Some(ControlSignal::Toggle) => {
                    start(studio, presenter).await;
                }
                Some(ControlSignal::Shutdown) | None => {
                    if unsaved {
                        presenter.warn("Exiting without saving the last recording");
                        return EXIT_ERROR;
                    }
                    return EXIT_SUCCESS;
                }
            }
            continue;
        }

        let remaining = limit.map(|l| l.as_std().saturating_sub(studio.elapsed().as_std()));

        tokio::select! {
            signal = signals.recv() => {
                let saved = finish(studio, presenter, options).await;
                let shutdown = !matches!(signal, Some(ControlSignal::Toggle));
                if shutdown || options.is_one_shot() {
                    return exit_code(saved);
                }
                unsaved = awaiting_retry(studio, saved, presenter);
            }
            _ = sleep(remaining.unwrap_or(PROGRESS_TICK)), if remaining.is_some() => {
                if !options.is_one_shot() {
                    presenter.warn("Max duration reached, auto-stopping");
                }
                let saved = finish(studio, presenter, options).await;
                if options.is_one_shot() {
                    return exit_code(saved);
                }
                unsaved = awaiting_retry(studio, saved, presenter);
            }
            _ = ticker.tick() => {
                presenter.update_recording_progress(studio.elapsed(), limit);
            }
        }
    }
}

/// Whether a recording is left over after a failed save
fn awaiting_retry<D, E, S>(
    studio: &RecordingStudio<D, E, S>,
    saved: bool,
    presenter: &Presenter,
) -> bool
where
    D: MediaDevices,
    E: MediaEncoder,
    S: StatusReporter,
{
    let pending = !saved && studio.artifact().is_some_and(|a| !a.is_empty());
    if pending {
        presenter.info("Press Enter to retry saving, Ctrl+C to quit");
    }
    pending
}

async fn start<D, E, S>(studio: &mut RecordingStudio<D, E, S>, presenter: &Presenter) -> bool
where
    D: MediaDevices,
    E: MediaEncoder,
    S: StatusReporter,
{
    match studio.start_recording().await {
        Ok(()) => {
            presenter.start_spinner("REC 00:00");
            true
        }
        Err(e) => {
            debug!(error = %e, "start rejected");
            false
        }
    }
}

/// Stop the active recording and save it with the configured request
async fn finish<D, E, S>(
    studio: &mut RecordingStudio<D, E, S>,
    presenter: &Presenter,
    options: &RecorderOptions,
) -> bool
where
    D: MediaDevices,
    E: MediaEncoder,
    S: StatusReporter,
{
    presenter.stop_spinner();
    if studio.stop_recording().await.is_none() {
        return false;
    }
    studio.save_recording(&options.save_request).await.is_ok()
}

fn exit_code(ok: bool) -> u8 {
    if ok {
        EXIT_SUCCESS
    } else {
        EXIT_ERROR
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        AppConfig::empty()
    });

    let env_config = AppConfig {
        download_dir: env::var("TESTIMONIAL_DOWNLOAD_DIR")
            .ok()
            .filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Parse a duration flag or config value, `None` when unset
pub fn parse_optional_duration(value: Option<&str>) -> Result<Option<Duration>, String> {
    value
        .map(|s| s.parse::<Duration>().map_err(|e| e.to_string()))
        .transpose()
}
