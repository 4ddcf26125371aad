//! Testimonial Recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;

use testimonial_recorder::cli::{
    app::{init_tracing, load_merged_config, parse_optional_duration, run_recorder},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    devices_cmd::handle_devices_command,
    presenter::Presenter,
    RecorderOptions, EXIT_ERROR, EXIT_USAGE_ERROR,
};
use testimonial_recorder::domain::config::{AppConfig, CaptureConfig};
use testimonial_recorder::domain::save::{Destination, DestinationKind, SaveRequest};
use testimonial_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Devices) => {
            handle_devices_command(&presenter).await;
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    let duration = match parse_optional_duration(cli.duration.as_deref()) {
        Ok(d) => d,
        Err(e) => {
            presenter.error(&format!("Invalid duration: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        max_duration: cli.max_duration.clone(),
        destination: cli.save_to.map(|d| DestinationKind::from(d).to_string()),
        file_name: cli.name.clone(),
        capture: cli.video_device.clone().map(|device| CaptureConfig {
            video_device: Some(device),
            ..Default::default()
        }),
        ..Default::default()
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    let max_duration = match parse_optional_duration(config.max_duration.as_deref()) {
        Ok(d) => d,
        Err(e) => {
            presenter.error(&format!("Invalid max-duration: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    // Reject an unusable save target before anything is recorded
    let destination = Destination::from_kind(config.destination_or_default(), cli.path.clone());
    let save_request = SaveRequest::new(destination, config.file_name_or_default());
    if let Err(e) = save_request.validate() {
        presenter.error(&format!("Invalid save target: {}", e));
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let options = RecorderOptions {
        duration,
        max_duration,
        save_request,
        lazy_camera: cli.lazy_camera,
    };

    run_recorder(options, &config).await
}
