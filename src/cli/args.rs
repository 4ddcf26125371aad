//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::recording::Duration;
use crate::domain::save::{DestinationKind, SaveRequest};

/// Testimonial Recorder - capture a webcam + microphone clip to WebM
#[derive(Parser, Debug)]
#[command(name = "testimonial-recorder")]
#[command(version)]
#[command(about = "Record a webcam and microphone testimonial to a WebM file")]
#[command(long_about = None)]
pub struct Cli {
    /// Record once for this long, save and exit (e.g., 10s, 1m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Auto-stop interactive recordings after this long
    #[arg(long, value_name = "TIME", conflicts_with = "duration")]
    pub max_duration: Option<String>,

    /// Where to save the recording
    #[arg(short = 's', long, value_name = "DESTINATION")]
    pub save_to: Option<SaveToArg>,

    /// Target path for the custom destination
    #[arg(short = 'p', long, value_name = "PATH")]
    pub path: Option<String>,

    /// File name for the saved clip (".webm" is appended when missing)
    #[arg(short = 'o', long, value_name = "NAME")]
    pub name: Option<String>,

    /// V4L2 camera node
    #[arg(long, value_name = "DEVICE", env = "TESTIMONIAL_VIDEO_DEVICE")]
    pub video_device: Option<String>,

    /// Don't open the camera until the first recording starts
    #[arg(long)]
    pub lazy_camera: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List cameras and microphones
    Devices,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Destination argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SaveToArg {
    Download,
    Drive,
    Custom,
}

impl From<SaveToArg> for DestinationKind {
    fn from(arg: SaveToArg) -> Self {
        match arg {
            SaveToArg::Download => DestinationKind::Download,
            SaveToArg::Drive => DestinationKind::Drive,
            SaveToArg::Custom => DestinationKind::Custom,
        }
    }
}

/// Parsed recorder options
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    /// One-shot length; `None` runs interactively
    pub duration: Option<Duration>,
    /// Auto-stop limit for interactive recordings
    pub max_duration: Option<Duration>,
    /// How each finished clip is saved
    pub save_request: SaveRequest,
    pub lazy_camera: bool,
}

impl RecorderOptions {
    /// Recording length limit in effect, if any
    pub fn limit(&self) -> Option<Duration> {
        self.duration.or(self.max_duration)
    }

    pub fn is_one_shot(&self) -> bool {
        self.duration.is_some()
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "timeslice_ms",
    "max_duration",
    "destination",
    "file_name",
    "download_dir",
    "capture.video_device",
    "capture.audio_backend",
    "capture.audio_input",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["testimonial-recorder"]);
        assert!(cli.duration.is_none());
        assert!(cli.save_to.is_none());
        assert!(cli.name.is_none());
        assert!(!cli.lazy_camera);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_one_shot() {
        let cli = Cli::parse_from([
            "testimonial-recorder",
            "-d",
            "30s",
            "--save-to",
            "custom",
            "--path",
            "/mnt/share",
            "-o",
            "jane",
        ]);
        assert_eq!(cli.duration, Some("30s".to_string()));
        assert_eq!(cli.save_to, Some(SaveToArg::Custom));
        assert_eq!(cli.path, Some("/mnt/share".to_string()));
        assert_eq!(cli.name, Some("jane".to_string()));
    }

    #[test]
    fn duration_conflicts_with_max_duration() {
        let result = Cli::try_parse_from([
            "testimonial-recorder",
            "-d",
            "10s",
            "--max-duration",
            "1m",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_destination_is_rejected() {
        let result = Cli::try_parse_from(["testimonial-recorder", "--save-to", "ftp"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from([
            "testimonial-recorder",
            "config",
            "set",
            "destination",
            "drive",
        ]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "destination");
            assert_eq!(value, "drive");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_parses_devices() {
        let cli = Cli::parse_from(["testimonial-recorder", "devices"]);
        assert!(matches!(cli.command, Some(Commands::Devices)));
    }

    #[test]
    fn save_to_converts_to_destination_kind() {
        assert_eq!(DestinationKind::from(SaveToArg::Drive), DestinationKind::Drive);
        assert_eq!(
            DestinationKind::from(SaveToArg::Download),
            DestinationKind::Download
        );
    }

    #[test]
    fn limit_prefers_one_shot_duration() {
        let options = RecorderOptions {
            duration: Some(Duration::from_secs(5)),
            max_duration: Some(Duration::from_secs(60)),
            save_request: SaveRequest::download("clip"),
            lazy_camera: false,
        };
        assert!(options.is_one_shot());
        assert_eq!(options.limit(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("destination"));
        assert!(is_valid_config_key("capture.video_device"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
