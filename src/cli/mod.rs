//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, control signal handling,
//! and the recorder runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod devices_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_recorder, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecorderOptions, SaveToArg};
pub use presenter::Presenter;
pub use signals::{ControlSignal, ControlSignalHandler};
