//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown save destination is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid destination: \"{input}\". Valid destinations are: download, drive, custom")]
pub struct InvalidDestinationError {
    pub input: String,
}

/// Errors from saving a recording
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("No recording to save")]
    NothingToSave,

    #[error("Please enter a custom path")]
    MissingPath,

    #[error("No handler registered for destination '{0}'")]
    UnsupportedDestination(String),

    #[error("Failed to write recording: {0}")]
    WriteFailed(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
