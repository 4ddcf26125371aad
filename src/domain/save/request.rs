//! Save request value objects

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::error::{InvalidDestinationError, SaveError};

/// Destination kinds the user can pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DestinationKind {
    #[default]
    Download,
    Drive,
    Custom,
}

impl DestinationKind {
    pub const ALL: [DestinationKind; 3] = [Self::Download, Self::Drive, Self::Custom];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Drive => "drive",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DestinationKind {
    type Err = InvalidDestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "download" => Ok(Self::Download),
            "drive" => Ok(Self::Drive),
            "custom" => Ok(Self::Custom),
            _ => Err(InvalidDestinationError {
                input: s.to_string(),
            }),
        }
    }
}

/// Where a recording should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Host-level file save into the download directory
    Download,
    /// Remote drive upload
    Drive,
    /// User-supplied path
    Custom { path: String },
}

impl Destination {
    pub fn kind(&self) -> DestinationKind {
        match self {
            Self::Download => DestinationKind::Download,
            Self::Drive => DestinationKind::Drive,
            Self::Custom { .. } => DestinationKind::Custom,
        }
    }

    /// Build a destination from its kind and an optional custom path
    pub fn from_kind(kind: DestinationKind, custom_path: Option<String>) -> Self {
        match kind {
            DestinationKind::Download => Self::Download,
            DestinationKind::Drive => Self::Drive,
            DestinationKind::Custom => Self::Custom {
                path: custom_path.unwrap_or_default(),
            },
        }
    }
}

/// Transient user intent describing where and how to persist a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub destination: Destination,
    /// Raw name as typed; normalized at save time
    pub file_name: String,
}

impl SaveRequest {
    pub fn new(destination: Destination, file_name: impl Into<String>) -> Self {
        Self {
            destination,
            file_name: file_name.into(),
        }
    }

    /// Local download with the given name
    pub fn download(file_name: impl Into<String>) -> Self {
        Self::new(Destination::Download, file_name)
    }

    /// Check the request before any destination is touched
    pub fn validate(&self) -> Result<(), SaveError> {
        if let Destination::Custom { path } = &self.destination {
            if path.trim().is_empty() {
                return Err(SaveError::MissingPath);
            }
        }
        Ok(())
    }
}

/// Result of a save attempt that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Bytes were written
    Saved { file_name: String, location: PathBuf },
    /// Destination exists but has no backing integration yet
    NotImplemented { message: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}
