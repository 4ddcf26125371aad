//! Save destination adapters

mod local;
mod placeholder;

pub use local::LocalDownload;
pub use placeholder::{CustomPathSave, RemoteDriveUpload};

use std::path::PathBuf;

use crate::application::ports::SaveDestination;

/// One handler per destination kind
pub fn create_destinations(download_dir: impl Into<PathBuf>) -> Vec<Box<dyn SaveDestination>> {
    vec![
        Box::new(LocalDownload::new(download_dir)),
        Box::new(RemoteDriveUpload),
        Box::new(CustomPathSave),
    ]
}
