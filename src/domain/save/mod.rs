//! Save domain module

mod file_name;
mod request;

pub use file_name::{FileName, DEFAULT_BASE_NAME};
pub use request::{Destination, DestinationKind, SaveOutcome, SaveRequest};
