//! Status reporting port interface

use crate::domain::status::Status;

/// Port for the single user-facing status channel
pub trait StatusReporter: Send + Sync {
    /// Show a status message, replacing the previous one
    fn report(&self, status: &Status);
}

/// Blanket implementation for boxed reporter types
impl StatusReporter for Box<dyn StatusReporter> {
    fn report(&self, status: &Status) {
        self.as_ref().report(status)
    }
}

/// Shared reporters, so the CLI can keep using its presenter
impl<T: StatusReporter + ?Sized> StatusReporter for std::sync::Arc<T> {
    fn report(&self, status: &Status) {
        self.as_ref().report(status)
    }
}
