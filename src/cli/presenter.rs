//! CLI presenter for output formatting

use std::sync::Mutex;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::StatusReporter;
use crate::domain::recording::Duration;
use crate::domain::status::{Status, StatusLevel};

/// Presenter for CLI output formatting.
///
/// Status lines go to stderr; only command output (config values, device
/// lists) goes to stdout.
pub struct Presenter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.red} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));

        if let Some(previous) = self.lock_spinner().replace(spinner) {
            previous.finish_and_clear();
        }
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(spinner) = self.lock_spinner().as_ref() {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&self) {
        if let Some(spinner) = self.lock_spinner().take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_line(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_line(format!("{} {}", "✓".green(), message.green()));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print_line(format!("{} {}", "⚠".yellow(), message.yellow()));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_line(format!("{} {}", "✗".red(), message.red()));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Format elapsed recording time, with the limit when there is one
    pub fn format_elapsed(&self, elapsed: Duration, limit: Option<Duration>) -> String {
        let clock = |d: Duration| format!("{:02}:{:02}", d.as_secs() / 60, d.as_secs() % 60);
        match limit {
            Some(limit) => format!("{} / {}", clock(elapsed), clock(limit)),
            None => clock(elapsed),
        }
    }

    /// Update the recording spinner with elapsed time
    pub fn update_recording_progress(&self, elapsed: Duration, limit: Option<Duration>) {
        let progress = self.format_elapsed(elapsed, limit);
        self.update_spinner(&format!("{} {}", "REC".red().bold(), progress));
    }

    fn print_line(&self, line: String) {
        match self.lock_spinner().as_ref() {
            Some(spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    fn lock_spinner(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for Presenter {
    fn report(&self, status: &Status) {
        match status.level {
            StatusLevel::Success => self.success(&status.message),
            StatusLevel::Warning => self.warn(&status.message),
            StatusLevel::Error => self.error(&status.message),
        }
    }
}
