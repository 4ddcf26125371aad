//! Control signals for the interactive recorder

use std::io::BufRead;

use colored::Colorize;
use tokio::sync::mpsc;
use tracing::debug;

/// Control input for the recorder loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Enter pressed: start if idle, stop if recording
    Toggle,
    /// SIGINT/SIGTERM: finish up and exit
    Shutdown,
}

/// Merges stdin and OS shutdown signals into one channel
pub struct ControlSignalHandler {
    receiver: mpsc::Receiver<ControlSignal>,
}

impl ControlSignalHandler {
    /// Start listening for Enter on stdin and for SIGINT/SIGTERM.
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        // A plain thread: a pending blocking read must not hold up runtime shutdown
        let tx_stdin = tx.clone();
        std::thread::Builder::new()
            .name("stdin-control".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    if line.is_err() || tx_stdin.blocking_send(ControlSignal::Toggle).is_err() {
                        break;
                    }
                }
                debug!("stdin closed");
            })?;

        Self::listen_for_shutdown(tx)?;
        Ok(Self { receiver: rx })
    }

    /// Build a handler fed by an existing channel
    pub fn from_receiver(receiver: mpsc::Receiver<ControlSignal>) -> Self {
        Self { receiver }
    }

    #[cfg(unix)]
    fn listen_for_shutdown(tx: mpsc::Sender<ControlSignal>) -> Result<(), std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
            let _ = tx_int.send(ControlSignal::Shutdown).await;
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
            let _ = tx.send(ControlSignal::Shutdown).await;
        });

        Ok(())
    }

    #[cfg(not(unix))]
    fn listen_for_shutdown(tx: mpsc::Sender<ControlSignal>) -> Result<(), std::io::Error> {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("{} Received Ctrl+C (shutdown)", "↓".cyan());
                let _ = tx.send(ControlSignal::Shutdown).await;
            }
        });
        Ok(())
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<ControlSignal> {
        self.receiver.recv().await
    }
}
