//! User-facing download notifications.

use std::path::PathBuf;

use super::DownloadState;

/// A message for the user about a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The request is about to be sent
    Preparing,
    /// The PDF arrived and is being converted
    Converting,
    /// The file was saved
    Done {
        /// Saved location
        path: PathBuf,
    },
    /// Something went wrong; nothing was saved
    Failed {
        /// Text to show the user
        message: String,
        /// The PDF needs a password
        password_protected: bool,
    },
}

impl Notification {
    /// Whether this reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Notification::Failed { .. })
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::Preparing => f.write_str("Preparing download..."),
            Notification::Converting => f.write_str("Converting to Word..."),
            Notification::Done { path } => write!(f, "Saved {}", path.display()),
            Notification::Failed { message, .. } => f.write_str(message),
        }
    }
}

/// Receives notifications and state changes.
pub trait Notifier: Send + Sync {
    /// Show a notification.
    fn notify(&self, notification: &Notification);

    /// Called after every state transition.
    fn on_state_change(&self, from: DownloadState, to: DownloadState) {
        let _ = (from, to);
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::Failed { .. } => log::error!("{}", notification),
            _ => log::info!("{}", notification),
        }
    }

    fn on_state_change(&self, from: DownloadState, to: DownloadState) {
        log::debug!("Download state {} -> {}", from, to);
    }
}
