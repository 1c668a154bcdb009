//! Transient user notifications (toasts).
//!
//! Every success and failure outcome of the editor, the navigation guard and
//! the workspace is reported as a headline/description pair. Notifications are
//! observational only; no core decision depends on them.

use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::error::{FailureKind, SlateError};

/// Outcome of the operation being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Failure,
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub headline: String,
    pub description: String,
}

impl Notification {
    pub fn success(headline: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            headline: headline.into(),
            description: description.into(),
        }
    }

    pub fn failure(headline: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Failure,
            headline: headline.into(),
            description: description.into(),
        }
    }

    /// Failure toast for an error that escaped a store call.
    ///
    /// Transport problems get a generic network headline so they read
    /// differently from errors the store itself reported.
    pub fn from_error(action: &str, error: &SlateError) -> Self {
        match error.kind() {
            FailureKind::Transport => Self::failure(
                "Network error",
                format!("Could not reach the server while trying to {action}. Please try again."),
            ),
            FailureKind::Store => Self::failure("An error occurred", error.to_string()),
            FailureKind::Validation => match error {
                SlateError::InvalidInput { reason, .. } => Self::failure("Invalid input", reason),
                other => Self::failure("Invalid input", other.to_string()),
            },
        }
    }
}

/// Receiver of notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that mirrors every toast into the log and buffers it until the
/// presentation layer drains it.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything buffered so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Copies the buffer without clearing it.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether any buffered toast has the given headline.
    pub fn contains_headline(&self, headline: &str) -> bool {
        self.snapshot().iter().any(|n| n.headline == headline)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => info!("{}: {}", notification.headline, notification.description),
            Level::Failure => warn!("{}: {}", notification.headline, notification.description),
        }

        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
