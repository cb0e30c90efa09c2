//! Transient user notifications.
//!
//! Front-ends show a short message after an action (login failed, payout
//! requested). This module describes the request; how it is rendered and
//! dismissed belongs to the `Notifier` implementation.

use std::fmt;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::ApiError;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Shown for this long before it is dismissed automatically.
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl From<&ApiError> for Notification {
    fn from(err: &ApiError) -> Self {
        Notification::new(err.to_string(), Severity::Error)
    }
}

pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        let duration_ms = notification.duration.as_millis() as u64;
        match notification.severity {
            Severity::Info | Severity::Success => {
                info!(severity = %notification.severity, duration_ms, "{}", notification.message)
            }
            Severity::Warning => {
                warn!(severity = %notification.severity, duration_ms, "{}", notification.message)
            }
            Severity::Error => {
                error!(severity = %notification.severity, duration_ms, "{}", notification.message)
            }
        }
    }
}
