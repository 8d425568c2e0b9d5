//! User-facing notifications
//!
//! Controllers never print. They hand a [`Notification`] to the injected
//! [`Notifier`], and the front-end decides how to show it.

use std::sync::Mutex;

use crate::error::{ClientError, ErrorCode};

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// One transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Error code when the notification reports a failure
    pub code: Option<ErrorCode>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            code: None,
        }
    }

    /// Failure while reading data
    pub fn fetch_failed(error: &ClientError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: format!("An error occurred while fetching the data: {}", error),
            code: Some(error.code()),
        }
    }

    /// Failure while creating or deleting data
    pub fn post_failed(error: &ClientError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: format!("An error occurred while posting the data: {}", error),
            code: Some(error.code()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sink for notifications, injected into each controller
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Routes notifications through the `log` facade
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                log::info!(target: "stockdesk::notify", "{}", notification.message)
            }
            NotificationLevel::Error => {
                log::warn!(target: "stockdesk::notify", "{}", notification.message)
            }
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.lock().iter().filter(|n| n.is_error()).cloned().collect()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.received.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}
