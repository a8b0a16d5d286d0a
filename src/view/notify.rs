//! Toast notifications
//!
//! Fire-and-forget success/error/info messages raised by the pages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToastLevel::Success => write!(f, "success"),
            ToastLevel::Error => write!(f, "error"),
            ToastLevel::Info => write!(f, "info"),
        }
    }
}

/// A single notification
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Sink for user-visible notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, level: ToastLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(ToastLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(ToastLevel::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(ToastLevel::Info, message);
    }
}

/// Notifier that records every toast, newest last
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded toasts
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Most recent toast
    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().ok().and_then(|t| t.last().cloned())
    }

    /// Remove and return all recorded toasts
    pub fn drain(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|mut t| std::mem::take(&mut *t))
            .unwrap_or_default()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, level: ToastLevel, message: &str) {
        match level {
            ToastLevel::Error => tracing::warn!(%level, "{}", message),
            _ => tracing::info!(%level, "{}", message),
        }

        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(Toast {
                level,
                message: message.to_string(),
                at: Utc::now(),
            });
        }
    }
}
