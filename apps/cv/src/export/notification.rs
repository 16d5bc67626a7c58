//! Transient, informational notifications.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct NotifierInner {
    next_id: u64,
    active: Vec<Notification>,
}

/// Shows notifications and dismisses each one after a fixed duration.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Mutex<NotifierInner>>,
    duration: Duration,
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierInner::default())),
            duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, NotifierInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Must be called from within a tokio runtime.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        match kind {
            NotificationKind::Error => error!(%message, "notification"),
            NotificationKind::Warning => warn!(%message, "notification"),
            NotificationKind::Success | NotificationKind::Info => info!(%message, "notification"),
        }

        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.active.push(Notification { id, kind, message });
            id
        };

        let notifier = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(notifier.duration).await;
            notifier.dismiss(id);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Warning, message)
    }

    /// Removes the notification; unknown or already dismissed ids are ignored.
    pub fn dismiss(&self, id: u64) {
        self.lock().active.retain(|n| n.id != id);
    }

    /// Currently visible notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.lock().active.clone()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}
