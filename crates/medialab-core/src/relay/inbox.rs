use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::Notification;

/// Ordered, append-only log of received notifications.
///
/// Ids are local to the log: they start at 1 and restart at 1 after
/// [`NotificationLog::clear`]. Entries are kept for the process lifetime.
#[derive(Debug, Default)]
pub struct NotificationLog {
    inner: Mutex<LogInner>,
}

#[derive(Debug, Default)]
struct LogInner {
    entries: Vec<Notification>,
    last_id: u64,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id, append, and return the stored copy.
    pub fn record(&self, mut notification: Notification) -> Notification {
        let mut inner = self.lock();
        inner.last_id += 1;
        notification.id = Some(inner.last_id);
        inner.entries.push(notification.clone());
        notification
    }

    pub fn list(&self) -> Vec<Notification> {
        self.lock().entries.clone()
    }

    /// Drop every entry and restart id assignment.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.last_id = 0;
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().entries.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
