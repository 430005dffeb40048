use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::NotificationRelay;
use crate::models::Notification;

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Work performed on each queued notification by the background worker.
pub trait NotificationHandler: Send + Sync + 'static {
    fn handle(&self, notification: Notification) -> impl Future<Output = ()> + Send;
}

/// Bounded hand-off from the request path to a detached worker task.
///
/// `dispatch` never waits. When the queue is full the incoming notification
/// is rejected and counted; nothing is retried.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    name: &'static str,
    sender: mpsc::Sender<Notification>,
    dropped: Arc<AtomicU64>,
}

impl NotificationQueue {
    /// Start a worker running `handler` and return the queue feeding it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<H: NotificationHandler>(name: &'static str, handler: H, capacity: usize) -> Self {
        let (queue, receiver) = Self::channel(name, capacity);
        tokio::spawn(run_worker(name, handler, receiver));
        queue
    }

    /// Queue without a worker; the caller drains the receiver.
    pub fn channel(name: &'static str, capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue = Self {
            name,
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (queue, receiver)
    }

    /// Enqueue without blocking. Returns `false` when the notification was dropped.
    pub fn dispatch(&self, notification: Notification) -> bool {
        match self.sender.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(notification)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    queue = self.name,
                    kind = %notification.kind,
                    "Notification queue full, dropping notification"
                );
                false
            }
            Err(TrySendError::Closed(notification)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    queue = self.name,
                    kind = %notification.kind,
                    "Notification worker has stopped, dropping notification"
                );
                false
            }
        }
    }

    /// Notifications rejected since start.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn run_worker<H: NotificationHandler>(
    name: &'static str,
    handler: H,
    mut receiver: mpsc::Receiver<Notification>,
) {
    while let Some(notification) = receiver.recv().await {
        handler.handle(notification).await;
    }
    tracing::debug!(queue = name, "Notification worker stopped");
}

/// Pushes each notification to the peer's inbox once.
#[derive(Debug, Clone)]
pub struct RelayDelivery {
    relay: NotificationRelay,
    target_base_url: String,
}

impl RelayDelivery {
    pub fn new(relay: NotificationRelay, target_base_url: impl Into<String>) -> Self {
        Self {
            relay,
            target_base_url: target_base_url.into(),
        }
    }
}

impl NotificationHandler for RelayDelivery {
    async fn handle(&self, notification: Notification) {
        match self
            .relay
            .deliver(&notification, &self.target_base_url)
            .await
        {
            Ok(stored) => tracing::info!(
                kind = %notification.kind,
                remote_id = stored.id,
                "Delivered notification"
            ),
            Err(error) => tracing::warn!(
                kind = %notification.kind,
                peer = %self.target_base_url,
                reason = error.reason(),
                %error,
                "Failed to deliver notification"
            ),
        }
    }
}

/// Inbox side effect: wait, then log that the notification was processed.
#[derive(Debug, Clone, Copy)]
pub struct DeferredProcessing {
    delay: Duration,
}

impl DeferredProcessing {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl NotificationHandler for DeferredProcessing {
    async fn handle(&self, notification: Notification) {
        tokio::time::sleep(self.delay).await;
        tracing::info!(
            id = notification.id,
            kind = %notification.kind,
            message = %notification.message,
            "Processed notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;
    use crate::models::NotificationType;

    fn note(message: &str) -> Notification {
        Notification::new(message, NotificationType::SystemNotification, "server")
    }

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl NotificationHandler for Recorder {
        async fn handle(&self, notification: Notification) {
            self.0.lock().await.push(notification.message);
        }
    }

    #[tokio::test]
    async fn dispatch_hands_notifications_to_receiver_in_order() {
        let (queue, mut receiver) = NotificationQueue::channel("test", 4);
        assert!(queue.dispatch(note("first")));
        assert!(queue.dispatch(note("second")));

        assert_eq!(receiver.recv().await.unwrap().message, "first");
        assert_eq!(receiver.recv().await.unwrap().message, "second");
        assert_eq!(queue.dropped(), 0);
    }

    #[tokio::test]
    async fn full_queue_rejects_newest() {
        let (queue, mut receiver) = NotificationQueue::channel("test", 1);
        assert!(queue.dispatch(note("kept")));
        assert!(!queue.dispatch(note("rejected")));
        assert_eq!(queue.dropped(), 1);

        assert_eq!(receiver.recv().await.unwrap().message, "kept");
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_queue_counts_drop() {
        let (queue, receiver) = NotificationQueue::channel("test", 1);
        drop(receiver);
        assert!(!queue.dispatch(note("lost")));
        assert_eq!(queue.dropped(), 1);
    }

    #[tokio::test]
    async fn spawned_worker_runs_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let queue = NotificationQueue::spawn("test", Recorder(seen.clone()), 8);
        queue.dispatch(note("a"));
        queue.dispatch(note("b"));

        for _ in 0..50 {
            if seen.lock().await.len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(*seen.lock().await, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn relay_delivery_swallows_unreachable_peer() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let handler = RelayDelivery::new(NotificationRelay::default(), format!("http://{addr}"));
        handler.handle(note("nobody home")).await;
    }
}
