//! Item proxying with local bookkeeping, and the notification inbox.

use std::sync::Arc;
use std::time::Duration;

use medialab_core::constants::sources;
use medialab_core::health::peer_status;
use medialab_core::relay::{NotificationLog, NotificationQueue};
use medialab_core::{
    Item, ItemAction, Notification, NotificationData, NotificationType, Origin, PeerStatus,
    ServiceStatus, UpstreamError, ValidationError,
};
use serde::Serialize;
use serde_json::Value;

use crate::proxy::ItemProxy;

/// Snapshot returned by `/server-communication/status`.
#[derive(Debug, Clone, Serialize)]
pub struct CommunicationStatus {
    pub client_status: ServiceStatus,
    pub server_status: PeerStatus,
    pub server_status_reason: Option<&'static str>,
    pub notifications_count: usize,
    pub last_notification: Option<Notification>,
}

#[derive(Clone)]
pub struct ClientService {
    proxy: ItemProxy,
    log: Arc<NotificationLog>,
    processing: NotificationQueue,
    status_timeout: Duration,
    http: reqwest::Client,
}

impl ClientService {
    pub fn new(
        proxy: ItemProxy,
        log: Arc<NotificationLog>,
        processing: NotificationQueue,
        status_timeout: Duration,
    ) -> Self {
        Self {
            proxy,
            log,
            processing,
            status_timeout,
            http: reqwest::Client::new(),
        }
    }

    pub fn server_url(&self) -> &str {
        self.proxy.base_url()
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, UpstreamError> {
        self.proxy.list().await
    }

    pub async fn get_item(&self, id: u64) -> Result<Item, UpstreamError> {
        self.proxy.get(id).await
    }

    pub async fn create_item(&self, item: Item) -> Result<Item, UpstreamError> {
        let created = self.proxy.create(&item).await?;
        tracing::info!(item_id = created.id, name = %created.name, "Created item on server");
        self.record_local(
            ItemAction::Created,
            format!("Created new item: {}", created.name),
            created.summary(),
        );
        Ok(created)
    }

    pub async fn update_item(&self, id: u64, item: Item) -> Result<Item, UpstreamError> {
        let updated = self.proxy.update(id, &item).await?;
        tracing::info!(item_id = id, name = %updated.name, "Updated item on server");
        self.record_local(
            ItemAction::Updated,
            format!("Updated item: {}", updated.name),
            updated.summary(),
        );
        Ok(updated)
    }

    pub async fn delete_item(&self, id: u64) -> Result<Value, UpstreamError> {
        let confirmation = self.proxy.delete(id).await?;
        tracing::info!(item_id = id, "Deleted item on server");
        self.record_local(
            ItemAction::Deleted,
            format!("Deleted item with ID: {id}"),
            Notification::deleted_item_data(id),
        );
        Ok(confirmation)
    }

    /// Inbox entry point: store the notification, then hand it to the
    /// deferred processing worker. Returns as soon as it is stored.
    pub fn receive(&self, notification: Notification) -> Result<Notification, ValidationError> {
        notification.validate()?;
        let stored = self.log.record(notification);
        tracing::info!(
            id = stored.id,
            kind = %stored.kind,
            source = %stored.source,
            "Received notification"
        );
        self.processing.dispatch(stored.clone());
        Ok(stored)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log.list()
    }

    pub fn clear_notifications(&self) {
        self.log.clear();
        tracing::info!("Cleared notifications");
    }

    pub fn notifications_count(&self) -> usize {
        self.log.len()
    }

    /// Notifications the processing queue had to drop.
    pub fn dropped_notifications(&self) -> u64 {
        self.processing.dropped()
    }

    pub async fn communication_status(&self) -> CommunicationStatus {
        let (server_status, server_status_reason) =
            match peer_status(&self.http, self.server_url(), self.status_timeout).await {
                Ok(status) => (status, None),
                Err(error) => {
                    tracing::debug!(reason = error.reason(), %error, "Server unreachable");
                    (error.peer_status(), Some(error.reason()))
                }
            };

        CommunicationStatus {
            client_status: ServiceStatus::Running,
            server_status,
            server_status_reason,
            notifications_count: self.log.len(),
            last_notification: self.log.last(),
        }
    }

    // Local notifications skip deferred processing; they did not arrive via the inbox.
    fn record_local(&self, action: ItemAction, message: String, data: NotificationData) {
        let notification = Notification::new(
            message,
            NotificationType::for_action(Origin::Client, action),
            sources::CLIENT,
        )
        .with_data(data);
        self.log.record(notification);
    }
}
