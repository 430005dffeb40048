//! Item operations plus the notifications they emit.

use std::sync::Arc;

use medialab_core::constants::sources;
use medialab_core::relay::NotificationQueue;
use medialab_core::{
    Item, ItemAction, Notification, NotificationData, NotificationType, Origin, Result,
};

use crate::store::ItemRepository;

/// Wraps the repository so every successful mutation queues exactly one
/// `server_item_*` notification for the client. Queueing never fails the
/// mutation.
#[derive(Clone)]
pub struct ItemService {
    repository: Arc<dyn ItemRepository>,
    notifications: NotificationQueue,
}

impl ItemService {
    pub fn new(repository: Arc<dyn ItemRepository>, notifications: NotificationQueue) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    pub fn list(&self) -> Vec<Item> {
        self.repository.list()
    }

    pub fn get(&self, id: u64) -> Result<Item> {
        self.repository.get(id)
    }

    pub fn count(&self) -> usize {
        self.repository.count()
    }

    pub fn create(&self, item: Item) -> Result<Item> {
        let created = self.repository.create(item)?;
        tracing::info!(item_id = created.id, name = %created.name, "Created item");
        self.notify(
            ItemAction::Created,
            format!("Server created new item: {}", created.name),
            created.summary(),
        );
        Ok(created)
    }

    pub fn update(&self, id: u64, item: Item) -> Result<Item> {
        let updated = self.repository.update(id, item)?;
        tracing::info!(item_id = id, name = %updated.name, "Updated item");
        self.notify(
            ItemAction::Updated,
            format!("Server updated item: {}", updated.name),
            updated.summary(),
        );
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> Result<Item> {
        let deleted = self.repository.delete(id)?;
        tracing::info!(item_id = id, "Deleted item");
        self.notify(
            ItemAction::Deleted,
            format!("Server deleted item with ID: {id}"),
            Notification::deleted_item_data(id),
        );
        Ok(deleted)
    }

    /// Notifications the relay queue had to drop.
    pub fn dropped_notifications(&self) -> u64 {
        self.notifications.dropped()
    }

    fn notify(&self, action: ItemAction, message: String, data: NotificationData) {
        let notification = Notification::new(
            message,
            NotificationType::for_action(Origin::Server, action),
            sources::SERVER,
        )
        .with_data(data);
        self.notifications.dispatch(notification);
    }
}

#[cfg(test)]
mod tests {
    use medialab_core::Error;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;
    use crate::store::InMemoryItemRepository;

    fn service() -> (ItemService, mpsc::Receiver<Notification>) {
        let (queue, receiver) = NotificationQueue::channel("test", 16);
        let service = ItemService::new(Arc::new(InMemoryItemRepository::new()), queue);
        (service, receiver)
    }

    #[tokio::test]
    async fn create_queues_one_server_item_created() {
        let (service, mut receiver) = service();
        let created = service.create(Item::new("Camera")).unwrap();

        let notification = receiver.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationType::ServerItemCreated);
        assert_eq!(notification.message, "Server created new item: Camera");
        assert_eq!(notification.source, "server");
        assert_eq!(notification.id, None);
        assert_eq!(notification.data, Some(created.summary()));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn update_queues_one_server_item_updated() {
        let (service, mut receiver) = service();
        service.create(Item::new("Camera")).unwrap();
        receiver.recv().await.unwrap();

        let updated = service.update(1, Item::new("Cinema Camera")).unwrap();
        let notification = receiver.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationType::ServerItemUpdated);
        assert_eq!(notification.message, "Server updated item: Cinema Camera");
        assert_eq!(notification.data.unwrap()["id"], 1);
        assert_eq!(updated.id, Some(1));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn delete_queues_one_server_item_deleted() {
        let (service, mut receiver) = service();
        service.create(Item::new("Camera")).unwrap();
        receiver.recv().await.unwrap();

        service.delete(1).unwrap();
        let notification = receiver.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationType::ServerItemDeleted);
        assert_eq!(notification.message, "Server deleted item with ID: 1");
        assert_eq!(notification.data, Some(Notification::deleted_item_data(1)));
    }

    #[tokio::test]
    async fn failed_mutations_queue_nothing() {
        let (service, mut receiver) = service();
        assert!(matches!(
            service.update(5, Item::new("Ghost")),
            Err(Error::NotFound(5))
        ));
        assert!(matches!(service.delete(5), Err(Error::NotFound(5))));
        assert!(matches!(
            service.create(Item::new("")),
            Err(Error::Validation(_))
        ));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_does_not_fail_mutation() {
        let (queue, _receiver) = NotificationQueue::channel("test", 1);
        let service = ItemService::new(Arc::new(InMemoryItemRepository::new()), queue);

        service.create(Item::new("Camera")).unwrap();
        service.create(Item::new("Mic")).unwrap();
        assert_eq!(service.count(), 2);
        assert_eq!(service.dropped_notifications(), 1);
    }
}
