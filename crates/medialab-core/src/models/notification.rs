//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::util::char_len;

pub const MESSAGE_MAX_CHARS: usize = 500;

/// Key-value payload carried by a notification
pub type NotificationData = serde_json::Map<String, serde_json::Value>;

/// Kind of event a notification describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ItemCreated,
    ItemUpdated,
    ItemDeleted,
    ServerItemCreated,
    ServerItemUpdated,
    ServerItemDeleted,
    SystemNotification,
}

/// Which service performed the mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Server,
    Client,
}

/// Mutation performed on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Created,
    Updated,
    Deleted,
}

impl NotificationType {
    pub const fn for_action(origin: Origin, action: ItemAction) -> Self {
        match (origin, action) {
            (Origin::Server, ItemAction::Created) => Self::ServerItemCreated,
            (Origin::Server, ItemAction::Updated) => Self::ServerItemUpdated,
            (Origin::Server, ItemAction::Deleted) => Self::ServerItemDeleted,
            (Origin::Client, ItemAction::Created) => Self::ItemCreated,
            (Origin::Client, ItemAction::Updated) => Self::ItemUpdated,
            (Origin::Client, ItemAction::Deleted) => Self::ItemDeleted,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ItemCreated => "item_created",
            Self::ItemUpdated => "item_updated",
            Self::ItemDeleted => "item_deleted",
            Self::ServerItemCreated => "server_item_created",
            Self::ServerItemUpdated => "server_item_updated",
            Self::ServerItemDeleted => "server_item_deleted",
            Self::SystemNotification => "system_notification",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of something that happened.
///
/// `id` is assigned by the log that stores the notification, never by the
/// sender; anything the sender puts there is overwritten on receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: Option<u64>,
    pub message: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub data: Option<NotificationData>,
    /// Origin service, see [`crate::constants::sources`]
    pub source: String,
}

impl Notification {
    /// Create a notification stamped with the current time
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        kind: NotificationType,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            message: message.into(),
            timestamp: Utc::now(),
            kind,
            data: None,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: NotificationData) -> Self {
        self.data = Some(data);
        self
    }

    /// Payload naming a deleted item
    pub fn deleted_item_data(id: u64) -> NotificationData {
        [("item_id".to_string(), id.into())].into_iter().collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let message_len = char_len(&self.message);
        if message_len == 0 || message_len > MESSAGE_MAX_CHARS {
            return Err(ValidationError::Length {
                field: "message",
                min: 1,
                max: MESSAGE_MAX_CHARS,
            });
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::Blank("source"));
        }
        Ok(())
    }
}
