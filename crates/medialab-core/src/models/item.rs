//! Item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::NotificationData;
use crate::util::char_len;

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// The record managed by the item server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned identifier, absent until created
    #[serde(default)]
    pub id: Option<u64>,
    /// Display name (1-100 characters)
    pub name: String,
    /// Free text (at most 500 characters)
    #[serde(default)]
    pub description: Option<String>,
    /// Set by the store on create
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the store on update
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create an unsaved item with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the field length limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = char_len(&self.name);
        if name_len == 0 || name_len > NAME_MAX_CHARS {
            return Err(ValidationError::Length {
                field: "name",
                min: 1,
                max: NAME_MAX_CHARS,
            });
        }
        if let Some(description) = self.description.as_deref() {
            if char_len(description) > DESCRIPTION_MAX_CHARS {
                return Err(ValidationError::Length {
                    field: "description",
                    min: 0,
                    max: DESCRIPTION_MAX_CHARS,
                });
            }
        }
        Ok(())
    }

    /// Payload attached to notifications about this item
    pub fn summary(&self) -> NotificationData {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(fields)) => fields,
            _ => NotificationData::new(),
        }
    }
}
