//! Item storage

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use medialab_core::{Error, Item, Result};

/// Trait for item storage operations
pub trait ItemRepository: Send + Sync {
    /// All items in creation order
    fn list(&self) -> Vec<Item>;

    /// Get an item by ID
    fn get(&self, id: u64) -> Result<Item>;

    /// Assign the next ID and store the item
    fn create(&self, item: Item) -> Result<Item>;

    /// Replace the item stored under `id`
    fn update(&self, id: u64, item: Item) -> Result<Item>;

    /// Remove an item, returning what was stored
    fn delete(&self, id: u64) -> Result<Item>;

    fn count(&self) -> usize {
        self.list().len()
    }
}

/// In-memory implementation of `ItemRepository`.
///
/// Ids come from a counter that only moves forward, so the id-ordered map
/// doubles as creation order and deleted ids are never handed out again.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    inner: Mutex<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    items: BTreeMap<u64, Item>,
    last_id: u64,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn list(&self) -> Vec<Item> {
        self.lock().items.values().cloned().collect()
    }

    fn get(&self, id: u64) -> Result<Item> {
        self.lock().items.get(&id).cloned().ok_or(Error::NotFound(id))
    }

    fn create(&self, mut item: Item) -> Result<Item> {
        item.validate()?;

        let mut inner = self.lock();
        inner.last_id += 1;
        let id = inner.last_id;
        item.id = Some(id);
        item.created_at = Some(Utc::now());
        item.updated_at = None;
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    fn update(&self, id: u64, mut item: Item) -> Result<Item> {
        item.validate()?;

        let mut inner = self.lock();
        let stored = inner.items.get_mut(&id).ok_or(Error::NotFound(id))?;
        item.id = Some(id);
        item.created_at = stored.created_at;
        item.updated_at = Some(Utc::now());
        *stored = item.clone();
        Ok(item)
    }

    fn delete(&self, id: u64) -> Result<Item> {
        self.lock().items.remove(&id).ok_or(Error::NotFound(id))
    }

    fn count(&self) -> usize {
        self.lock().items.len()
    }
}
