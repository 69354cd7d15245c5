use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Item, NewItem};

#[derive(Clone, Default)]
pub struct ItemStore {
    items: Arc<RwLock<Vec<Item>>>,
    next_id: Arc<AtomicU64>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self, limit: usize) -> Vec<Item> {
        self.items.read().await.iter().take(limit).cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Option<Item> {
        self.items.read().await.iter().find(|item| item.id == id).cloned()
    }

    pub async fn create(&self, new: NewItem) -> Item {
        let item = Item {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            name: new.name,
            count: new.count,
        };
        self.items.write().await.push(item.clone());
        item
    }

    /// Returns whether an item was removed.
    pub async fn delete(&self, id: u64) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }
}
