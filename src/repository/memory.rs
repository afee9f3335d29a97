//! In-memory repository implementations
//!
//! Collections live for the process lifetime only. Each store owns one lock,
//! so mutations of the same collection never interleave.

use super::traits::{Entity, EntityStore, KeyValueStore};
use crate::error::FeedbackResult;
use std::collections::HashMap;
use std::sync::Mutex;

/// Insertion-ordered entity collection behind a mutex
pub struct MemoryEntityStore<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Entity> MemoryEntityStore<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store seeded with `items`
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl<T: Entity> Default for MemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> for MemoryEntityStore<T> {
    fn get(&self, id: &str) -> FeedbackResult<Option<T>> {
        let items = self.items.lock()?;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    fn list(&self) -> FeedbackResult<Vec<T>> {
        Ok(self.items.lock()?.clone())
    }

    fn put(&self, item: T) -> FeedbackResult<()> {
        let mut items = self.items.lock()?;
        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> FeedbackResult<bool> {
        let mut items = self.items.lock()?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() != before)
    }

    fn update(&self, id: &str, f: &mut dyn FnMut(&mut T)) -> FeedbackResult<Option<T>> {
        let mut items = self.items.lock()?;
        Ok(items.iter_mut().find(|item| item.id() == id).map(|item| {
            f(item);
            item.clone()
        }))
    }

    fn count(&self) -> FeedbackResult<usize> {
        Ok(self.items.lock()?.len())
    }
}

/// Process-local key-value store, used when no durable file is configured
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> FeedbackResult<Option<serde_json::Value>> {
        Ok(self.values.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> FeedbackResult<()> {
        self.values.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> FeedbackResult<()> {
        self.values.lock()?.remove(key);
        Ok(())
    }
}
