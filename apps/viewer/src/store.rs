use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use padkit_core::Component;

/// Customized components by variant name, least recently used first.
///
/// Inserting an existing name replaces the entry. Once `capacity` is
/// exceeded the least recently used entry is dropped.
#[derive(Debug)]
pub struct VariantStore {
    capacity: usize,
    entries: Mutex<IndexMap<String, Arc<Component>>>,
}

impl VariantStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, IndexMap<String, Arc<Component>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a variant and mark it most recently used.
    pub fn get(&self, name: &str) -> Option<Arc<Component>> {
        let mut entries = self.entries();
        let index = entries.get_index_of(name)?;
        let last = entries.len() - 1;
        entries.move_index(index, last);
        entries.get_index(last).map(|(_, c)| c.clone())
    }

    pub fn insert(&self, name: &str, component: Arc<Component>) {
        let mut entries = self.entries();
        entries.shift_remove(name);
        entries.insert(name.to_string(), component);
        while entries.len() > self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                log::info!("Evicted variant '{}'", evicted);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str) -> Arc<Component> {
        Arc::new(Component::new(name))
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let store = VariantStore::new(2);
        store.insert("a", component("a"));
        store.insert("b", component("b"));
        assert!(store.get("a").is_some());
        store.insert("c", component("c"));

        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert!(store.contains("c"));
    }

    #[test]
    fn test_insert_replaces() {
        let store = VariantStore::new(4);
        let first = component("x");
        let second = component("x");
        store.insert("x", first);
        store.insert("x", second.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x").map(|c| c.id), Some(second.id));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let store = VariantStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.insert("a", component("a"));
        store.insert("b", component("b"));
        assert_eq!(store.len(), 1);
        assert!(store.contains("b"));
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_empty() {
        let store = VariantStore::new(3);
        assert!(store.is_empty());
        assert!(store.get("missing").is_none());
    }
}
