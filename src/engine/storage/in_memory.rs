use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::engine::storage::area::StorageArea;

/// In-memory storage area (no persistence). Used as a default when the
/// embedder supplies no backing store.
#[derive(Default)]
pub struct InMemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageArea for InMemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .map_err(|_| anyhow!("storage lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.map
            .lock()
            .map_err(|_| anyhow!("storage lock poisoned"))?
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.map
            .lock()
            .map_err(|_| anyhow!("storage lock poisoned"))?
            .clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.map.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        let mut v: Vec<String> = self
            .map
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        v.sort_unstable(); // stable order if you want deterministic tests
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sorted() {
        let area = InMemoryStore::new();
        area.set_item("zebra", "1").unwrap();
        area.set_item("apple", "2").unwrap();
        area.set_item("mango", "3").unwrap();
        assert_eq!(area.keys(), vec!["apple", "mango", "zebra"]);
    }
}
