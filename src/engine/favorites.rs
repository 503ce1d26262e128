use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::engine::catalog::{CatalogItem, FavoriteEntry, ItemId};
use crate::engine::events::StorefrontEvent;
use crate::engine::storage::{read_json, write_json, StorageArea};

/// Storage key under which the favorites list is persisted.
pub const FAVORITES_KEY: &str = "product_favorites";

/// The user's favorites list.
///
/// Semantically a set keyed by item id: adding an item twice is a no-op, and
/// the insertion order is preserved for display. Reads come from memory; every
/// mutation eagerly persists the whole list to the backing [`StorageArea`].
pub struct FavoritesStore {
    area: Arc<dyn StorageArea>,
    entries: RwLock<Vec<FavoriteEntry>>,
    event_tx: broadcast::Sender<StorefrontEvent>,
}

impl FavoritesStore {
    /// Creates a favorites store over `area`, loading whatever list is
    /// already persisted there. A missing or unreadable list starts empty.
    pub fn new(area: Arc<dyn StorageArea>, event_tx: broadcast::Sender<StorefrontEvent>) -> Self {
        let entries: Vec<FavoriteEntry> = read_json(area.as_ref(), FAVORITES_KEY);
        log::debug!("Loaded {} favorite(s) from storage", entries.len());

        Self {
            area,
            entries: RwLock::new(entries),
            event_tx,
        }
    }

    /// Adds `item` to the favorites. Returns `false` when it already was one.
    pub fn add(&self, item: &CatalogItem) -> bool {
        let entry = FavoriteEntry::from(item);
        {
            let mut entries = self.entries.write().unwrap();
            if entries.iter().any(|e| e.id == entry.id) {
                return false;
            }
            entries.push(entry.clone());
            write_json(self.area.as_ref(), FAVORITES_KEY, &*entries);
        }

        let _ = self.event_tx.send(StorefrontEvent::FavoriteAdded { entry });
        true
    }

    /// Removes the favorite with `id`. Returns `false` when there was none.
    pub fn remove(&self, id: &ItemId) -> bool {
        {
            let mut entries = self.entries.write().unwrap();
            let before = entries.len();
            entries.retain(|e| &e.id != id);
            if entries.len() == before {
                return false;
            }
            write_json(self.area.as_ref(), FAVORITES_KEY, &*entries);
        }

        let _ = self.event_tx.send(StorefrontEvent::FavoriteRemoved { id: id.clone() });
        true
    }

    /// Adds `item` when absent, removes it when present. Returns whether the
    /// item is a favorite afterwards.
    pub fn toggle(&self, item: &CatalogItem) -> bool {
        if self.is_favorite(&item.id) {
            self.remove(&item.id);
            false
        } else {
            self.add(item);
            true
        }
    }

    pub fn is_favorite(&self, id: &ItemId) -> bool {
        self.entries.read().unwrap().iter().any(|e| &e.id == id)
    }

    pub fn count(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns the favorites in insertion order.
    pub fn entries(&self) -> Vec<FavoriteEntry> {
        self.entries.read().unwrap().clone()
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}
