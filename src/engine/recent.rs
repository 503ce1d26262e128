use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::engine::catalog::{CatalogItem, ItemId, RecentlyViewedEntry};
use crate::engine::events::StorefrontEvent;
use crate::engine::storage::{read_json, write_json, StorageArea};

/// Storage key under which the viewing history is persisted.
pub const RECENTLY_VIEWED_KEY: &str = "recently_viewed_products";

/// Short viewing history, newest first.
///
/// Stores one entry more than the display limit, so a detail page can drop
/// the item it is currently showing and still fill its rail. Re-viewing an
/// item moves it to the front instead of duplicating it. Every mutation
/// eagerly persists the whole list to the backing [`StorageArea`].
pub struct RecentlyViewed {
    area: Arc<dyn StorageArea>,
    entries: RwLock<Vec<RecentlyViewedEntry>>,
    display_limit: usize,
    event_tx: broadcast::Sender<StorefrontEvent>,
}

impl RecentlyViewed {
    /// Creates a tracker over `area`, loading whatever history is already
    /// persisted there. An oversized persisted list is trimmed to fit.
    pub fn new(
        area: Arc<dyn StorageArea>,
        display_limit: usize,
        event_tx: broadcast::Sender<StorefrontEvent>,
    ) -> Self {
        let mut entries: Vec<RecentlyViewedEntry> = read_json(area.as_ref(), RECENTLY_VIEWED_KEY);
        entries.truncate(display_limit + 1);
        log::debug!("Loaded {} recently viewed item(s) from storage", entries.len());

        Self {
            area,
            entries: RwLock::new(entries),
            display_limit,
            event_tx,
        }
    }

    /// Records a view of `item`, moving it to the front of the history.
    pub fn record(&self, item: &CatalogItem) {
        let entry = RecentlyViewedEntry::now(item);
        let id = entry.id.clone();
        {
            let mut entries = self.entries.write().unwrap();
            entries.retain(|e| e.id != entry.id);
            entries.insert(0, entry);
            // One spare entry beyond the display limit, see the type docs.
            entries.truncate(self.display_limit + 1);
            write_json(self.area.as_ref(), RECENTLY_VIEWED_KEY, &*entries);
        }

        let _ = self.event_tx.send(StorefrontEvent::RecentRecorded { id });
    }

    /// Returns up to the display limit of entries, newest first.
    pub fn recent(&self) -> Vec<RecentlyViewedEntry> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .take(self.display_limit)
            .cloned()
            .collect()
    }

    /// Like [`recent`](Self::recent), but without the entry for `current`.
    /// This is the view a detail page wants alongside the item it shows.
    pub fn recent_excluding(&self, current: &ItemId) -> Vec<RecentlyViewedEntry> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| &e.id != current)
            .take(self.display_limit)
            .cloned()
            .collect()
    }

    /// Returns the full stored history, including the spare entry.
    pub fn entries(&self) -> Vec<RecentlyViewedEntry> {
        self.entries.read().unwrap().clone()
    }

    pub fn display_limit(&self) -> usize {
        self.display_limit
    }
}

impl std::fmt::Debug for RecentlyViewed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentlyViewed")
            .field("display_limit", &self.display_limit)
            .field("stored", &self.entries.read().unwrap().len())
            .finish_non_exhaustive()
    }
}
