use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::engine::catalog::{CatalogItem, RecentlyViewedEntry};
use crate::engine::recent::RecentlyViewed;
use crate::engine::views::ViewCounter;

/// One open detail page.
///
/// Constructing a visit records the item in the viewing history right away.
/// The view beacon fires at most once per visit, however often the embedder
/// re-renders; a fresh visit to the same item counts again.
///
/// Obtained from [`EngineHandle::visit`](crate::engine::EngineHandle::visit).
#[derive(Debug)]
pub struct ItemVisit {
    item: CatalogItem,
    recent: Arc<RecentlyViewed>,
    counter: ViewCounter,
    view_recorded: bool,
}

impl ItemVisit {
    pub(crate) fn new(item: CatalogItem, recent: Arc<RecentlyViewed>, counter: ViewCounter) -> Self {
        recent.record(&item);

        Self {
            item,
            recent,
            counter,
            view_recorded: false,
        }
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Fires the view beacon. Returns the background task handle the first
    /// time and `None` on every later call of this visit.
    pub fn record_view(&mut self) -> Option<JoinHandle<()>> {
        if self.view_recorded {
            return None;
        }
        self.view_recorded = true;

        Some(self.counter.record(self.item.id.clone()))
    }

    /// Recently viewed items other than the one this visit shows.
    pub fn other_recent(&self) -> Vec<RecentlyViewedEntry> {
        self.recent.recent_excluding(&self.item.id)
    }
}
