use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::engine::catalog::{CatalogProvider, ItemId};
use crate::engine::events::StorefrontEvent;

/// Fire-and-forget popularity beacon.
///
/// Reports item views to the catalog in the background. A failed report is
/// logged and dropped; view counting never gets in the way of browsing.
#[derive(Clone)]
pub struct ViewCounter {
    provider: Arc<dyn CatalogProvider>,
    event_tx: broadcast::Sender<StorefrontEvent>,
}

impl ViewCounter {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        event_tx: broadcast::Sender<StorefrontEvent>,
    ) -> Self {
        Self { provider, event_tx }
    }

    /// Reports one view of `id` in the background. The returned handle can
    /// be awaited when completion matters, such as in tests.
    pub fn record(&self, id: ItemId) -> JoinHandle<()> {
        let provider = self.provider.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            match provider.increment_view(&id).await {
                Ok(()) => {
                    log::debug!("Recorded view for item {id}");
                    let _ = event_tx.send(StorefrontEvent::ViewRecorded { id });
                }
                Err(e) => {
                    log::warn!("Failed to record view for item {id}: {e}");
                }
            }
        })
    }
}

impl std::fmt::Debug for ViewCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCounter")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}
