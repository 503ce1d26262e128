use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::EngineConfig;
use crate::engine::catalog::{CatalogItem, CatalogProvider, Inquiry, ItemType, PropertyDefinition};
use crate::engine::consent::ConsentStore;
use crate::engine::events::{EngineCommand, StorefrontEvent};
use crate::engine::favorites::FavoritesStore;
use crate::engine::recent::RecentlyViewed;
use crate::engine::search::SearchHandle;
use crate::engine::storage::{StorageArea, StorageService, Subscription};
use crate::engine::views::ViewCounter;
use crate::engine::visit::ItemVisit;
use crate::errors::StorefrontError;

/// Handle to a running [`ShowroomEngine`](crate::engine::ShowroomEngine).
///
/// Cheap to clone; every clone talks to the same engine. The stores exposed
/// here are shared with the engine, so a favorite added through one handle is
/// visible through all of them.
#[derive(Clone)]
pub struct EngineHandle {
    /// Engine-wide command sender (e.g. for opening searchers, shutdown)
    cmd_tx: mpsc::Sender<EngineCommand>,
    /// Event sender, kept to hand out subscriptions and publish from here
    event_tx: broadcast::Sender<StorefrontEvent>,
    config: Arc<EngineConfig>,
    provider: Arc<dyn CatalogProvider>,
    storage: StorageService,
    favorites: Arc<FavoritesStore>,
    recent: Arc<RecentlyViewed>,
    consent: Arc<ConsentStore>,
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl EngineHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<EngineCommand>,
        event_tx: broadcast::Sender<StorefrontEvent>,
        config: Arc<EngineConfig>,
        provider: Arc<dyn CatalogProvider>,
        storage: StorageService,
        favorites: Arc<FavoritesStore>,
        recent: Arc<RecentlyViewed>,
        consent: Arc<ConsentStore>,
    ) -> Self {
        Self {
            cmd_tx,
            event_tx,
            config,
            provider,
            storage,
            favorites,
            recent,
            consent,
        }
    }

    pub fn config(&self) -> Arc<EngineConfig> {
        self.config.clone()
    }

    /// Subscribe to the engine-wide event bus.
    pub fn subscribe_events(&self) -> broadcast::Receiver<StorefrontEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to raw storage change notifications.
    pub fn subscribe_storage(&self) -> Subscription {
        self.storage.subscribe()
    }

    /// The shared storage area all stores persist into.
    pub fn storage(&self) -> Arc<dyn StorageArea> {
        self.storage.area()
    }

    pub fn favorites(&self) -> Arc<FavoritesStore> {
        self.favorites.clone()
    }

    pub fn recent(&self) -> Arc<RecentlyViewed> {
        self.recent.clone()
    }

    pub fn consent(&self) -> Arc<ConsentStore> {
        self.consent.clone()
    }

    /// Opens a new searcher, up to the configured limit.
    pub async fn open_search(&self) -> Result<SearchHandle, StorefrontError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(EngineCommand::OpenSearch { reply: tx })
            .await
            .map_err(|_| StorefrontError::ChannelClosed)?;

        rx.await.map_err(|_| StorefrontError::ChannelClosed)?
    }

    /// Starts a detail-page visit of `item`.
    ///
    /// Recording the view in history happens right here; the view beacon
    /// fires when the caller invokes [`ItemVisit::record_view`].
    pub fn visit(&self, item: CatalogItem) -> ItemVisit {
        let counter = ViewCounter::new(self.provider.clone(), self.event_tx.clone());
        ItemVisit::new(item, self.recent.clone(), counter)
    }

    /// The item types the catalog knows about, for filter pickers.
    /// A provider failure logs and yields an empty list.
    pub async fn item_types(&self) -> Vec<ItemType> {
        match self.provider.item_types().await {
            Ok(types) => types,
            Err(e) => {
                log::warn!("Failed to fetch item types: {e}");
                Vec::new()
            }
        }
    }

    /// The properties defined for one item type, for filter pickers.
    /// A provider failure logs and yields an empty list.
    pub async fn type_properties(&self, type_id: &str) -> Vec<PropertyDefinition> {
        match self.provider.type_properties(type_id).await {
            Ok(props) => props,
            Err(e) => {
                log::warn!("Failed to fetch properties for type {type_id:?}: {e}");
                Vec::new()
            }
        }
    }

    /// Validates and submits a lead inquiry to the catalog backend.
    pub async fn submit_inquiry(&self, inquiry: &Inquiry) -> Result<(), StorefrontError> {
        inquiry.validate()?;
        self.provider.submit_inquiry(inquiry).await?;

        let _ = self.event_tx.send(StorefrontEvent::InquirySubmitted {
            item: inquiry.item_ref.clone(),
        });
        Ok(())
    }

    /// Gracefully shut down the engine, waiting for all tasks to finish.
    pub async fn shutdown(&self) -> Result<(), StorefrontError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(EngineCommand::Shutdown { reply: tx })
            .await
            .map_err(|_| StorefrontError::ChannelClosed)?;

        rx.await.map_err(|_| StorefrontError::ChannelClosed)?
    }
}
