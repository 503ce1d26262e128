use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::engine::catalog::CatalogProvider;
use crate::engine::consent::ConsentStore;
use crate::engine::events::{EngineCommand, StorefrontEvent};
use crate::engine::favorites::FavoritesStore;
use crate::engine::handle::EngineHandle;
use crate::engine::recent::RecentlyViewed;
use crate::engine::search::{SearchHandle, Searcher, SearcherId};
use crate::engine::storage::{StorageArea, StorageService};
use crate::engine::DEFAULT_CHANNEL_CAPACITY;
use crate::errors::StorefrontError;

/// How long shutdown waits for each searcher task to wind down.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Bookkeeping for one running searcher.
struct SearcherEntry {
    handle: SearchHandle,
    join: JoinHandle<()>,
}

/// The headless storefront engine.
///
/// Owns the catalog provider, the persistent stores, and the searcher
/// workers. The engine itself runs as a task; interact with it through the
/// [`EngineHandle`] returned by [`start`](Self::start).
pub struct ShowroomEngine {
    /// Configuration for the whole engine.
    config: Arc<EngineConfig>,
    /// Catalog backend all searchers and beacons talk to.
    provider: Arc<dyn CatalogProvider>,
    /// Storage service wrapping the persistence backend.
    storage: StorageService,

    favorites: Arc<FavoritesStore>,
    recent: Arc<RecentlyViewed>,
    consent: Arc<ConsentStore>,

    /// Command sender (cloned into handles).
    cmd_tx: mpsc::Sender<EngineCommand>,
    /// Command receiver (owned by the engine run loop).
    cmd_rx: mpsc::Receiver<EngineCommand>,
    /// Event sender for the engine-wide broadcast bus.
    event_tx: broadcast::Sender<StorefrontEvent>,

    /// Running searchers, indexed by [`SearcherId`].
    searchers: HashMap<SearcherId, SearcherEntry>,
}

impl ShowroomEngine {
    /// Create a new engine over `provider`, persisting into `backing`.
    ///
    /// If `config` is `None`, [`EngineConfig::default`] is used.
    pub fn new(
        config: Option<EngineConfig>,
        provider: Arc<dyn CatalogProvider>,
        backing: Arc<dyn StorageArea>,
    ) -> Self {
        let config = Arc::new(config.unwrap_or_default());

        // Command channel on which handles send engine commands.
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>(DEFAULT_CHANNEL_CAPACITY);

        // Broadcast event bus. Subscribe to receive storefront events.
        let (event_tx, _first_rx) = broadcast::channel::<StorefrontEvent>(DEFAULT_CHANNEL_CAPACITY);

        let storage = StorageService::new(backing);
        let area = storage.area();

        let favorites = Arc::new(FavoritesStore::new(area.clone(), event_tx.clone()));
        let recent = Arc::new(RecentlyViewed::new(
            area.clone(),
            config.recent_display_limit,
            event_tx.clone(),
        ));
        let consent = Arc::new(ConsentStore::new(area, event_tx.clone()));

        Self {
            config,
            provider,
            storage,
            favorites,
            recent,
            consent,
            cmd_tx,
            cmd_rx,
            event_tx,
            searchers: HashMap::new(),
        }
    }

    /// Starts the engine and returns a handle plus the run-loop join handle.
    pub fn start(self) -> Result<(EngineHandle, JoinHandle<()>), StorefrontError> {
        let engine_handle = EngineHandle::new(
            self.cmd_tx.clone(),
            self.event_tx.clone(),
            self.config.clone(),
            self.provider.clone(),
            self.storage.clone(),
            self.favorites.clone(),
            self.recent.clone(),
            self.consent.clone(),
        );
        let join_handle = tokio::spawn(self.run());

        Ok((engine_handle, join_handle))
    }

    /// Run the engine's inbound command loop.
    ///
    /// This awaits messages from handles and dispatches them. The loop ends
    /// on an explicit shutdown or when all handles are dropped; either way
    /// the searchers are wound down before the task exits.
    pub async fn run(mut self) {
        let _ = self.event_tx.send(StorefrontEvent::EngineStarted);
        log::info!("Engine started against catalog provider {:?}", self.provider.name());

        let mut reason = "all handles dropped";

        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                EngineCommand::OpenSearch { reply } => {
                    let _ = reply.send(self.open_search());
                }
                EngineCommand::Shutdown { reply } => {
                    reason = "shutdown requested";
                    let _ = reply.send(self.close_searchers().await);
                    break;
                }
            }
        }

        // A no-op after an explicit shutdown already drained them.
        let _ = self.close_searchers().await;

        log::info!("Engine loop exiting ({reason})");
        let _ = self.event_tx.send(StorefrontEvent::EngineShutdown {
            reason: reason.to_string(),
        });
    }

    /// Spawns a new searcher worker, subject to the configured limit.
    fn open_search(&mut self) -> Result<SearchHandle, StorefrontError> {
        // Drop entries for searchers that already ended on their own.
        self.searchers.retain(|_, entry| !entry.join.is_finished());

        if self.searchers.len() >= self.config.max_searchers {
            return Err(StorefrontError::SearcherLimitExceeded);
        }

        let (handle, join) = Searcher::new_on_thread(
            self.config.clone(),
            self.provider.clone(),
            self.event_tx.clone(),
        );

        self.searchers.insert(
            handle.id(),
            SearcherEntry {
                handle: handle.clone(),
                join,
            },
        );

        Ok(handle)
    }

    /// Closes every searcher and waits (briefly) for its task to finish.
    async fn close_searchers(&mut self) -> Result<(), StorefrontError> {
        for (id, entry) in self.searchers.drain() {
            let _ = entry.handle.close().await;

            match tokio::time::timeout(SHUTDOWN_GRACE, entry.join).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::warn!("Searcher {id} task failed: {e}"),
                Err(_) => log::warn!("Searcher {id} did not stop within {SHUTDOWN_GRACE:?}"),
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShowroomEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowroomEngine")
            .field("provider", &self.provider.name())
            .field("searchers", &self.searchers.len())
            .finish_non_exhaustive()
    }
}
