use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::catalog::{CatalogItem, CatalogProvider, SearchPage};
use crate::engine::events::{SearchCommand, StorefrontEvent};
use crate::engine::search::filter::QueryFilter;
use crate::engine::search::handle::SearchHandle;
use crate::engine::search::sort::SortOrder;
use crate::engine::search::status::{SearchPhase, SearchStatus};
use crate::engine::DEFAULT_CHANNEL_CAPACITY;
use crate::errors::StorefrontError;

/// A unique identifier for a searcher within a
/// [`ShowroomEngine`](crate::engine::ShowroomEngine).
///
/// Internally a wrapper around a [`Uuid`]; treat it as an opaque handle. It
/// implements `Copy`, `Eq`, `Hash`, and the ordering traits, so it can be
/// freely duplicated, compared, or used as a map key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearcherId(Uuid);

impl SearcherId {
    /// Create a new unique `SearcherId` using a random UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SearcherId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SearcherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time view of a searcher, as returned by
/// [`SearchHandle::snapshot`](crate::engine::search::SearchHandle::snapshot).
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub id: SearcherId,
    /// The committed filter; text still inside the settle window is absent.
    pub filter: QueryFilter,
    pub sort: SortOrder,
    pub phase: SearchPhase,
    pub status: SearchStatus,
    /// The locally-refined, sorted result list.
    pub items: Vec<CatalogItem>,
    /// Server-side total for the last fetch, before local refinement.
    pub total: u64,
}

/// An in-flight catalog fetch. Cancelling the token makes the spawned fetch
/// task return without reporting, which is how a superseded fetch dies.
struct InflightFetch {
    cancel: CancellationToken,
    rx: oneshot::Receiver<(u64, Result<SearchPage, StorefrontError>)>,
}

/// The worker task behind one search surface.
///
/// A searcher owns the committed [`QueryFilter`], the debounce deadline for
/// text input, at most one in-flight catalog fetch, and the current result
/// list. All interaction goes through [`SearchCommand`]s; results and status
/// changes are published as [`StorefrontEvent`]s.
pub struct Searcher {
    id: SearcherId,
    config: Arc<EngineConfig>,
    provider: Arc<dyn CatalogProvider>,

    /// Receiver for incoming searcher commands
    cmd_rx: mpsc::Receiver<SearchCommand>,
    cmd_tx: mpsc::Sender<SearchCommand>,
    /// Sender for events to the embedder
    event_tx: broadcast::Sender<StorefrontEvent>,

    /// The committed filter; what the last or next fetch is based on
    filter: QueryFilter,
    /// Text typed but not yet committed (still inside the settle window)
    pending_text: Option<String>,
    /// When the pending text commits; `None` when no text is pending
    deadline: Option<Instant>,

    sort: SortOrder,
    phase: SearchPhase,
    status: SearchStatus,
    items: Vec<CatalogItem>,
    total: u64,

    /// Generation of the newest fetch; stale results carry an older one
    generation: u64,
    /// Current in-flight fetch, if any
    load: Option<InflightFetch>,
    /// The filter the newest fetch ran with, for duplicate suppression
    last_fetched: Option<QueryFilter>,
}

impl Searcher {
    /// Creates a new searcher. Does NOT spawn the worker.
    pub fn new(
        config: Arc<EngineConfig>,
        provider: Arc<dyn CatalogProvider>,
        event_tx: broadcast::Sender<StorefrontEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SearchCommand>(DEFAULT_CHANNEL_CAPACITY);

        Self {
            id: SearcherId::new(),
            config,
            provider,
            cmd_rx,
            cmd_tx,
            event_tx,
            filter: QueryFilter::default(),
            pending_text: None,
            deadline: None,
            sort: SortOrder::default(),
            phase: SearchPhase::default(),
            status: SearchStatus::default(),
            items: Vec::new(),
            total: 0,
            generation: 0,
            load: None,
            last_fetched: None,
        }
    }

    /// Creates a new searcher and spawns its worker task.
    pub fn new_on_thread(
        config: Arc<EngineConfig>,
        provider: Arc<dyn CatalogProvider>,
        event_tx: broadcast::Sender<StorefrontEvent>,
    ) -> (SearchHandle, JoinHandle<()>) {
        let this = Self::new(config, provider, event_tx);
        let handle = this.handle();
        let join_handle = tokio::spawn(this.run());
        (handle, join_handle)
    }

    /// Returns a command handle for this searcher.
    pub fn handle(&self) -> SearchHandle {
        SearchHandle::new(self.id, self.cmd_tx.clone())
    }

    pub fn id(&self) -> SearcherId {
        self.id
    }

    /// Main searcher loop. Drives the debounce deadline, fetch resolution,
    /// and command handling.
    pub async fn run(mut self) {
        log::debug!("Worker started for searcher {}", self.id);
        let _ = self.event_tx.send(StorefrontEvent::SearchOpened { searcher_id: self.id });

        loop {
            tokio::select! {
                // Settle window elapsed for pending text input
                _ = debounce_elapsed(self.deadline) => {
                    self.commit_pending_text();
                }

                // Handle in-flight fetch completion
                res = next_fetch_result(&mut self.load) => {
                    self.load = None;
                    match res {
                        Ok((generation, result)) => self.apply_fetch(generation, result),
                        Err(_) => {
                            // Fetch task went away without reporting; superseded
                            log::debug!("Searcher[{}] fetch reply dropped", self.id);
                        }
                    }
                }

                // Handle incoming searcher commands
                msg = self.cmd_rx.recv() => {
                    let Some(cmd) = msg else {
                        // Channel closed, exit the loop
                        break;
                    };

                    if !self.handle_command(cmd) {
                        break;
                    }
                }
            }
        }

        self.cancel_inflight();
        log::debug!("Searcher task {} exiting", self.id);
        let _ = self.event_tx.send(StorefrontEvent::SearchClosed { searcher_id: self.id });
    }

    /// Applies one command. Returns `false` when the searcher should exit.
    fn handle_command(&mut self, cmd: SearchCommand) -> bool {
        match cmd {
            SearchCommand::SetText { text } => self.set_text(text),
            SearchCommand::SetItemType { type_id } => {
                self.filter.item_type = type_id;
                self.commit(false);
            }
            SearchCommand::SetProperty { name, value } => {
                self.filter.set_property(name, value);
                self.commit(false);
            }
            SearchCommand::ClearProperties => {
                if !self.filter.properties.is_empty() {
                    self.filter.properties.clear();
                    self.commit(false);
                }
            }
            SearchCommand::SetSort { order } => self.set_sort(order),
            SearchCommand::Refresh => self.commit(true),
            SearchCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            SearchCommand::Close => return false,
        }
        true
    }

    /// Takes new text input. Non-empty filters wait out the settle window;
    /// an input that empties the whole filter resets to idle right away.
    fn set_text(&mut self, text: String) {
        let mut candidate = self.filter.clone();
        candidate.text = text;

        if candidate.is_empty() {
            self.filter = candidate;
            self.pending_text = None;
            self.deadline = None;
            self.reset_idle();
            return;
        }

        self.pending_text = Some(candidate.text);
        self.deadline = Some(Instant::now() + self.config.debounce_window);
        // The previous results stay visible while the input settles, so the
        // status line is left alone here.
        self.set_phase(SearchPhase::Debouncing);
    }

    /// Commits pending text once the settle window elapsed.
    fn commit_pending_text(&mut self) {
        self.deadline = None;
        if let Some(text) = self.pending_text.take() {
            self.filter.text = text;
        }
        self.commit(false);
    }

    /// Commits the current filter: empty resets to idle, anything else
    /// fetches. Identical committed filters do not refetch unless forced
    /// or recovering from an error.
    fn commit(&mut self, force: bool) {
        if self.filter.is_empty() {
            self.reset_idle();
            return;
        }

        if !force
            && self.phase != SearchPhase::Errored
            && self.last_fetched.as_ref() == Some(&self.filter)
        {
            if self.phase == SearchPhase::Debouncing {
                // The visible results already answer this filter.
                self.set_phase(SearchPhase::Settled);
            }
            return;
        }

        self.start_fetch();
    }

    /// Starts a catalog fetch for the committed filter, superseding any
    /// fetch still in flight.
    fn start_fetch(&mut self) {
        self.cancel_inflight();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        let cancel = CancellationToken::new();
        let child = cancel.child_token();
        let (tx, rx) = oneshot::channel();
        let provider = self.provider.clone();
        let text = self.filter.text_trimmed().to_string();
        let sort = self.sort.as_remote_param();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = child.cancelled() => return,
                result = provider.search(&text, sort) => result,
            };
            let _ = tx.send((generation, result));
        });

        self.load = Some(InflightFetch { cancel, rx });
        self.last_fetched = Some(self.filter.clone());
        self.set_phase(SearchPhase::Fetching);
        self.set_status(SearchStatus::Searching);
    }

    /// Applies a resolved fetch, unless a newer fetch owns the state by now.
    fn apply_fetch(&mut self, generation: u64, result: Result<SearchPage, StorefrontError>) {
        if generation != self.generation {
            log::debug!("Searcher[{}] dropping stale fetch (generation {generation})", self.id);
            return;
        }

        match result {
            Ok(page) => {
                let mut items = page.items;
                items.retain(|item| self.filter.matches(item));
                self.sort.apply(&mut items);

                let found = items.len();
                self.items = items;
                self.total = page.total;
                self.set_phase(SearchPhase::Settled);
                self.set_status(if found == 0 {
                    SearchStatus::NoResults
                } else {
                    SearchStatus::Found(found)
                });
                self.publish_results();
            }
            Err(e) => {
                log::warn!("Searcher[{}] fetch failed: {e}", self.id);
                self.items.clear();
                self.total = 0;
                self.set_phase(SearchPhase::Errored);
                self.set_status(SearchStatus::Failed);
                self.publish_results();
            }
        }
    }

    /// Re-orders the current results in place. Never refetches.
    fn set_sort(&mut self, order: SortOrder) {
        if self.sort == order {
            return;
        }
        self.sort = order;
        if !self.items.is_empty() {
            order.apply(&mut self.items);
            self.publish_results();
        }
    }

    /// Drops results and in-flight work; the searcher is as good as new.
    fn reset_idle(&mut self) {
        self.cancel_inflight();
        self.last_fetched = None;
        if !self.items.is_empty() || self.total != 0 {
            self.items.clear();
            self.total = 0;
            self.publish_results();
        }
        self.set_phase(SearchPhase::Idle);
        self.set_status(SearchStatus::NotSearched);
    }

    fn cancel_inflight(&mut self) {
        if let Some(load) = self.load.take() {
            load.cancel.cancel();
        }
    }

    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            id: self.id,
            filter: self.filter.clone(),
            sort: self.sort,
            phase: self.phase,
            status: self.status.clone(),
            items: self.items.clone(),
            total: self.total,
        }
    }

    fn set_phase(&mut self, phase: SearchPhase) {
        self.phase = phase;
    }

    fn set_status(&mut self, status: SearchStatus) {
        if self.status == status {
            return;
        }
        self.status = status.clone();
        let _ = self.event_tx.send(StorefrontEvent::SearchStatusChanged {
            searcher_id: self.id,
            status,
        });
    }

    fn publish_results(&self) {
        let _ = self.event_tx.send(StorefrontEvent::SearchResults {
            searcher_id: self.id,
            items: self.items.clone(),
            total: self.total,
        });
    }
}

/// Resolves when the settle deadline passes; pends forever without one.
async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => futures::future::pending().await,
    }
}

/// Resolves with the in-flight fetch result; pends forever without one.
async fn next_fetch_result(
    load: &mut Option<InflightFetch>,
) -> Result<(u64, Result<SearchPage, StorefrontError>), oneshot::error::RecvError> {
    match load {
        Some(fetch) => (&mut fetch.rx).await,
        None => futures::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::engine::catalog::{
        Inquiry, ItemId, ItemType, PropertyDefinition, PropertyValue, TypeRef,
    };

    fn item(
        id: &str,
        name: &str,
        price: f64,
        type_id: Option<&str>,
        props: &[(&str, &str)],
    ) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(id),
            name: name.to_string(),
            price,
            images: Vec::new(),
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
            item_type: type_id.map(|id| TypeRef {
                id: id.to_string(),
                name: id.to_string(),
            }),
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), PropertyValue::Text(v.to_string())))
                .collect(),
        }
    }

    fn furniture() -> Vec<CatalogItem> {
        vec![
            item("chair", "Oak Chair", 129.5, Some("seating"), &[("Material", "Solid Oak")]),
            item("table", "Oak Table", 450.0, Some("tables"), &[("Material", "Oak veneer")]),
            item("bench", "Pine Bench", 89.0, Some("seating"), &[("Material", "Pine")]),
        ]
    }

    /// Catalog double with per-text delays and failures, recording each call.
    struct ScriptedCatalog {
        items: Vec<CatalogItem>,
        delays: HashMap<String, Duration>,
        fail_texts: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedCatalog {
        fn new(items: Vec<CatalogItem>) -> Self {
            Self {
                items,
                delays: HashMap::new(),
                fail_texts: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn delay(mut self, text: &str, delay: Duration) -> Self {
            self.delays.insert(text.to_string(), delay);
            self
        }

        fn fail_on(mut self, text: &str) -> Self {
            self.fail_texts.push(text.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogProvider for ScriptedCatalog {
        fn name(&self) -> &str {
            "ScriptedCatalog"
        }

        async fn search(
            &self,
            text: &str,
            _sort: Option<&str>,
        ) -> Result<SearchPage, StorefrontError> {
            self.calls.lock().unwrap().push(text.to_string());
            if let Some(delay) = self.delays.get(text) {
                sleep(*delay).await;
            }
            if self.fail_texts.iter().any(|t| t == text) {
                return Err(StorefrontError::Status {
                    url: "scripted://search".into(),
                    status: 500,
                });
            }
            let needle = text.to_lowercase();
            let items: Vec<CatalogItem> = self
                .items
                .iter()
                .filter(|i| needle.is_empty() || i.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(SearchPage { items, total })
        }

        async fn item_types(&self) -> Result<Vec<ItemType>, StorefrontError> {
            Ok(Vec::new())
        }

        async fn type_properties(
            &self,
            _type_id: &str,
        ) -> Result<Vec<PropertyDefinition>, StorefrontError> {
            Ok(Vec::new())
        }

        async fn submit_inquiry(&self, _inquiry: &Inquiry) -> Result<(), StorefrontError> {
            Ok(())
        }

        async fn increment_view(&self, _id: &ItemId) -> Result<(), StorefrontError> {
            Ok(())
        }
    }

    fn spawn_searcher(
        provider: Arc<ScriptedCatalog>,
    ) -> (SearchHandle, JoinHandle<()>, broadcast::Receiver<StorefrontEvent>) {
        let config = Arc::new(EngineConfig::default());
        let (event_tx, event_rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        let (handle, join) = Searcher::new_on_thread(config, provider, event_tx);
        (handle, join, event_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn empty_filter_never_fetches() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Idle);
        assert_eq!(snap.status, SearchStatus::NotSearched);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_collapse_into_one_fetch() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("o").await.unwrap();
        sleep(Duration::from_millis(100)).await;
        handle.set_text("oa").await.unwrap();
        sleep(Duration::from_millis(100)).await;
        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(provider.calls(), vec!["oak"]);

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Settled);
        assert_eq!(snap.status, SearchStatus::Found(2));
        assert_eq!(snap.items.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_text_cancels_the_pending_commit() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_millis(200)).await;
        handle.set_text("").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert!(provider.calls().is_empty());
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_committed_text_does_not_refetch() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;
        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(provider.calls(), vec!["oak"]);
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Settled);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_forces_a_refetch() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;
        handle.refresh().await.unwrap();
        sleep(Duration::from_millis(100)).await;

        assert_eq!(provider.calls(), vec!["oak", "oak"]);
    }

    #[tokio::test(start_paused = true)]
    async fn property_filter_commits_without_debounce_and_refines() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_property("Material", Some("oak".into())).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        // No settle window for property edits.
        assert_eq!(provider.calls(), vec![""]);

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.status, SearchStatus::Found(2));
        assert!(snap
            .items
            .iter()
            .all(|i| i.properties["Material"].as_text().to_lowercase().contains("oak")));
    }

    #[tokio::test(start_paused = true)]
    async fn type_filter_refines_the_returned_page() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_item_type(Some("seating".into())).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        let snap = handle.snapshot().await.unwrap();
        let names: Vec<&str> = snap.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Oak Chair", "Pine Bench"]);
        // Server total counts the unrefined page.
        assert_eq!(snap.total, 3);
        assert_eq!(snap.status, SearchStatus::Found(2));
    }

    #[tokio::test(start_paused = true)]
    async fn sort_reorders_without_refetching() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;
        handle.set_sort(SortOrder::PriceDescending).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        let snap = handle.snapshot().await.unwrap();
        let prices: Vec<f64> = snap.items.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![450.0, 129.5]);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_fetch_supersedes_a_slow_one() {
        let provider = Arc::new(
            ScriptedCatalog::new(vec![
                item("sofa", "Slow Sofa", 999.0, None, &[]),
                item("futon", "Fast Futon", 399.0, None, &[]),
            ])
            .delay("slow", Duration::from_secs(5)),
        );
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("slow").await.unwrap();
        sleep(Duration::from_millis(700)).await; // first fetch is now in flight
        handle.set_text("fast").await.unwrap();
        sleep(Duration::from_secs(6)).await; // long past the slow fetch's delay

        assert_eq!(provider.calls(), vec!["slow", "fast"]);

        let snap = handle.snapshot().await.unwrap();
        let names: Vec<&str> = snap.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Fast Futon"]);
        assert_eq!(snap.status, SearchStatus::Found(1));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_empties_results_and_recovers_on_change() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()).fail_on("broken"));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("broken").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Errored);
        assert_eq!(snap.status, SearchStatus::Failed);
        assert!(snap.items.is_empty());

        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Settled);
        assert_eq!(snap.status, SearchStatus::Found(2));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_matches_settle_as_no_results() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, _events) = spawn_searcher(provider.clone());

        handle.set_text("wardrobe").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.phase, SearchPhase::Settled);
        assert_eq!(snap.status, SearchStatus::NoResults);
        assert!(snap.items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_the_worker_and_reports_it() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, join, mut events) = spawn_searcher(provider);

        handle.close().await.unwrap();
        join.await.unwrap();

        // From a fresh searcher the bus carries exactly open and close.
        let mut saw_open = false;
        let mut saw_close = false;
        while let Ok(ev) = events.try_recv() {
            match ev {
                StorefrontEvent::SearchOpened { .. } => saw_open = true,
                StorefrontEvent::SearchClosed { .. } => saw_close = true,
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(saw_open && saw_close);

        // Commands after close fail cleanly.
        assert!(handle.refresh().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn status_and_result_events_flow_on_the_bus() {
        let provider = Arc::new(ScriptedCatalog::new(furniture()));
        let (handle, _join, mut events) = spawn_searcher(provider);

        handle.set_text("oak").await.unwrap();
        sleep(Duration::from_secs(1)).await;

        let mut statuses = Vec::new();
        let mut result_counts = Vec::new();
        while let Ok(ev) = events.try_recv() {
            match ev {
                StorefrontEvent::SearchStatusChanged { status, .. } => statuses.push(status),
                StorefrontEvent::SearchResults { items, .. } => result_counts.push(items.len()),
                _ => {}
            }
        }
        assert_eq!(statuses, vec![SearchStatus::Searching, SearchStatus::Found(2)]);
        assert_eq!(result_counts, vec![2]);
    }
}
