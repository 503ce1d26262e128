//! Engine event types and commands.
//!
//! This module defines the command vocabulary and the event bus payloads used
//! for communication between the engine, its searchers, and the embedder. It
//! includes searcher commands for filtering and sorting, engine commands for
//! lifecycle control, and the events every surface can subscribe to.
//!
//! # Main Types
//!
//! - [`SearchCommand`]: Commands for one searcher (filter edits, sort, snapshot).
//! - [`EngineCommand`]: Commands for engine control.
//! - [`StorefrontEvent`]: Events emitted by the engine, such as lifecycle events,
//!   search results, and store changes.

use tokio::sync::oneshot;

use crate::engine::catalog::{CatalogItem, ConsentStatus, FavoriteEntry, ItemId};
use crate::engine::search::{SearchHandle, SearchSnapshot, SearchStatus, SearcherId, SortOrder};
use crate::errors::StorefrontError;

/// Commands that can be sent to a specific searcher
#[derive(Debug)]
pub enum SearchCommand {
    // ****************************************
    // ** Filter edits
    /// Replace the free-text input (commits after the settle window)
    SetText { text: String },
    /// Select or clear the item-type filter (commits immediately)
    SetItemType { type_id: Option<String> },
    /// Set or clear one custom-property needle (commits immediately)
    SetProperty { name: String, value: Option<String> },
    /// Drop all custom-property needles
    ClearProperties,

    // ****************************************
    // ** Presentation
    /// Re-order the current results without refetching
    SetSort { order: SortOrder },

    // ****************************************
    // ** Lifecycle
    /// Re-run the committed filter against the catalog
    Refresh,
    /// Reply with the current state of the searcher
    Snapshot { reply: oneshot::Sender<SearchSnapshot> },
    /// Close the searcher
    Close,
}

#[derive(Debug)]
pub enum EngineCommand {
    // ****************************************
    // ** Engine control
    /// Gracefully shutdown the engine
    Shutdown {
        reply: oneshot::Sender<Result<(), StorefrontError>>,
    },

    // ****************************************
    // ** Searchers
    /// Spawn a new searcher task
    OpenSearch {
        reply: oneshot::Sender<Result<SearchHandle, StorefrontError>>,
    },
}

#[derive(Debug, Clone)]
pub enum StorefrontEvent {
    // ****************************************
    // ** Engine lifecycle
    /// Engine has started
    EngineStarted,
    /// Engine is shutting down
    EngineShutdown { reason: String },

    // ****************************************
    // ** Search lifecycle
    /// A searcher has been opened
    SearchOpened { searcher_id: SearcherId },
    /// A searcher has been closed
    SearchClosed { searcher_id: SearcherId },
    /// The status line of a searcher changed
    SearchStatusChanged {
        searcher_id: SearcherId,
        status: SearchStatus,
    },
    /// A searcher applied a new result list
    SearchResults {
        searcher_id: SearcherId,
        items: Vec<CatalogItem>,
        /// Server-side total, before local refinement
        total: u64,
    },

    // ****************************************
    // ** Stores
    /// An item was added to the favorites list
    FavoriteAdded { entry: FavoriteEntry },
    /// An item was removed from the favorites list
    FavoriteRemoved { id: ItemId },
    /// An item was recorded in the recently-viewed history
    RecentRecorded { id: ItemId },
    /// The cookie-consent decision changed
    ConsentChanged { status: ConsentStatus },

    // ****************************************
    // ** Remote side effects
    /// A view beacon was delivered for an item
    ViewRecorded { id: ItemId },
    /// An inquiry was accepted by the catalog
    InquirySubmitted { item: Option<ItemId> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_clone_independently() {
        let ev = StorefrontEvent::SearchStatusChanged {
            searcher_id: SearcherId::new(),
            status: SearchStatus::Found(3),
        };
        let copy = ev.clone();
        match (ev, copy) {
            (
                StorefrontEvent::SearchStatusChanged { status: a, .. },
                StorefrontEvent::SearchStatusChanged { status: b, .. },
            ) => assert_eq!(a, b),
            _ => panic!("clone changed the variant"),
        }
    }

    #[test]
    fn debug_names_the_variant() {
        let ev = StorefrontEvent::FavoriteRemoved {
            id: ItemId::from("chair-oak-01"),
        };
        let s = format!("{ev:?}");
        assert!(s.contains("FavoriteRemoved"));
        assert!(s.contains("chair-oak-01"));
    }
}
