//! Engine internals: the facade, its stores, and the searcher workers.
//!
//! Most embedders only need [`ShowroomEngine`] to construct and start the
//! engine, and the [`EngineHandle`] it returns to drive everything else.

pub mod catalog;
pub mod consent;
pub mod engine;
pub mod events;
pub mod favorites;
pub mod handle;
pub mod recent;
pub mod search;
pub mod storage;
pub mod views;
pub mod visit;

/// Default capacity for command and event channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub use consent::ConsentStore;
pub use engine::ShowroomEngine;
pub use events::StorefrontEvent;
pub use favorites::FavoritesStore;
pub use handle::EngineHandle;
pub use recent::RecentlyViewed;
pub use views::ViewCounter;
pub use visit::ItemVisit;
