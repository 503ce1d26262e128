//! Debounced catalog search.
//!
//! A searcher runs as its own worker task. Text input waits out a settle
//! window before it commits; type and property constraints commit right
//! away. Each committed filter change triggers at most one catalog fetch,
//! and a newer fetch always supersedes an older one still in flight, so
//! results never go backwards.
//!
//! Interact through a [`SearchHandle`], obtained from
//! [`EngineHandle::open_search`](crate::engine::EngineHandle::open_search).

pub mod filter;
pub mod handle;
pub mod sort;
pub mod status;
pub mod worker;

pub use filter::QueryFilter;
pub use handle::SearchHandle;
pub use sort::SortOrder;
pub use status::{SearchPhase, SearchStatus};
pub use worker::{Searcher, SearcherId, SearchSnapshot};
