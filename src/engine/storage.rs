//! Storage system for the storefront engine.
//!
//! This module defines the trait, backends, and change plumbing behind every
//! piece of state the engine persists between sessions: the favorites list,
//! the recently-viewed history, and the cookie-consent decision.
//!
//! # Concepts
//!
//! All backends implement the [`StorageArea`] trait, a flat string key/value
//! interface with `get_item`, `set_item`, `remove_item`, and `clear`. The
//! engine never depends on a concrete backend; the embedder picks one at
//! construction time:
//!
//! - [`JsonFileStore`] — persists the whole map as a single JSON document on
//!   disk. The default choice for desktop embedders.
//! - [`InMemoryStore`] — keeps everything in memory. Suited to tests and to
//!   embedders that bring their own persistence.
//!
//! Stores built on top of an area read typed values through
//! [`read_json`]/[`write_json`], which serialize via serde and degrade
//! corrupt or unwritable data to defaults instead of failing.
//!
//! A [`StorageService`] wraps the chosen backend so that every mutation
//! publishes a [`StorageEvent`] on a broadcast bus; subscribe via
//! [`StorageService::subscribe`] to mirror changes elsewhere.
//!
//! # Example: opening a persistent store
//!
//! ```no_run
//! use std::sync::Arc;
//! use showroom_engine::storage::{JsonFileStore, StorageArea};
//!
//! let store: Arc<dyn StorageArea> = Arc::new(JsonFileStore::open("storefront.json"));
//! store.set_item("greeting", "hello").unwrap();
//! ```

/// Storage area module, defining the key/value storage interface.
pub mod area;
/// Event module, providing storage change events.
pub mod event;
/// In-memory storage backend.
pub mod in_memory;
/// JSON-file storage backend.
pub mod json_file;
/// Service module, wrapping a backend with change notifications.
pub mod service;

pub use area::{read_json, write_json, StorageArea};
pub use event::StorageEvent;
pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use service::{StorageService, Subscription};
