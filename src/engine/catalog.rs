//! The remote catalog: domain types and the providers that fetch them.
//!
//! [`CatalogProvider`] is the seam between the engine and the shop backend.
//! Searchers, the view counter, and inquiry submission all go through it, so
//! swapping the CMS for a fixture is a one-line change at construction time.

/// HTTP provider against the real CMS API.
pub mod http;
/// Provider trait the engine consumes.
pub mod provider;
/// Fixed in-memory provider for demos and tests.
pub mod static_catalog;
/// Domain and wire types.
pub mod types;

pub use http::HttpCatalog;
pub use provider::{CatalogProvider, SearchPage};
pub use static_catalog::StaticCatalog;
pub use types::{
    CatalogItem, ConsentStatus, DataEnvelope, FavoriteEntry, ImageRef, Inquiry, ItemId, ItemType,
    ListResponse, PropertyDefinition, PropertyKind, PropertyValue, RecentlyViewedEntry, TypeRef,
};
