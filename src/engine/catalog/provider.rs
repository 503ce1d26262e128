use async_trait::async_trait;

use crate::engine::catalog::types::{
    CatalogItem, Inquiry, ItemId, ItemType, PropertyDefinition,
};
use crate::errors::StorefrontError;

/// One page of search results plus the server-reported total.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<CatalogItem>,
    /// Total matching items server-side, which can exceed `items.len()`.
    pub total: u64,
}

/// The remote catalog surface the engine talks to.
///
/// Implementations cover the transport: [`HttpCatalog`](super::HttpCatalog)
/// speaks to the real CMS API, [`StaticCatalog`](super::StaticCatalog) serves
/// a fixed item list for demos and tests. The engine itself never assumes
/// more than this trait.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Name of the provider, for diagnostics.
    fn name(&self) -> &str;

    /// Runs a text search against the catalog.
    ///
    /// `text` is the settled free-text filter; an empty string means
    /// unfiltered. `sort` is a server-side ordering hint in
    /// `field:direction` form; callers re-sort locally either way.
    async fn search(&self, text: &str, sort: Option<&str>) -> Result<SearchPage, StorefrontError>;

    /// All selectable item types.
    async fn item_types(&self) -> Result<Vec<ItemType>, StorefrontError>;

    /// Custom-property definitions available on one item type.
    async fn type_properties(
        &self,
        type_id: &str,
    ) -> Result<Vec<PropertyDefinition>, StorefrontError>;

    /// Submits a lead inquiry.
    async fn submit_inquiry(&self, inquiry: &Inquiry) -> Result<(), StorefrontError>;

    /// Increments the view counter of one item.
    async fn increment_view(&self, id: &ItemId) -> Result<(), StorefrontError>;
}
