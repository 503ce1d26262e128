use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::catalog::provider::{CatalogProvider, SearchPage};
use crate::engine::catalog::types::{
    CatalogItem, Inquiry, ItemId, ItemType, PropertyDefinition,
};
use crate::engine::search::SortOrder;
use crate::errors::StorefrontError;

/// Catalog provider serving a fixed in-memory item list.
///
/// Behaves like a small CMS: text matches against item names, the sort hint
/// is honored server-side, inquiries and view increments are recorded so
/// they can be inspected afterwards. Demos run against it without network
/// access; tests use it as a deterministic double.
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
    types: Vec<ItemType>,
    properties: HashMap<String, Vec<PropertyDefinition>>,
    views: Mutex<HashMap<ItemId, u64>>,
    inquiries: Mutex<Vec<Inquiry>>,
}

impl StaticCatalog {
    /// Builds a catalog over `items`, deriving the type list from their refs.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut types: Vec<ItemType> = Vec::new();
        for item in &items {
            if let Some(type_ref) = &item.item_type {
                if !types.iter().any(|t| t.id == type_ref.id) {
                    types.push(ItemType {
                        id: type_ref.id.clone(),
                        name: type_ref.name.clone(),
                    });
                }
            }
        }
        types.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            items,
            types,
            properties: HashMap::new(),
            views: Mutex::new(HashMap::new()),
            inquiries: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the derived type list.
    pub fn with_types(mut self, types: Vec<ItemType>) -> Self {
        self.types = types;
        self
    }

    /// Registers the property definitions of one type.
    pub fn with_properties(mut self, type_id: &str, defs: Vec<PropertyDefinition>) -> Self {
        self.properties.insert(type_id.to_string(), defs);
        self
    }

    /// How many view increments `id` has received.
    pub fn view_count(&self, id: &ItemId) -> u64 {
        self.views.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    /// All inquiries submitted so far, in order.
    pub fn inquiries(&self) -> Vec<Inquiry> {
        self.inquiries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    fn name(&self) -> &str {
        "StaticCatalog"
    }

    async fn search(&self, text: &str, sort: Option<&str>) -> Result<SearchPage, StorefrontError> {
        let needle = text.to_lowercase();
        let mut items: Vec<CatalogItem> = self
            .items
            .iter()
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if let Some(order) = sort.and_then(SortOrder::from_remote_param) {
            order.apply(&mut items);
        }

        let total = items.len() as u64;
        Ok(SearchPage { items, total })
    }

    async fn item_types(&self) -> Result<Vec<ItemType>, StorefrontError> {
        Ok(self.types.clone())
    }

    async fn type_properties(
        &self,
        type_id: &str,
    ) -> Result<Vec<PropertyDefinition>, StorefrontError> {
        Ok(self.properties.get(type_id).cloned().unwrap_or_default())
    }

    async fn submit_inquiry(&self, inquiry: &Inquiry) -> Result<(), StorefrontError> {
        self.inquiries.lock().unwrap().push(inquiry.clone());
        Ok(())
    }

    async fn increment_view(&self, id: &ItemId) -> Result<(), StorefrontError> {
        *self.views.lock().unwrap().entry(id.clone()).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::types::TypeRef;

    fn item(id: &str, name: &str, price: f64, type_ref: Option<(&str, &str)>) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(id),
            name: name.to_string(),
            price,
            images: Vec::new(),
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
            item_type: type_ref.map(|(id, name)| TypeRef {
                id: id.to_string(),
                name: name.to_string(),
            }),
            properties: Default::default(),
        }
    }

    fn furniture() -> StaticCatalog {
        StaticCatalog::new(vec![
            item("chair", "Oak Chair", 129.5, Some(("seating", "Seating"))),
            item("table", "Oak Table", 450.0, Some(("tables", "Tables"))),
            item("bench", "Pine Bench", 89.0, Some(("seating", "Seating"))),
        ])
    }

    #[tokio::test]
    async fn search_matches_names_case_insensitively() {
        let catalog = furniture();
        let page = catalog.search("OAK", None).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|i| i.name.contains("Oak")));
    }

    #[tokio::test]
    async fn empty_text_returns_everything() {
        let catalog = furniture();
        let page = catalog.search("", None).await.unwrap();
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn sort_hint_is_honored() {
        let catalog = furniture();
        let page = catalog.search("", Some("price:asc")).await.unwrap();
        let prices: Vec<f64> = page.items.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![89.0, 129.5, 450.0]);
    }

    #[tokio::test]
    async fn types_are_derived_and_deduplicated() {
        let catalog = furniture();
        let types = catalog.item_types().await.unwrap();
        let ids: Vec<&str> = types.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["seating", "tables"]);
    }

    #[tokio::test]
    async fn view_increments_accumulate() {
        let catalog = furniture();
        let id = ItemId::from("chair");
        catalog.increment_view(&id).await.unwrap();
        catalog.increment_view(&id).await.unwrap();
        assert_eq!(catalog.view_count(&id), 2);
        assert_eq!(catalog.view_count(&ItemId::from("table")), 0);
    }
}
