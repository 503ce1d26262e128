//! Domain and wire types for the remote catalog.
//!
//! The catalog API exchanges JSON in camelCase; everything here derives serde
//! with the matching renames so the structs double as wire types. List
//! endpoints wrap their payload in [`ListResponse`], writes wrap theirs in
//! [`DataEnvelope`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StorefrontError;

// =============================================================================
// Identity
// =============================================================================

/// Opaque stable identifier of a catalog item.
///
/// Persisted state (favorites, history) references items by this id, so it
/// must stay stable across catalog fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Catalog items
// =============================================================================

/// Scalar value of a custom item property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl PropertyValue {
    /// Text form of the value, used for substring matching.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            PropertyValue::Text(s) => Cow::Borrowed(s),
            PropertyValue::Number(n) => Cow::Owned(n.to_string()),
            PropertyValue::Flag(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Reference to one product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image URL.
    pub url: String,
    /// Alt text, if the catalog supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Reference to the type an item belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: String,
    pub name: String,
}

/// A displayable entity fetched from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Opaque stable id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Non-negative price in the shop currency.
    pub price: f64,
    /// Ordered image references; the first one is the primary display image.
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// When the item was created in the catalog.
    pub created_at: DateTime<Utc>,
    /// Type the item belongs to, if classified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<TypeRef>,
    /// Custom property name to scalar value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl CatalogItem {
    /// Primary display image, if the item has any.
    pub fn primary_image(&self) -> Option<&ImageRef> {
        self.images.first()
    }
}

/// A selectable product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: String,
    pub name: String,
}

/// Data kind of a custom property.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Text,
    Number,
    Flag,
}

/// Definition of one custom property available on an item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub kind: PropertyKind,
}

// =============================================================================
// Persisted entries
// =============================================================================

/// A favorited item, reduced to the fields a list surface renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    /// Single display image carried along for rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl From<&CatalogItem> for FavoriteEntry {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.primary_image().cloned(),
        }
    }
}

/// One entry in the recently-viewed history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedEntry {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// When the item was viewed.
    pub viewed_at: DateTime<Utc>,
}

impl RecentlyViewedEntry {
    /// Builds an entry for `item` viewed right now.
    pub fn now(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.primary_image().cloned(),
            viewed_at: Utc::now(),
        }
    }
}

/// Cookie-consent decision persisted across sessions.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ConsentStatus {
    /// No decision recorded yet; the consent banner should show.
    #[default]
    Unset,
    Accepted,
    Declined,
}

impl ConsentStatus {
    /// Parses the persisted literal; unknown literals yield `None`.
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(ConsentStatus::Accepted),
            "declined" => Some(ConsentStatus::Declined),
            _ => None,
        }
    }

    /// Literal written to storage; `Unset` is represented by key absence.
    pub fn stored_literal(self) -> Option<&'static str> {
        match self {
            ConsentStatus::Unset => None,
            ConsentStatus::Accepted => Some("accepted"),
            ConsentStatus::Declined => Some("declined"),
        }
    }
}

// =============================================================================
// Inquiries
// =============================================================================

/// A lead-generation inquiry submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Item the inquiry refers to, if it was started from a detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_ref: Option<ItemId>,
}

impl Inquiry {
    /// Checks the required fields before submission.
    ///
    /// The name and message must be non-empty and the email must have the
    /// basic `local@domain` shape. Nothing fancier; the backend re-validates.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        if self.name.trim().is_empty() {
            return Err(StorefrontError::InvalidInquiry("name is required".into()));
        }
        if self.message.trim().is_empty() {
            return Err(StorefrontError::InvalidInquiry("message is required".into()));
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(StorefrontError::InvalidInquiry(
                "email address is malformed".into(),
            )),
        }
    }
}

// =============================================================================
// Wire envelopes
// =============================================================================

/// Standard list envelope returned by catalog read endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    /// Total matching entries server-side, across all pages.
    #[serde(default)]
    pub total: u64,
}

/// Write envelope for POST bodies (`{ "data": ... }`).
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(id: &str, name: &str, price: f64) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(id),
            name: name.to_string(),
            price,
            images: vec![ImageRef {
                url: format!("https://cdn.example/{id}/main.jpg"),
                alt: None,
            }],
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
            item_type: None,
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn item_decodes_from_wire_json() {
        let raw = r#"{
            "id": "chair-oak-01",
            "name": "Oak Chair",
            "price": 129.5,
            "images": [
                { "url": "https://cdn.example/chair/main.jpg", "alt": "front view" },
                { "url": "https://cdn.example/chair/side.jpg" }
            ],
            "createdAt": "2024-03-01T12:00:00Z",
            "itemType": { "id": "seating", "name": "Seating" },
            "properties": { "Material": "Solid Oak", "Seats": 1, "InStock": true }
        }"#;

        let item: CatalogItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.id.as_str(), "chair-oak-01");
        assert_eq!(item.price, 129.5);
        assert_eq!(item.primary_image().unwrap().alt.as_deref(), Some("front view"));
        assert_eq!(item.item_type.as_ref().unwrap().id, "seating");
        assert_eq!(
            item.properties.get("Material"),
            Some(&PropertyValue::Text("Solid Oak".into()))
        );
        assert_eq!(item.properties.get("Seats"), Some(&PropertyValue::Number(1.0)));
        assert_eq!(item.properties.get("InStock"), Some(&PropertyValue::Flag(true)));
    }

    #[test]
    fn item_tolerates_missing_optionals() {
        let raw = r#"{
            "id": "bare",
            "name": "Bare Item",
            "price": 5,
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;

        let item: CatalogItem = serde_json::from_str(raw).unwrap();
        assert!(item.images.is_empty());
        assert!(item.primary_image().is_none());
        assert!(item.item_type.is_none());
        assert!(item.properties.is_empty());
    }

    #[test]
    fn property_value_text_forms() {
        assert_eq!(PropertyValue::Text("Oak".into()).as_text(), "Oak");
        assert_eq!(PropertyValue::Number(2.0).as_text(), "2");
        assert_eq!(PropertyValue::Flag(false).as_text(), "false");
    }

    #[test]
    fn favorite_entry_carries_primary_image() {
        let item = sample_item("table-01", "Oak Table", 450.0);
        let entry = FavoriteEntry::from(&item);
        assert_eq!(entry.id, item.id);
        assert_eq!(entry.image.as_ref().unwrap().url, item.images[0].url);
    }

    #[test]
    fn list_envelope_decodes_total() {
        let raw = r#"{
            "data": [{ "id": "t", "name": "T" }],
            "meta": { "pagination": { "total": 7 } }
        }"#;
        let list: ListResponse<ItemType> = serde_json::from_str(raw).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.meta.pagination.total, 7);
    }

    #[test]
    fn list_envelope_tolerates_missing_meta() {
        let list: ListResponse<ItemType> = serde_json::from_str(r#"{ "data": [] }"#).unwrap();
        assert_eq!(list.meta.pagination.total, 0);
    }

    #[test]
    fn inquiry_validation() {
        let good = Inquiry {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Is the oak table in stock?".into(),
            item_ref: Some(ItemId::from("table-01")),
        };
        assert!(good.validate().is_ok());

        let blank_name = Inquiry { name: "  ".into(), ..good.clone() };
        assert!(matches!(
            blank_name.validate(),
            Err(StorefrontError::InvalidInquiry(_))
        ));

        let bad_email = Inquiry { email: "not-an-address".into(), ..good.clone() };
        assert!(bad_email.validate().is_err());

        let empty_domain = Inquiry { email: "ada@".into(), ..good };
        assert!(empty_domain.validate().is_err());
    }

    #[test]
    fn consent_literals_round_trip() {
        assert_eq!(ConsentStatus::from_stored("accepted"), Some(ConsentStatus::Accepted));
        assert_eq!(ConsentStatus::from_stored("declined"), Some(ConsentStatus::Declined));
        assert_eq!(ConsentStatus::from_stored("maybe"), None);
        assert_eq!(ConsentStatus::Accepted.stored_literal(), Some("accepted"));
        assert_eq!(ConsentStatus::Unset.stored_literal(), None);
    }
}
