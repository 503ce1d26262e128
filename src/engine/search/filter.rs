use std::collections::BTreeMap;

use crate::engine::catalog::CatalogItem;

/// The committed search filter.
///
/// `text` goes to the server; the type and property filters are applied
/// locally on whatever page the server returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    /// Free-text needle, matched server-side.
    pub text: String,
    /// Item-type id the results must belong to.
    pub item_type: Option<String>,
    /// Custom-property name to substring needle. All must match.
    pub properties: BTreeMap<String, String>,
}

impl QueryFilter {
    /// True when nothing is set. An empty filter never triggers a fetch.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.item_type.is_none() && self.properties.is_empty()
    }

    /// Normalized text value sent to the server.
    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Sets or clears one property needle. `None` and blank values clear.
    pub fn set_property(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match value {
            Some(v) if !v.trim().is_empty() => {
                self.properties.insert(name, v);
            }
            _ => {
                self.properties.remove(&name);
            }
        }
    }

    /// Whether `item` passes the locally-applied part of the filter.
    ///
    /// The item's type id must equal the selected one (ignoring ASCII case),
    /// and every property needle must appear case-insensitively in the
    /// item's matching property value. Items missing a filtered property
    /// are excluded.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(wanted) = &self.item_type {
            match &item.item_type {
                Some(type_ref) if type_ref.id.eq_ignore_ascii_case(wanted) => {}
                _ => return false,
            }
        }

        self.properties.iter().all(|(name, needle)| {
            item.properties
                .get(name)
                .is_some_and(|value| contains_ci(&value.as_text(), needle))
        })
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::{ItemId, PropertyValue, TypeRef};

    fn item(name: &str, type_id: Option<&str>, props: &[(&str, PropertyValue)]) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(name),
            name: name.to_string(),
            price: 100.0,
            images: Vec::new(),
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
            item_type: type_id.map(|id| TypeRef {
                id: id.to_string(),
                name: id.to_string(),
            }),
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn empty_means_no_text_no_type_no_properties() {
        let mut filter = QueryFilter::default();
        assert!(filter.is_empty());

        filter.text = "   ".into();
        assert!(filter.is_empty());

        filter.item_type = Some("seating".into());
        assert!(!filter.is_empty());

        filter.item_type = None;
        filter.set_property("Material", Some("oak".into()));
        assert!(!filter.is_empty());
    }

    #[test]
    fn property_needle_is_a_case_insensitive_substring() {
        let filter = QueryFilter {
            properties: [("Material".to_string(), "oak".to_string())].into(),
            ..Default::default()
        };

        let oak = item("Oak Chair", None, &[("Material", PropertyValue::Text("Solid Oak".into()))]);
        let pine = item("Pine Bench", None, &[("Material", PropertyValue::Text("Pine".into()))]);

        assert!(filter.matches(&oak));
        assert!(!filter.matches(&pine));
    }

    #[test]
    fn all_property_needles_must_match() {
        let mut filter = QueryFilter::default();
        filter.set_property("Material", Some("oak".into()));
        filter.set_property("Finish", Some("matte".into()));

        let both = item(
            "Oak Desk",
            None,
            &[
                ("Material", PropertyValue::Text("Oak".into())),
                ("Finish", PropertyValue::Text("Matte lacquer".into())),
            ],
        );
        let one = item(
            "Oak Shelf",
            None,
            &[("Material", PropertyValue::Text("Oak".into()))],
        );

        assert!(filter.matches(&both));
        // Missing a filtered property excludes the item.
        assert!(!filter.matches(&one));
    }

    #[test]
    fn non_text_properties_match_on_their_text_form() {
        let filter = QueryFilter {
            properties: [("Seats".to_string(), "4".to_string())].into(),
            ..Default::default()
        };
        let four = item("Family Table", None, &[("Seats", PropertyValue::Number(4.0))]);
        let two = item("Side Table", None, &[("Seats", PropertyValue::Number(2.0))]);
        assert!(filter.matches(&four));
        assert!(!filter.matches(&two));
    }

    #[test]
    fn type_filter_compares_ids_not_substrings() {
        let filter = QueryFilter {
            item_type: Some("seating".into()),
            ..Default::default()
        };

        let chair = item("Chair", Some("Seating"), &[]);
        let table = item("Table", Some("tables"), &[]);
        let untyped = item("Mystery", None, &[]);

        assert!(filter.matches(&chair));
        assert!(!filter.matches(&table));
        assert!(!filter.matches(&untyped));
    }

    #[test]
    fn blank_property_value_clears_the_needle() {
        let mut filter = QueryFilter::default();
        filter.set_property("Material", Some("oak".into()));
        filter.set_property("Material", Some("  ".into()));
        assert!(filter.properties.is_empty());

        filter.set_property("Material", Some("oak".into()));
        filter.set_property("Material", None);
        assert!(filter.properties.is_empty());
    }
}
