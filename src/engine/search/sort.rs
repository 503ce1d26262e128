use crate::engine::catalog::CatalogItem;

/// Result ordering applied client-side after every fetch.
///
/// The same order is also forwarded to the server as a hint (see
/// [`as_remote_param`](Self::as_remote_param)), but the local pass is what
/// guarantees the displayed order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep the order the catalog returned.
    #[default]
    Relevance,
    PriceAscending,
    PriceDescending,
    NameAscending,
    NameDescending,
}

impl SortOrder {
    /// Server-side sort hint in `field:direction` form; `None` for relevance.
    pub fn as_remote_param(self) -> Option<&'static str> {
        match self {
            SortOrder::Relevance => None,
            SortOrder::PriceAscending => Some("price:asc"),
            SortOrder::PriceDescending => Some("price:desc"),
            SortOrder::NameAscending => Some("name:asc"),
            SortOrder::NameDescending => Some("name:desc"),
        }
    }

    /// Parses a `field:direction` hint back into an order.
    pub fn from_remote_param(param: &str) -> Option<Self> {
        match param {
            "price:asc" => Some(SortOrder::PriceAscending),
            "price:desc" => Some(SortOrder::PriceDescending),
            "name:asc" => Some(SortOrder::NameAscending),
            "name:desc" => Some(SortOrder::NameDescending),
            _ => None,
        }
    }

    /// Sorts `items` in place. The sort is stable, so items comparing equal
    /// keep the order the catalog returned; `Relevance` leaves the slice
    /// untouched.
    pub fn apply(self, items: &mut [CatalogItem]) {
        match self {
            SortOrder::Relevance => {}
            SortOrder::PriceAscending => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDescending => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::NameAscending => items.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOrder::NameDescending => items.sort_by(|a, b| b.name.cmp(&a.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::ItemId;

    fn item(id: &str, name: &str, price: f64) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(id),
            name: name.to_string(),
            price,
            images: Vec::new(),
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
            item_type: None,
            properties: Default::default(),
        }
    }

    fn names(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn price_ascending_orders_cheapest_first() {
        let mut items = vec![
            item("t", "Oak Table", 450.0),
            item("b", "Pine Bench", 89.0),
            item("c", "Oak Chair", 129.5),
        ];
        SortOrder::PriceAscending.apply(&mut items);
        assert_eq!(names(&items), vec!["Pine Bench", "Oak Chair", "Oak Table"]);
    }

    #[test]
    fn name_descending_reverses_lexicographic_order() {
        let mut items = vec![
            item("c", "Oak Chair", 129.5),
            item("t", "Oak Table", 450.0),
            item("b", "Pine Bench", 89.0),
        ];
        SortOrder::NameDescending.apply(&mut items);
        assert_eq!(names(&items), vec!["Pine Bench", "Oak Table", "Oak Chair"]);
    }

    #[test]
    fn equal_prices_keep_fetch_order() {
        let mut items = vec![
            item("first", "First", 10.0),
            item("second", "Second", 10.0),
            item("cheap", "Cheap", 1.0),
        ];
        SortOrder::PriceAscending.apply(&mut items);
        assert_eq!(names(&items), vec!["Cheap", "First", "Second"]);
    }

    #[test]
    fn relevance_is_a_no_op() {
        let mut items = vec![item("z", "Zebra", 5.0), item("a", "Aardvark", 9.0)];
        SortOrder::Relevance.apply(&mut items);
        assert_eq!(names(&items), vec!["Zebra", "Aardvark"]);
        assert_eq!(SortOrder::Relevance.as_remote_param(), None);
    }

    #[test]
    fn remote_params_parse_back() {
        for order in [
            SortOrder::PriceAscending,
            SortOrder::PriceDescending,
            SortOrder::NameAscending,
            SortOrder::NameDescending,
        ] {
            let param = order.as_remote_param().unwrap();
            assert_eq!(SortOrder::from_remote_param(param), Some(order));
        }
        assert_eq!(SortOrder::from_remote_param("created:asc"), None);
    }
}
