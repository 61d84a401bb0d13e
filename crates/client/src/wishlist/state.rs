//! Wishlist state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::ProductId;

/// A liked product. Membership only, no quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Product identifier.
    #[serde(alias = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current price as reported by the server.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

/// Snapshot of the wishlist as last reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistState {
    /// Items from the last applied server response.
    pub items: Vec<WishlistItem>,
    /// A request newer than the last applied response is outstanding.
    pub loading: bool,
    /// Message from the last failed request, cleared by the next success.
    pub error: Option<String>,
}

impl WishlistState {
    /// Returns `true` if the product is on the wishlist.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_accepts_mongo_style_id_and_string_price() {
        let item: WishlistItem =
            serde_json::from_str(r#"{"_id":"p1","name":"Lamp","price":"1299.5","image":"l.png"}"#)
                .unwrap();
        assert_eq!(item.id, ProductId::new("p1"));
        assert_eq!(item.price, Decimal::new(12995, 1));
    }

    #[test]
    fn test_item_serializes_price_as_number() {
        let item = WishlistItem {
            id: ProductId::new("p1"),
            name: "Lamp".to_string(),
            price: Decimal::new(25, 1),
            image: String::new(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["price"], serde_json::json!(2.5));
    }

    #[test]
    fn test_contains() {
        let state = WishlistState {
            items: vec![WishlistItem {
                id: ProductId::new("p1"),
                name: "Lamp".to_string(),
                price: Decimal::ONE,
                image: String::new(),
            }],
            ..WishlistState::default()
        };
        assert!(state.contains(&ProductId::new("p1")));
        assert!(!state.contains(&ProductId::new("p2")));
    }
}
