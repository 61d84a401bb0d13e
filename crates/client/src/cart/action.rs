//! Cart intents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::ProductId;

/// Product data captured when an item is added to the cart.
///
/// The price is frozen at add-time; later upstream price changes do not
/// touch items already in the cart. The cart stores it rounded to two
/// decimal places (`33.333` becomes `33.33`) so line totals and the cart
/// total stay exact. `price` accepts both JSON numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Product identifier (cart identity key).
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price at add-time.
    pub price: Decimal,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

impl CartProduct {
    /// Create a product payload.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// The closed set of cart transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product, merging with an existing line by id.
    AddItem(CartProduct),
    /// Remove a line entirely.
    RemoveItem(ProductId),
    /// Set a line's quantity. Not clamped: callers must not submit `< 1`.
    UpdateQuantity {
        /// Line to update.
        id: ProductId,
        /// New absolute quantity.
        quantity: i64,
    },
    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "add_item",
            Self::RemoveItem(_) => "remove_item",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear_cart",
        }
    }

    /// Product the action targets, if any.
    #[must_use]
    pub const fn product_id(&self) -> Option<&ProductId> {
        match self {
            Self::AddItem(product) => Some(&product.id),
            Self::RemoveItem(id) | Self::UpdateQuantity { id, .. } => Some(id),
            Self::Clear => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_accepts_number_or_string() {
        let from_number: CartProduct =
            serde_json::from_str(r#"{"id":"a","name":"A","price":10.5,"image":"a.png"}"#).unwrap();
        let from_string: CartProduct =
            serde_json::from_str(r#"{"id":"a","name":"A","price":"10.5","image":"a.png"}"#)
                .unwrap();
        assert_eq!(from_number.price, Decimal::new(105, 1));
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_product_image_defaults_to_empty() {
        let product: CartProduct =
            serde_json::from_str(r#"{"id":"a","name":"A","price":1}"#).unwrap();
        assert!(product.image.is_empty());
    }

    #[test]
    fn test_action_metadata() {
        let action = CartAction::UpdateQuantity {
            id: ProductId::new("a"),
            quantity: 3,
        };
        assert_eq!(action.name(), "update_quantity");
        assert_eq!(action.product_id().map(ProductId::as_str), Some("a"));
        assert_eq!(CartAction::Clear.product_id(), None);
    }
}
