//! Cart state and its transition function.
//!
//! `item_count` and `total` are maintained incrementally by [`CartState::apply`]
//! on every transition and are never recomputed lazily. The persisted record
//! uses the same shape: `{ items, itemCount, total }` with numeric amounts.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{ProductId, checked_line_total, line_total, round_money};
use thiserror::Error;

use super::action::CartAction;

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price captured at add-time.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    /// Number of units.
    pub quantity: i64,
}

impl CartItem {
    /// `price * quantity`, rounded to two decimal places.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}

/// Whether a transition changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state was modified.
    Changed,
    /// The action targeted nothing; the state is untouched.
    Unchanged,
}

impl Transition {
    /// Returns `true` for [`Transition::Changed`].
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Reasons a persisted cart record cannot be restored.
#[derive(Debug, Error)]
pub enum CartRecordError {
    /// The record is not valid JSON of the expected shape.
    #[error("malformed cart record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two lines share the same product id.
    #[error("duplicate cart line for product {0}")]
    DuplicateItem(ProductId),

    /// A line has a negative unit price.
    #[error("negative price for product {0}")]
    NegativePrice(ProductId),

    /// Quantities or amounts exceed the representable range.
    #[error("cart aggregates overflow")]
    Overflow,

    /// `itemCount`/`total` disagree with the lines.
    #[error(
        "cart aggregates out of sync: recorded {recorded_count}/{recorded_total}, \
         computed {computed_count}/{computed_total}"
    )]
    AggregateMismatch {
        recorded_count: i64,
        recorded_total: Decimal,
        computed_count: i64,
        computed_total: Decimal,
    },
}

fn overflowed(id: &ProductId) -> Transition {
    tracing::warn!(product_id = %id, "Cart transition overflows; state left unchanged");
    Transition::Unchanged
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<CartItem>,
    item_count: i64,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of all line quantities.
    #[must_use]
    pub const fn item_count(&self) -> i64 {
        self.item_count
    }

    /// Sum of all line totals, rounded to two decimal places.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Apply one intent to the cart.
    ///
    /// A transition whose quantities or amounts would overflow leaves the
    /// cart untouched and reports [`Transition::Unchanged`].
    pub fn apply(&mut self, action: CartAction) -> Transition {
        match action {
            CartAction::AddItem(product) => {
                let existing = self.find(&product.id).map(|item| (item.price, item.quantity));
                if let Some((price, quantity)) = existing {
                    let Some(quantity) = quantity.checked_add(1) else {
                        return overflowed(&product.id);
                    };
                    let shifted = self
                        .shifted(1, price)
                        .filter(|_| checked_line_total(price, quantity).is_some());
                    let Some((item_count, total)) = shifted else {
                        return overflowed(&product.id);
                    };
                    if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
                        item.quantity = quantity;
                    }
                    self.item_count = item_count;
                    self.total = total;
                } else {
                    let price = round_money(product.price);
                    let Some((item_count, total)) = self.shifted(1, price) else {
                        return overflowed(&product.id);
                    };
                    self.items.push(CartItem {
                        id: product.id,
                        name: product.name,
                        price,
                        image: product.image,
                        quantity: 1,
                    });
                    self.item_count = item_count;
                    self.total = total;
                }
                Transition::Changed
            }
            CartAction::RemoveItem(id) => {
                let Some(position) = self.items.iter().position(|item| item.id == id) else {
                    return Transition::Unchanged;
                };
                let Some(removed) = self.items.get(position) else {
                    return Transition::Unchanged;
                };
                let shifted = removed.quantity.checked_neg().and_then(|count| {
                    let amount = checked_line_total(removed.price, removed.quantity)?;
                    self.shifted(count, -amount)
                });
                let Some((item_count, total)) = shifted else {
                    return overflowed(&id);
                };
                self.items.remove(position);
                self.item_count = item_count;
                self.total = total;
                Transition::Changed
            }
            CartAction::UpdateQuantity { id, quantity } => {
                let Some((price, current)) = self.find(&id).map(|item| (item.price, item.quantity))
                else {
                    return Transition::Unchanged;
                };
                let Some(diff) = quantity.checked_sub(current) else {
                    return overflowed(&id);
                };
                if diff == 0 {
                    return Transition::Unchanged;
                }
                let shifted = checked_line_total(price, diff)
                    .and_then(|amount| self.shifted(diff, amount))
                    .filter(|_| checked_line_total(price, quantity).is_some());
                let Some((item_count, total)) = shifted else {
                    return overflowed(&id);
                };
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.quantity = quantity;
                }
                self.item_count = item_count;
                self.total = total;
                Transition::Changed
            }
            CartAction::Clear => {
                *self = Self::default();
                Transition::Changed
            }
        }
    }

    /// Aggregates moved by `count` units and `amount`, or `None` on overflow.
    fn shifted(&self, count: i64, amount: Decimal) -> Option<(i64, Decimal)> {
        let item_count = self.item_count.checked_add(count)?;
        let total = self.total.checked_add(amount)?;
        Some((item_count, round_money(total)))
    }

    /// Aggregates recomputed from scratch over the lines, or `None` if they
    /// overflow.
    ///
    /// Only used to validate restored records; live state relies on the
    /// incrementally maintained fields.
    #[must_use]
    pub fn computed_aggregates(&self) -> Option<(i64, Decimal)> {
        self.items
            .iter()
            .try_fold((0_i64, Decimal::ZERO), |(count, total), item| {
                let count = count.checked_add(item.quantity)?;
                let total = total.checked_add(checked_line_total(item.price, item.quantity)?)?;
                Some((count, round_money(total)))
            })
    }

    /// Serialize to the persisted record format.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be represented as a JSON number.
    pub fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate a persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is malformed, has duplicate lines or
    /// negative prices, or if its aggregates do not match its lines.
    pub fn from_record(raw: &str) -> Result<Self, CartRecordError> {
        let mut state: Self = serde_json::from_str(raw)?;
        state.total = round_money(state.total);
        for item in &mut state.items {
            item.price = round_money(item.price);
        }

        let mut seen = HashSet::new();
        for item in &state.items {
            if !seen.insert(&item.id) {
                return Err(CartRecordError::DuplicateItem(item.id.clone()));
            }
            if item.price.is_sign_negative() && !item.price.is_zero() {
                return Err(CartRecordError::NegativePrice(item.id.clone()));
            }
        }

        let (computed_count, computed_total) = state
            .computed_aggregates()
            .ok_or(CartRecordError::Overflow)?;
        if computed_count != state.item_count || computed_total != state.total {
            return Err(CartRecordError::AggregateMismatch {
                recorded_count: state.item_count,
                recorded_total: state.total,
                computed_count,
                computed_total,
            });
        }

        Ok(state)
    }
}
