//! Tax and order totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::round_money;

/// Flat sales tax rate applied to every order (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Tax due on `subtotal`, rounded to two decimal places.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    round_money(subtotal * TAX_RATE)
}

/// `subtotal + tax`.
#[must_use]
pub fn grand_total(subtotal: Decimal) -> Decimal {
    round_money(subtotal + tax(subtotal))
}

/// Amounts shown on the order review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Cart total before tax.
    pub subtotal: Decimal,
    /// Tax on the subtotal.
    pub tax: Decimal,
    /// Amount payable.
    pub total: Decimal,
}

/// Compute the order summary for a cart subtotal.
#[must_use]
pub fn summarize(subtotal: Decimal) -> OrderSummary {
    let subtotal = round_money(subtotal);
    let tax = tax(subtotal);
    OrderSummary {
        subtotal,
        tax,
        total: round_money(subtotal + tax),
    }
}
