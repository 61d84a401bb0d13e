//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod payment;

pub use id::*;
pub use money::{
    CurrencyCode, MONEY_SCALE, Price, UnknownCurrency, checked_line_total, format_money, line_total,
    round_money,
};
pub use payment::{PaymentMethodKind, UnknownPaymentMethod};
