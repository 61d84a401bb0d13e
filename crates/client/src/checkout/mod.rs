//! Checkout calculator: tax, EMI plans, address and payment validation, and
//! order assembly.
//!
//! Everything here is pure. Submitting the resulting [`OrderRequest`] is the
//! job of [`crate::api::CommerceClient::submit_order`].
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use shopfront_client::checkout::{emi_quotes, summarize};
//!
//! let summary = summarize(Decimal::new(100, 0));
//! assert_eq!(summary.total, Decimal::new(108, 0));
//!
//! assert!(emi_quotes(Decimal::new(4999, 0)).is_empty());
//! ```

mod address;
mod emi;
mod order;
mod payment;
mod tax;

pub use address::{Address, AddressError, NewAddress, default_address, select_address};
pub use emi::{
    EMI_MIN_SUBTOTAL, EmiOption, EmiQuote, emi_catalog, emi_quotes, find_emi_option,
    is_emi_eligible, monthly_installment, quote,
};
pub use order::{CheckoutError, CheckoutForm, OrderLine, OrderRequest, prepare_order};
pub use payment::{PaymentError, PaymentForm, PaymentMethodData, WalletProvider, validate_payment};
pub use tax::{OrderSummary, TAX_RATE, grand_total, summarize, tax};
