//! Order assembly.
//!
//! [`prepare_order`] turns a cart snapshot plus the checkout form into the
//! payload of `POST /orders`. Nothing is sent from here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{AddressId, PaymentMethodKind, ProductId};
use thiserror::Error;

use super::address::{Address, select_address};
use super::payment::{PaymentError, PaymentForm, PaymentMethodData, validate_payment};
use super::tax::{OrderSummary, summarize};
use crate::cart::{CartItem, CartState};

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub shipping_address: AddressId,
    /// Cart subtotal, before tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Tax on `total_amount`; the amount charged is their sum.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    pub payment_method: PaymentMethodData,
}

/// Checkout form state at submission.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping_address: Option<AddressId>,
    pub payment_method: PaymentMethodKind,
    pub payment: PaymentForm,
}

/// Why an order could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Quantity for {product} must be at least 1")]
    InvalidQuantity { product: ProductId },

    #[error("Select a shipping address")]
    NoAddressSelected,

    #[error("The selected address is no longer available")]
    UnknownAddress(AddressId),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl CheckoutError {
    /// Form field the error belongs to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyCart | Self::InvalidQuantity { .. } => None,
            Self::NoAddressSelected | Self::UnknownAddress(_) => Some("shippingAddress"),
            Self::Payment(err) => Some(err.field()),
        }
    }
}

/// Build the order payload.
///
/// Checks run in order: cart not empty, every quantity at least 1, address
/// resolved against `saved`, then payment validation against the cart
/// subtotal. Amounts come from [`summarize`].
///
/// # Errors
///
/// Returns the first [`CheckoutError`] found.
pub fn prepare_order(
    cart: &CartState,
    saved: &[Address],
    form: &CheckoutForm,
    today: NaiveDate,
) -> Result<OrderRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if let Some(item) = cart.items().iter().find(|item| item.quantity < 1) {
        return Err(CheckoutError::InvalidQuantity {
            product: item.id.clone(),
        });
    }

    let address = select_address(saved, form.shipping_address.as_ref())?;

    let OrderSummary { subtotal, tax, .. } = summarize(cart.total());
    let payment_method = validate_payment(form.payment_method, &form.payment, cart.total(), today)?;

    Ok(OrderRequest {
        items: cart.items().iter().map(OrderLine::from).collect(),
        shipping_address: address.id.clone(),
        total_amount: subtotal,
        tax,
        payment_method,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::{CartAction, CartProduct};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn address(id: &str) -> Address {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "fullName": "Asha Rao",
            "addressLine1": "12 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "postalCode": "560001",
            "phone": "9845012345",
            "isDefault": true
        }))
        .unwrap()
    }

    fn cart() -> CartState {
        let mut cart = CartState::empty();
        cart.apply(CartAction::AddItem(CartProduct::new(
            "p1",
            "Kettle",
            Decimal::new(40, 0),
            "/img/kettle.png",
        )));
        cart.apply(CartAction::AddItem(CartProduct::new(
            "p2",
            "Mug",
            Decimal::new(10, 0),
            "",
        )));
        cart.apply(CartAction::UpdateQuantity {
            id: ProductId::new("p2"),
            quantity: 6,
        });
        cart
    }

    fn upi_form(address: Option<&str>) -> CheckoutForm {
        CheckoutForm {
            shipping_address: address.map(AddressId::new),
            payment_method: PaymentMethodKind::Upi,
            payment: PaymentForm {
                upi_id: Some("asha@okaxis".to_string()),
                ..PaymentForm::default()
            },
        }
    }

    #[test]
    fn test_prepare_order_payload() {
        let order = prepare_order(&cart(), &[address("a1")], &upi_form(Some("a1")), today()).unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.shipping_address, AddressId::new("a1"));
        assert_eq!(order.tax, Decimal::new(800, 2));
        assert_eq!(order.total_amount, Decimal::new(100, 0));

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["shippingAddress"], "a1");
        assert_eq!(json["totalAmount"], 100.0);
        assert_eq!(json["tax"], 8.0);
        assert_eq!(json["items"][0]["product"], "p1");
        assert_eq!(json["items"][0]["price"], 40.0);
        assert_eq!(json["items"][1]["quantity"], 6);
        assert_eq!(json["paymentMethod"]["type"], "UPI");
        assert_eq!(json["paymentMethod"]["upiId"], "asha@okaxis");
    }

    #[test]
    fn test_empty_cart_checked_first() {
        let err = prepare_order(&CartState::empty(), &[], &upi_form(None), today()).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let mut cart = cart();
        cart.apply(CartAction::UpdateQuantity {
            id: ProductId::new("p1"),
            quantity: 0,
        });

        let err = prepare_order(&cart, &[address("a1")], &upi_form(Some("a1")), today())
            .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InvalidQuantity {
                product: ProductId::new("p1")
            }
        );
    }

    #[test]
    fn test_address_checked_before_payment() {
        let mut form = upi_form(None);
        form.payment.upi_id = None;

        let err = prepare_order(&cart(), &[address("a1")], &form, today()).unwrap_err();
        assert_eq!(err, CheckoutError::NoAddressSelected);
        assert_eq!(err.field(), Some("shippingAddress"));

        form.shipping_address = Some(AddressId::new("a1"));
        let err = prepare_order(&cart(), &[address("a1")], &form, today()).unwrap_err();
        assert_eq!(err, CheckoutError::Payment(PaymentError::MissingUpiId));
        assert_eq!(err.field(), Some("upiId"));
        assert_eq!(err.to_string(), "UPI ID is required");
    }

    #[test]
    fn test_emi_uses_cart_subtotal() {
        let form = CheckoutForm {
            shipping_address: Some(AddressId::new("a1")),
            payment_method: PaymentMethodKind::Emi,
            payment: PaymentForm {
                emi_months: Some(3),
                emi_bank: Some("HDFC Bank".to_string()),
                ..PaymentForm::default()
            },
        };

        // Subtotal 100 is under the EMI threshold
        let err = prepare_order(&cart(), &[address("a1")], &form, today()).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Payment(PaymentError::EmiNotEligible { .. })
        ));
    }
}
