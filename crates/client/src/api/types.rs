//! Response envelopes returned by the commerce API.

use serde::{Deserialize, Serialize};
use shopfront_core::OrderId;

use crate::checkout::Address;
use crate::wishlist::WishlistItem;

/// `GET /wishlist` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WishlistEnvelope {
    #[serde(default)]
    pub items: Vec<WishlistItem>,
}

/// `POST /wishlist/add/{id}` and `DELETE /wishlist/remove/{id}` response.
///
/// The server returns the complete updated collection, not a delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WishlistMutationEnvelope {
    #[serde(default)]
    pub products: Vec<WishlistItem>,
}

/// `GET /addresses` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressesEnvelope {
    /// Saved addresses.
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// `POST /addresses` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressEnvelope {
    /// The created address.
    pub address: Address,
}

/// `POST /orders` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Identifier assigned by the order API.
    #[serde(alias = "_id", alias = "id")]
    pub order_id: OrderId,
    /// Initial order status (e.g. `pending`).
    #[serde(default)]
    pub status: String,
}
