//! Shopping cart: intents, state, and the persisting store.
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use shopfront_client::cart::{CartProduct, CartStore};
//! use shopfront_client::storage::MemoryStore;
//!
//! let mut store = CartStore::open(MemoryStore::new());
//! let tee = CartProduct::new("tee", "Tee", Decimal::new(10, 0), "tee.png");
//! store.add_item(tee.clone());
//! store.add_item(tee);
//!
//! let cart = store.snapshot();
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total(), Decimal::new(2000, 2));
//! ```

mod action;
mod state;
mod store;

pub use action::{CartAction, CartProduct};
pub use state::{CartItem, CartRecordError, CartState, Transition};
pub use store::{CART_STORAGE_KEY, CartStore, DispatchOutcome};
