//! Wishlist mirrored from the remote API.
//!
//! The server's response is always the new source of truth: the store never
//! inserts or removes items locally, it only flips `loading` immediately and
//! replaces `items` wholesale when a response arrives.

mod state;
mod store;

pub use state::{WishlistItem, WishlistState};
pub use store::{Completion, WishlistApi, WishlistStore};
