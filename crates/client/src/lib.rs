//! Shopfront commerce client.
//!
//! Client-side state engine for a shopping front end:
//!
//! - [`cart`] - local cart with durable persistence and snapshot broadcast
//! - [`wishlist`] - server-backed wishlist synchronization
//! - [`checkout`] - tax, EMI, address and payment validation, order assembly
//! - [`api`] - HTTP client for the remote commerce API
//! - [`storage`] - key-value persistence boundary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;
pub mod wishlist;
