//! Wishlist store against the fake commerce API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use shopfront_client::api::ApiError;
use shopfront_client::wishlist::{Completion, WishlistApi, WishlistStore};
use shopfront_core::ProductId;
use shopfront_integration_tests::FakeCommerceApi;

async fn api_with_products() -> FakeCommerceApi {
    let api = FakeCommerceApi::start().await;
    api.add_product("p-lamp", "Brass Lamp", 1299.5);
    api.add_product("p-mug", "Stoneware Mug", 450.0);
    api.add_product("p-rug", "Jute Rug", 3200.0);
    api
}

#[tokio::test]
async fn test_sign_in_loads_server_wishlist() {
    let api = api_with_products().await;
    api.client()
        .add_to_wishlist(&ProductId::new("p-mug"))
        .await
        .unwrap();

    let store = WishlistStore::new(api.client());
    assert_eq!(store.set_authenticated(true).await, Completion::Applied);

    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, ProductId::new("p-mug"));
    assert_eq!(state.items[0].price, Decimal::new(450, 0));
}

#[tokio::test]
async fn test_add_and_remove_replace_items_with_server_list() {
    let api = api_with_products().await;
    let store = WishlistStore::new(api.client());

    assert_eq!(store.add(&ProductId::new("p-lamp")).await, Completion::Applied);
    assert_eq!(store.add(&ProductId::new("p-rug")).await, Completion::Applied);
    let state = store.snapshot();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[0].price, Decimal::new(12995, 1));
    assert!(state.contains(&ProductId::new("p-rug")));

    assert_eq!(store.remove(&ProductId::new("p-lamp")).await, Completion::Applied);
    let state = store.snapshot();
    assert_eq!(state.items.len(), 1);
    assert!(!state.contains(&ProductId::new("p-lamp")));
    assert_eq!(api.wishlist_ids(), vec!["p-rug".to_string()]);
}

#[tokio::test]
async fn test_server_message_is_surfaced_and_items_kept() {
    let api = api_with_products().await;
    let store = WishlistStore::new(api.client());
    store.add(&ProductId::new("p-lamp")).await;

    assert_eq!(store.add(&ProductId::new("p-lamp")).await, Completion::Failed);
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Product already in wishlist"));
    assert_eq!(state.items.len(), 1);
    assert!(!state.loading);

    assert_eq!(store.add(&ProductId::new("p-ghost")).await, Completion::Failed);
    assert_eq!(store.snapshot().error.as_deref(), Some("Product not found"));

    // The next success clears the error
    assert_eq!(store.fetch().await, Completion::Applied);
    assert_eq!(store.snapshot().error, None);
}

#[tokio::test]
async fn test_clear_empties_wishlist() {
    let api = api_with_products().await;
    let store = WishlistStore::new(api.client());
    store.add(&ProductId::new("p-lamp")).await;
    store.add(&ProductId::new("p-mug")).await;

    assert_eq!(store.clear().await, Completion::Applied);
    assert!(store.snapshot().items.is_empty());
    assert!(api.wishlist_ids().is_empty());
}

#[tokio::test]
async fn test_rejected_token_reports_unauthorized() {
    let api = api_with_products().await;

    let client = api.client_with_token(Some("tok_revoked_Zx81Qa"));
    let result = client.fetch_wishlist().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    let store = WishlistStore::new(client);
    assert_eq!(store.fetch().await, Completion::Failed);
    assert_eq!(
        store.snapshot().error.as_deref(),
        Some("Failed to load wishlist")
    );
}

#[tokio::test]
async fn test_signed_out_client_never_reaches_server() {
    let api = api_with_products().await;
    let client = api.client_with_token(None);

    let result = client.add_to_wishlist(&ProductId::new("p-lamp")).await;
    assert!(matches!(result, Err(ApiError::MissingCredential)));
    assert!(api.wishlist_ids().is_empty());
}

#[tokio::test]
async fn test_sign_out_resets_state() {
    let api = api_with_products().await;
    let store = WishlistStore::new(api.client());
    store.add(&ProductId::new("p-lamp")).await;

    assert_eq!(store.set_authenticated(false).await, Completion::Applied);
    let state = store.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, None);

    // Server-side wishlist is untouched by a local sign-out
    assert_eq!(api.wishlist_ids(), vec!["p-lamp".to_string()]);
}
