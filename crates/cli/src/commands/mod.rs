//! Subcommand implementations.

pub mod address;
pub mod cart;
pub mod checkout;
pub mod wishlist;

use shopfront_client::api::{CommerceClient, StaticToken};
use shopfront_client::cart::CartStore;
use shopfront_client::config::ClientConfig;
use shopfront_client::error::ClientError;
use shopfront_client::storage::FileStore;

/// Open the cart persisted under the configured data directory.
pub fn open_cart(config: &ClientConfig) -> CartStore<FileStore> {
    CartStore::open(FileStore::new(config.data_dir.clone()))
}

/// Build an API client from configuration.
pub fn commerce_client(config: &ClientConfig) -> Result<CommerceClient, ClientError> {
    let api = config.require_api()?;
    Ok(CommerceClient::new(
        api,
        StaticToken::new(config.api_token.clone()),
    )?)
}
