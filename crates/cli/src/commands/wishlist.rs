//! Wishlist commands.

use clap::Subcommand;
use shopfront_client::api::CommerceClient;
use shopfront_client::config::ClientConfig;
use shopfront_client::error::ClientError;
use shopfront_client::wishlist::{Completion, WishlistState, WishlistStore};
use shopfront_core::{CurrencyCode, ProductId, format_money};

use super::commerce_client;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Print the wishlist
    Show,
    /// Like a product
    Add {
        /// Product ID
        id: String,
    },
    /// Unlike a product
    Remove {
        /// Product ID
        id: String,
    },
    /// Remove every product
    Clear,
}

pub async fn run(action: WishlistAction, config: &ClientConfig) -> Result<(), ClientError> {
    let store = WishlistStore::new(commerce_client(config)?);

    let completion = match action {
        WishlistAction::Show => store.set_authenticated(true).await,
        WishlistAction::Add { id } => store.add(&ProductId::new(id)).await,
        WishlistAction::Remove { id } => store.remove(&ProductId::new(id)).await,
        WishlistAction::Clear => store.clear().await,
    };

    settle(&store, completion)?;
    print_wishlist(&store.snapshot(), config.currency);
    Ok(())
}

fn settle(store: &WishlistStore<CommerceClient>, completion: Completion) -> Result<(), ClientError> {
    match completion {
        Completion::Applied | Completion::Superseded => Ok(()),
        Completion::Failed => Err(ClientError::BadRequest(
            store
                .snapshot()
                .error
                .unwrap_or_else(|| "Wishlist request failed".to_string()),
        )),
    }
}

#[allow(clippy::print_stdout)]
fn print_wishlist(state: &WishlistState, currency: CurrencyCode) {
    if state.items.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }

    for item in &state.items {
        println!(
            "{:<16} {:<32} {:>12}",
            item.id.as_str(),
            item.name,
            format_money(item.price, currency)
        );
    }
}
