//! Local cart commands.

use clap::Subcommand;
use rust_decimal::Decimal;
use shopfront_client::cart::{CartProduct, CartState, DispatchOutcome, Transition};
use shopfront_client::config::ClientConfig;
use shopfront_client::error::ClientError;
use shopfront_client::storage::PersistOutcome;
use shopfront_core::{CurrencyCode, ProductId, format_money};

use super::open_cart;

#[derive(Subcommand)]
pub enum CartCommand {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
        /// Product name
        #[arg(short, long)]
        name: String,
        /// Unit price
        #[arg(short, long)]
        price: Decimal,
        /// Image URL
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity
    SetQty {
        /// Product ID
        id: String,
        /// New quantity (at least 1)
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

pub fn run(action: CartCommand, config: &ClientConfig) -> Result<(), ClientError> {
    let mut store = open_cart(config);

    let outcome = match action {
        CartCommand::Show => {
            print_cart(&store.snapshot(), config.currency);
            return Ok(());
        }
        CartCommand::Add {
            id,
            name,
            price,
            image,
        } => {
            if price.is_sign_negative() {
                return Err(ClientError::BadRequest("Price cannot be negative".to_string()));
            }
            store.add_item(CartProduct::new(id, name, price, image))
        }
        CartCommand::Remove { id } => store.remove_item(ProductId::new(id)),
        CartCommand::SetQty { id, quantity } => {
            if quantity < 1 {
                return Err(ClientError::BadRequest(
                    "Quantity must be at least 1; use `cart remove` to drop a line".to_string(),
                ));
            }
            store.update_quantity(ProductId::new(id), quantity)
        }
        CartCommand::Clear => store.clear(),
    };

    report_outcome(&outcome);
    print_cart(&store.snapshot(), config.currency);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn report_outcome(outcome: &DispatchOutcome) {
    if outcome.transition == Transition::Unchanged {
        println!("Nothing to change.");
    }
    if let Some(PersistOutcome::Failed { reason }) = &outcome.persistence {
        println!("Warning: cart was not saved ({reason}); changes last until exit.");
    }
}

#[allow(clippy::print_stdout)]
pub fn print_cart(cart: &CartState, currency: CurrencyCode) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in cart.items() {
        println!(
            "{:<16} {:<32} {:>4} x {:>12} = {:>12}",
            item.id.as_str(),
            item.name,
            item.quantity,
            format_money(item.price, currency),
            format_money(item.line_total(), currency),
        );
    }
    println!(
        "{} item(s), total {}",
        cart.item_count(),
        format_money(cart.total(), currency)
    );
}
