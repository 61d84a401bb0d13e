//! Shipping address commands.

use clap::{Args, Subcommand};
use shopfront_client::checkout::{Address, NewAddress, default_address};
use shopfront_client::config::ClientConfig;
use shopfront_client::error::ClientError;

use super::commerce_client;

#[derive(Subcommand)]
pub enum AddressAction {
    /// List saved addresses; `*` marks the one checkout preselects
    List,
    /// Save a new address
    Add(AddressArgs),
}

#[derive(Args)]
pub struct AddressArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    line1: String,
    #[arg(long)]
    line2: Option<String>,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long, default_value = "India")]
    country: String,
    #[arg(long)]
    phone: String,
    /// Make this the default address
    #[arg(long)]
    default: bool,
}

impl From<AddressArgs> for NewAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            full_name: args.full_name,
            address_line1: args.line1,
            address_line2: args.line2,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
            phone: args.phone,
            is_default: args.default,
        }
    }
}

pub async fn run(action: AddressAction, config: &ClientConfig) -> Result<(), ClientError> {
    let client = commerce_client(config)?;

    match action {
        AddressAction::List => {
            let addresses = client.list_addresses().await?;
            print_addresses(&addresses);
        }
        AddressAction::Add(args) => {
            let address = NewAddress::from(args);
            address.validate()?;
            let saved = client.create_address(&address).await?;
            print_addresses(std::slice::from_ref(&saved));
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn print_addresses(addresses: &[Address]) {
    if addresses.is_empty() {
        println!("No saved addresses.");
        return;
    }

    let preselected = default_address(addresses).map(|a| &a.id);
    for address in addresses {
        let marker = if Some(&address.id) == preselected { "*" } else { " " };
        println!("{marker} {:<24} {}", address.id.as_str(), address.one_line());
    }
}
