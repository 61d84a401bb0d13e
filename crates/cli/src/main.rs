//! Shopfront CLI - drive the cart, wishlist, and checkout from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Cart (stored locally under SHOPFRONT_DATA_DIR)
//! shopfront cart add p-100 --name "Brass Lamp" --price 1299.50
//! shopfront cart set-qty p-100 3
//! shopfront cart show
//!
//! # Wishlist (requires SHOPFRONT_API_URL and SHOPFRONT_API_TOKEN)
//! shopfront wishlist add p-100
//!
//! # Checkout
//! shopfront checkout quote
//! shopfront checkout emi-options
//! shopfront checkout place --method upi --upi-id asha@okaxis
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the local cart
//! - `wishlist` - Show and edit the server-side wishlist
//! - `address` - List and save shipping addresses
//! - `checkout` - Order summary, EMI plans, and order placement

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_client::config::ClientConfig;
use shopfront_client::error::ClientError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::address::AddressAction;
use commands::cart::CartCommand;
use commands::checkout::CheckoutAction;
use commands::wishlist::WishlistAction;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront cart, wishlist, and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the local cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Show and edit the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage shipping addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Review and place the order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&ClientError::from(e)),
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_client=info,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        e.report();
        fail(&e);
    }
}

#[allow(clippy::print_stderr)]
fn fail(error: &ClientError) -> ! {
    eprintln!("error: {}", error.user_message());
    std::process::exit(1);
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), ClientError> {
    match cli.command {
        Commands::Cart { action } => commands::cart::run(action, config),
        Commands::Wishlist { action } => commands::wishlist::run(action, config).await,
        Commands::Address { action } => commands::address::run(action, config).await,
        Commands::Checkout { action } => commands::checkout::run(action, config).await,
    }
}
