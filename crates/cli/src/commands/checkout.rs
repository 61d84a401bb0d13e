//! Checkout commands.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use shopfront_client::checkout::{
    CheckoutForm, EMI_MIN_SUBTOTAL, PaymentForm, default_address, emi_quotes, prepare_order,
    summarize,
};
use shopfront_client::config::ClientConfig;
use shopfront_client::error::ClientError;
use shopfront_client::storage::PersistOutcome;
use shopfront_core::{AddressId, CurrencyCode, PaymentMethodKind, format_money};

use super::{commerce_client, open_cart};

#[derive(Subcommand)]
pub enum CheckoutAction {
    /// Show subtotal, tax, and total for the cart
    Quote,
    /// List EMI plans for the cart (or a given amount)
    EmiOptions {
        /// Amount to quote instead of the cart subtotal
        #[arg(long)]
        amount: Option<Decimal>,
    },
    /// Validate and submit the order, then empty the cart
    Place(PlaceArgs),
}

#[derive(Args)]
pub struct PlaceArgs {
    /// Saved address ID (defaults to the preselected address)
    #[arg(long)]
    address: Option<String>,
    /// Payment method: card, upi, emi, or wallet
    #[arg(long)]
    method: PaymentMethodKind,
    #[arg(long)]
    card_number: Option<String>,
    /// Card expiry as MM/YY
    #[arg(long)]
    card_expiry: Option<String>,
    #[arg(long)]
    card_cvv: Option<String>,
    #[arg(long)]
    card_name: Option<String>,
    #[arg(long)]
    upi_id: Option<String>,
    /// EMI term in months
    #[arg(long)]
    emi_months: Option<u32>,
    #[arg(long)]
    emi_bank: Option<String>,
    /// paytm, phonepe, amazonpay, or mobikwik
    #[arg(long)]
    wallet: Option<String>,
}

impl PlaceArgs {
    fn payment_form(&self) -> PaymentForm {
        PaymentForm {
            card_number: self.card_number.clone(),
            card_expiry: self.card_expiry.clone(),
            card_cvv: self.card_cvv.clone(),
            card_name: self.card_name.clone(),
            upi_id: self.upi_id.clone(),
            emi_months: self.emi_months,
            emi_bank: self.emi_bank.clone(),
            wallet_provider: self.wallet.clone(),
        }
    }
}

pub async fn run(action: CheckoutAction, config: &ClientConfig) -> Result<(), ClientError> {
    match action {
        CheckoutAction::Quote => {
            let cart = open_cart(config).snapshot();
            print_quote(cart.total(), config.currency);
            Ok(())
        }
        CheckoutAction::EmiOptions { amount } => {
            let amount = amount.unwrap_or_else(|| open_cart(config).snapshot().total());
            print_emi_options(amount, config.currency);
            Ok(())
        }
        CheckoutAction::Place(args) => place(&args, config).await,
    }
}

#[allow(clippy::print_stdout)]
async fn place(args: &PlaceArgs, config: &ClientConfig) -> Result<(), ClientError> {
    let client = commerce_client(config)?;
    let mut cart = open_cart(config);

    let saved = client.list_addresses().await?;
    let shipping_address = args
        .address
        .clone()
        .map(AddressId::new)
        .or_else(|| default_address(&saved).map(|a| a.id.clone()));

    let form = CheckoutForm {
        shipping_address,
        payment_method: args.method,
        payment: args.payment_form(),
    };
    let today = chrono::Local::now().date_naive();
    let order = prepare_order(&cart.snapshot(), &saved, &form, today)?;

    let confirmation = client.submit_order(&order).await?;
    println!(
        "Order {} placed ({}), total {}",
        confirmation.order_id,
        confirmation.status,
        format_money(order.total_amount + order.tax, config.currency)
    );

    if let Some(PersistOutcome::Failed { reason }) = cart.clear().persistence {
        println!("Warning: cart could not be cleared on disk ({reason})");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_quote(subtotal: Decimal, currency: CurrencyCode) {
    let summary = summarize(subtotal);
    println!("Subtotal {:>14}", format_money(summary.subtotal, currency));
    println!("Tax      {:>14}", format_money(summary.tax, currency));
    println!("Total    {:>14}", format_money(summary.total, currency));
}

#[allow(clippy::print_stdout)]
fn print_emi_options(amount: Decimal, currency: CurrencyCode) {
    let quotes = emi_quotes(amount);
    if quotes.is_empty() {
        println!(
            "EMI is available on orders of {} or more.",
            format_money(EMI_MIN_SUBTOTAL, currency)
        );
        return;
    }

    for quote in quotes {
        println!(
            "{:>2} months  {:<20} {:>5}%  {:>12}/month  total {:>12}  interest {:>10}",
            quote.option.months,
            quote.option.bank_name,
            quote.option.interest_rate,
            format_money(quote.monthly_installment, currency),
            format_money(quote.total_payable, currency),
            format_money(quote.total_interest, currency),
        );
    }
}
