//! Payment method validation.
//!
//! The checkout form collects raw strings; [`validate_payment`] checks them
//! for the selected method and produces the [`PaymentMethodData`] sent with
//! the order. Only the last four card digits leave this module.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{CurrencyCode, PaymentMethodKind, format_money};
use thiserror::Error;

use super::emi::{EMI_MIN_SUBTOTAL, find_emi_option, is_emi_eligible, monthly_installment};

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/(\d{2})$").expect("valid expiry regex"));

static UPI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]{2,256}@[A-Za-z][A-Za-z0-9]{1,64}$").expect("valid UPI regex")
});

/// Raw checkout form input for the payment step.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentForm {
    pub card_number: Option<String>,
    /// `MM/YY`.
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
    pub card_name: Option<String>,
    pub upi_id: Option<String>,
    pub emi_months: Option<u32>,
    pub emi_bank: Option<String>,
    pub wallet_provider: Option<String>,
}

impl std::fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_number", &self.card_number.as_ref().map(|_| "[REDACTED]"))
            .field("card_expiry", &self.card_expiry)
            .field("card_cvv", &self.card_cvv.as_ref().map(|_| "[REDACTED]"))
            .field("card_name", &self.card_name)
            .field("upi_id", &self.upi_id)
            .field("emi_months", &self.emi_months)
            .field("emi_bank", &self.emi_bank)
            .field("wallet_provider", &self.wallet_provider)
            .finish()
    }
}

/// Supported digital wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletProvider {
    Paytm,
    PhonePe,
    AmazonPay,
    MobiKwik,
}

impl WalletProvider {
    pub const ALL: [Self; 4] = [Self::Paytm, Self::PhonePe, Self::AmazonPay, Self::MobiKwik];

    /// Wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paytm => "paytm",
            Self::PhonePe => "phonepe",
            Self::AmazonPay => "amazonpay",
            Self::MobiKwik => "mobikwik",
        }
    }

    /// Name shown to shoppers.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Paytm => "Paytm",
            Self::PhonePe => "PhonePe",
            Self::AmazonPay => "Amazon Pay",
            Self::MobiKwik => "MobiKwik",
        }
    }
}

impl std::fmt::Display for WalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletProvider {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PaymentError::UnknownWalletProvider(wanted.to_string()))
    }
}

/// Validated payment details, as sent in the order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum PaymentMethodData {
    Card {
        last4: String,
        expiry: String,
        name_on_card: String,
    },
    Upi {
        upi_id: String,
    },
    Emi {
        months: u32,
        bank_name: String,
        #[serde(with = "rust_decimal::serde::float")]
        interest_rate: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        monthly_installment: Decimal,
    },
    Wallet {
        provider: WalletProvider,
    },
}

impl PaymentMethodData {
    #[must_use]
    pub const fn kind(&self) -> PaymentMethodKind {
        match self {
            Self::Card { .. } => PaymentMethodKind::Card,
            Self::Upi { .. } => PaymentMethodKind::Upi,
            Self::Emi { .. } => PaymentMethodKind::Emi,
            Self::Wallet { .. } => PaymentMethodKind::Wallet,
        }
    }
}

/// A payment form rejection. The display text is shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Card number is required")]
    MissingCardNumber,
    #[error("Card number must be 13 to 19 digits")]
    InvalidCardNumber,
    #[error("Expiry date is required")]
    MissingExpiry,
    #[error("Expiry date must be in MM/YY format")]
    InvalidExpiry,
    #[error("Card has expired")]
    CardExpired,
    #[error("CVV is required")]
    MissingCvv,
    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,
    #[error("Name on card is required")]
    MissingCardName,
    #[error("UPI ID is required")]
    MissingUpiId,
    #[error("Enter a valid UPI ID (e.g. name@bank)")]
    InvalidUpiId,
    #[error("EMI is available on orders of {} or more", format_money(*.minimum, CurrencyCode::default()))]
    EmiNotEligible { minimum: Decimal },
    #[error("Select an EMI plan")]
    MissingEmiOption,
    #[error("EMI plan of {months} months with {bank} is not available")]
    UnknownEmiOption { months: u32, bank: String },
    #[error("Select a wallet")]
    MissingWalletProvider,
    #[error("Unsupported wallet: {0}")]
    UnknownWalletProvider(String),
}

impl PaymentError {
    /// Form field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingCardNumber | Self::InvalidCardNumber => "cardNumber",
            Self::MissingExpiry | Self::InvalidExpiry | Self::CardExpired => "cardExpiry",
            Self::MissingCvv | Self::InvalidCvv => "cardCvv",
            Self::MissingCardName => "cardName",
            Self::MissingUpiId | Self::InvalidUpiId => "upiId",
            Self::EmiNotEligible { .. } | Self::MissingEmiOption | Self::UnknownEmiOption { .. } => {
                "emiOption"
            }
            Self::MissingWalletProvider | Self::UnknownWalletProvider(_) => "walletProvider",
        }
    }
}

/// Trimmed, non-empty field value.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validate the form for `kind`, returning the first failure.
///
/// `subtotal` gates EMI; `today` decides card expiry (a card is valid
/// through the last day of its expiry month).
///
/// # Errors
///
/// Returns the first [`PaymentError`] in form order.
pub fn validate_payment(
    kind: PaymentMethodKind,
    form: &PaymentForm,
    subtotal: Decimal,
    today: NaiveDate,
) -> Result<PaymentMethodData, PaymentError> {
    match kind {
        PaymentMethodKind::Card => validate_card(form, today),
        PaymentMethodKind::Upi => validate_upi(form),
        PaymentMethodKind::Emi => validate_emi(form, subtotal),
        PaymentMethodKind::Wallet => validate_wallet(form),
    }
}

fn validate_card(form: &PaymentForm, today: NaiveDate) -> Result<PaymentMethodData, PaymentError> {
    let number = present(form.card_number.as_ref()).ok_or(PaymentError::MissingCardNumber)?;
    let digits: String = number.chars().filter(|c| *c != ' ' && *c != '-').collect();
    if !(13..=19).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PaymentError::InvalidCardNumber);
    }

    let expiry = present(form.card_expiry.as_ref()).ok_or(PaymentError::MissingExpiry)?;
    let captures = EXPIRY_RE
        .captures(expiry)
        .ok_or(PaymentError::InvalidExpiry)?;
    let field = |i| captures.get(i).map_or("", |m| m.as_str());
    let month: u32 = field(1).parse().map_err(|_| PaymentError::InvalidExpiry)?;
    let year: i32 = field(2).parse().map_err(|_| PaymentError::InvalidExpiry)?;
    if (2000 + year, month) < (today.year(), today.month()) {
        return Err(PaymentError::CardExpired);
    }

    let cvv = present(form.card_cvv.as_ref()).ok_or(PaymentError::MissingCvv)?;
    if !(3..=4).contains(&cvv.len()) || !cvv.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PaymentError::InvalidCvv);
    }

    let name = present(form.card_name.as_ref()).ok_or(PaymentError::MissingCardName)?;

    let last4 = digits
        .get(digits.len().saturating_sub(4)..)
        .ok_or(PaymentError::InvalidCardNumber)?;

    Ok(PaymentMethodData::Card {
        last4: last4.to_string(),
        expiry: expiry.to_string(),
        name_on_card: name.to_string(),
    })
}

fn validate_upi(form: &PaymentForm) -> Result<PaymentMethodData, PaymentError> {
    let upi_id = present(form.upi_id.as_ref()).ok_or(PaymentError::MissingUpiId)?;
    if !UPI_RE.is_match(upi_id) {
        return Err(PaymentError::InvalidUpiId);
    }
    Ok(PaymentMethodData::Upi {
        upi_id: upi_id.to_string(),
    })
}

fn validate_emi(form: &PaymentForm, subtotal: Decimal) -> Result<PaymentMethodData, PaymentError> {
    if !is_emi_eligible(subtotal) {
        return Err(PaymentError::EmiNotEligible {
            minimum: EMI_MIN_SUBTOTAL,
        });
    }

    let (Some(months), Some(bank)) = (form.emi_months, present(form.emi_bank.as_ref())) else {
        return Err(PaymentError::MissingEmiOption);
    };

    let unavailable = || PaymentError::UnknownEmiOption {
        months,
        bank: bank.to_string(),
    };
    let option = find_emi_option(months, bank).ok_or_else(unavailable)?;
    let monthly = monthly_installment(subtotal, option.months, option.interest_rate)
        .ok_or_else(unavailable)?;

    Ok(PaymentMethodData::Emi {
        months: option.months,
        bank_name: option.bank_name.clone(),
        interest_rate: option.interest_rate,
        monthly_installment: monthly,
    })
}

fn validate_wallet(form: &PaymentForm) -> Result<PaymentMethodData, PaymentError> {
    let provider =
        present(form.wallet_provider.as_ref()).ok_or(PaymentError::MissingWalletProvider)?;
    Ok(PaymentMethodData::Wallet {
        provider: provider.parse()?,
    })
}
