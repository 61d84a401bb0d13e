//! Equated monthly installment (EMI) plans.
//!
//! Monthly payment for principal `P`, annual rate `R`% and `n` months uses
//! the standard amortization formula:
//!
//! ```text
//! r   = R / 12 / 100
//! emi = P * r * (1 + r)^n / ((1 + r)^n - 1)
//! ```
//!
//! The plan catalog is compiled in; it is not fetched from the server.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::round_money;

/// Smallest subtotal for which EMI is offered.
pub const EMI_MIN_SUBTOTAL: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// An installment plan offered by a partner bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiOption {
    /// Term in months.
    pub months: u32,
    /// Annual interest rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    /// Lending bank.
    pub bank_name: String,
}

/// (months, rate in tenths of a percent, bank)
const PLANS: [(u32, i64, &str); 6] = [
    (3, 120, "HDFC Bank"),
    (6, 130, "ICICI Bank"),
    (9, 140, "State Bank of India"),
    (12, 150, "Axis Bank"),
    (18, 160, "Kotak Mahindra Bank"),
    (24, 160, "HDFC Bank"),
];

static CATALOG: LazyLock<Vec<EmiOption>> = LazyLock::new(|| {
    PLANS
        .iter()
        .map(|&(months, rate_tenths, bank)| EmiOption {
            months,
            interest_rate: Decimal::new(rate_tenths, 1),
            bank_name: bank.to_string(),
        })
        .collect()
});

/// All EMI plans, shortest term first.
#[must_use]
pub fn emi_catalog() -> &'static [EmiOption] {
    &CATALOG
}

/// Look up a plan by term and bank (bank match is case-insensitive).
#[must_use]
pub fn find_emi_option(months: u32, bank_name: &str) -> Option<&'static EmiOption> {
    emi_catalog()
        .iter()
        .find(|option| option.months == months && option.bank_name.eq_ignore_ascii_case(bank_name))
}

/// Whether EMI may be offered for this subtotal.
#[must_use]
pub fn is_emi_eligible(subtotal: Decimal) -> bool {
    subtotal >= EMI_MIN_SUBTOTAL
}

/// Monthly installment for `principal` over `months` at `annual_rate` percent.
///
/// A zero rate spreads the principal evenly. A zero term returns the
/// principal itself. Returns `None` when the term is long enough that the
/// compounding factor leaves the `Decimal` range.
#[must_use]
pub fn monthly_installment(
    principal: Decimal,
    months: u32,
    annual_rate: Decimal,
) -> Option<Decimal> {
    if months == 0 {
        return Some(round_money(principal));
    }

    let r = annual_rate / Decimal::from(12) / Decimal::ONE_HUNDRED;
    if r.is_zero() {
        return principal.checked_div(Decimal::from(months)).map(round_money);
    }

    let growth = Decimal::ONE + r;
    let mut factor = Decimal::ONE;
    for _ in 0..months {
        factor = factor.checked_mul(growth)?;
    }

    principal
        .checked_mul(r)?
        .checked_mul(factor)?
        .checked_div(factor - Decimal::ONE)
        .map(round_money)
}

/// Cost breakdown of paying `principal` with one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuote {
    /// The plan.
    pub option: EmiOption,
    /// Amount due each month.
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_installment: Decimal,
    /// `monthly_installment * months`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_payable: Decimal,
    /// `total_payable - principal`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Decimal,
}

/// Quote one plan for `principal`, or `None` if the amounts overflow.
#[must_use]
pub fn quote(principal: Decimal, option: &EmiOption) -> Option<EmiQuote> {
    let monthly = monthly_installment(principal, option.months, option.interest_rate)?;
    let total_payable = round_money(monthly.checked_mul(Decimal::from(option.months))?);
    Some(EmiQuote {
        option: option.clone(),
        monthly_installment: monthly,
        total_payable,
        total_interest: round_money(total_payable.checked_sub(principal)?),
    })
}

/// Quotes for every catalog plan, or none when the subtotal is below
/// [`EMI_MIN_SUBTOTAL`].
#[must_use]
pub fn emi_quotes(subtotal: Decimal) -> Vec<EmiQuote> {
    if !is_emi_eligible(subtotal) {
        return Vec::new();
    }
    emi_catalog()
        .iter()
        .filter_map(|option| quote(subtotal, option))
        .collect()
}
