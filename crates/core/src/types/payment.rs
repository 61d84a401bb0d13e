//! Payment method kinds offered at checkout.

use serde::{Deserialize, Serialize};

/// The payment methods a checkout can be paid with.
///
/// Exactly one kind is active per checkout; the method-specific data lives in
/// the client crate's `PaymentMethodData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodKind {
    /// Credit or debit card.
    Card,
    /// Unified Payments Interface transfer.
    Upi,
    /// Equated monthly installments through a partner bank.
    Emi,
    /// Third-party wallet.
    Wallet,
}

impl PaymentMethodKind {
    /// All payment method kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Card, Self::Upi, Self::Emi, Self::Wallet];
}

impl std::fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Upi => write!(f, "upi"),
            Self::Emi => write!(f, "emi"),
            Self::Wallet => write!(f, "wallet"),
        }
    }
}

/// Error returned when parsing an unknown payment method name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl std::str::FromStr for PaymentMethodKind {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "emi" => Ok(Self::Emi),
            "wallet" => Ok(Self::Wallet),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for kind in PaymentMethodKind::ALL {
            assert_eq!(kind.to_string().parse::<PaymentMethodKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_uses_screaming_case() {
        let json = serde_json::to_string(&PaymentMethodKind::Emi).unwrap();
        assert_eq!(json, "\"EMI\"");
    }

    #[test]
    fn test_unknown_method() {
        assert!("cheque".parse::<PaymentMethodKind>().is_err());
    }
}
