//! Shipping addresses.

use serde::{Deserialize, Serialize};
use shopfront_core::AddressId;
use thiserror::Error;

use super::order::CheckoutError;

/// A saved shipping address, as returned by `GET /addresses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(alias = "_id")]
    pub id: AddressId,
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line rendering for lists.
    #[must_use]
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.full_name.as_str(), self.address_line1.as_str()];
        if let Some(line2) = self.address_line2.as_deref().filter(|l| !l.is_empty()) {
            parts.push(line2);
        }
        parts.extend([
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ]);
        parts.join(", ")
    }
}

fn default_country() -> String {
    "India".to_string()
}

/// Address form input, the body of `POST /addresses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Default for NewAddress {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            address_line1: String::new(),
            address_line2: None,
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: default_country(),
            phone: String::new(),
            is_default: false,
        }
    }
}

/// An address form rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Full name is required")]
    MissingFullName,
    #[error("Address line 1 is required")]
    MissingLine1,
    #[error("City is required")]
    MissingCity,
    #[error("State is required")]
    MissingState,
    #[error("Postal code is required")]
    MissingPostalCode,
    #[error("Postal code must be 4 to 10 letters or digits")]
    InvalidPostalCode,
    #[error("Phone number is required")]
    MissingPhone,
    #[error("Phone number must have 7 to 15 digits")]
    InvalidPhone,
}

impl AddressError {
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingFullName => "fullName",
            Self::MissingLine1 => "addressLine1",
            Self::MissingCity => "city",
            Self::MissingState => "state",
            Self::MissingPostalCode | Self::InvalidPostalCode => "postalCode",
            Self::MissingPhone | Self::InvalidPhone => "phone",
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl NewAddress {
    /// Check required fields in form order.
    ///
    /// # Errors
    ///
    /// Returns the first [`AddressError`] found.
    pub fn validate(&self) -> Result<(), AddressError> {
        if blank(&self.full_name) {
            return Err(AddressError::MissingFullName);
        }
        if blank(&self.address_line1) {
            return Err(AddressError::MissingLine1);
        }
        if blank(&self.city) {
            return Err(AddressError::MissingCity);
        }
        if blank(&self.state) {
            return Err(AddressError::MissingState);
        }

        let postal = self.postal_code.trim();
        if postal.is_empty() {
            return Err(AddressError::MissingPostalCode);
        }
        if !(4..=10).contains(&postal.len()) || !postal.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AddressError::InvalidPostalCode);
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(AddressError::MissingPhone);
        }
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        let allowed = phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if !allowed || !(7..=15).contains(&digits) {
            return Err(AddressError::InvalidPhone);
        }

        Ok(())
    }
}

/// The address preselected at checkout: the default one, else the first.
#[must_use]
pub fn default_address(saved: &[Address]) -> Option<&Address> {
    saved.iter().find(|a| a.is_default).or_else(|| saved.first())
}

/// Resolve the shopper's choice against the saved list.
///
/// # Errors
///
/// [`CheckoutError::NoAddressSelected`] when nothing is chosen,
/// [`CheckoutError::UnknownAddress`] when the id is not in `saved`.
pub fn select_address<'a>(
    saved: &'a [Address],
    chosen: Option<&AddressId>,
) -> Result<&'a Address, CheckoutError> {
    let id = chosen.ok_or(CheckoutError::NoAddressSelected)?;
    saved
        .iter()
        .find(|a| &a.id == id)
        .ok_or_else(|| CheckoutError::UnknownAddress(id.clone()))
}
