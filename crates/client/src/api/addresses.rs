//! Saved shipping address endpoints.

use tracing::instrument;

use super::types::{AddressEnvelope, AddressesEnvelope};
use super::{ApiError, CommerceClient};
use crate::checkout::{Address, NewAddress};

impl CommerceClient {
    /// List the shopper's saved addresses.
    ///
    /// The API is expected to mark exactly one address as default, but
    /// callers must not rely on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let envelope: AddressesEnvelope = self.get("/addresses").await?;
        Ok(envelope.addresses)
    }

    /// Save a new address. The created address becomes selectable at
    /// checkout; creating it does not place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, address), fields(city = %address.city))]
    pub async fn create_address(&self, address: &NewAddress) -> Result<Address, ApiError> {
        let envelope: AddressEnvelope = self.post("/addresses", Some(address), &[]).await?;
        Ok(envelope.address)
    }
}
