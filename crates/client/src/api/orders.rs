//! Order submission.

use tracing::instrument;
use uuid::Uuid;

use super::types::OrderConfirmation;
use super::{ApiError, CommerceClient};
use crate::checkout::OrderRequest;

impl CommerceClient {
    /// Hand an assembled order to the order API.
    ///
    /// Each call carries a fresh `Idempotency-Key`; retrying the same
    /// submission should reuse [`CommerceClient::submit_order_with_key`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, ApiError> {
        self.submit_order_with_key(order, Uuid::new_v4()).await
    }

    /// Submit an order with a caller-chosen idempotency key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, order), fields(lines = order.items.len(), total = %order.total_amount))]
    pub async fn submit_order_with_key(
        &self,
        order: &OrderRequest,
        idempotency_key: Uuid,
    ) -> Result<OrderConfirmation, ApiError> {
        let confirmation: OrderConfirmation = self
            .post(
                "/orders",
                Some(order),
                &[("Idempotency-Key", idempotency_key.to_string())],
            )
            .await?;

        tracing::info!(order_id = %confirmation.order_id, "Order submitted");
        Ok(confirmation)
    }
}
