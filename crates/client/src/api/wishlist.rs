//! Wishlist endpoints.

use shopfront_core::ProductId;
use tracing::instrument;

use super::types::{WishlistEnvelope, WishlistMutationEnvelope};
use super::{ApiError, CommerceClient};
use crate::wishlist::{WishlistApi, WishlistItem};

fn product_path(action: &str, product_id: &ProductId) -> String {
    format!(
        "/wishlist/{action}/{}",
        urlencoding::encode(product_id.as_str())
    )
}

impl WishlistApi for CommerceClient {
    #[instrument(skip(self))]
    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        let envelope: WishlistEnvelope = self.get("/wishlist").await?;
        Ok(envelope.items)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<Vec<WishlistItem>, ApiError> {
        let envelope: WishlistMutationEnvelope = self
            .post(&product_path("add", product_id), None::<&()>, &[])
            .await?;
        Ok(envelope.products)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_from_wishlist(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<WishlistItem>, ApiError> {
        let envelope: WishlistMutationEnvelope =
            self.delete(&product_path("remove", product_id)).await?;
        Ok(envelope.products)
    }

    #[instrument(skip(self))]
    async fn clear_wishlist(&self) -> Result<(), ApiError> {
        self.delete_ack("/wishlist/clear").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_path_encodes_ids() {
        assert_eq!(
            product_path("add", &ProductId::new("p1")),
            "/wishlist/add/p1"
        );
        assert_eq!(
            product_path("remove", &ProductId::new("a b/c")),
            "/wishlist/remove/a%20b%2Fc"
        );
    }
}
