//! Server-cart methods (authenticated users only; never cached).

use tracing::instrument;

use arbor_core::CartItemId;
use arbor_core::cart::CartLine;

use super::types::{
    Ack, CartItemPayload, ReplaceCartRequest, ServerCart, ServerCartItem, UpdateCartItemRequest,
};
use super::{ApiError, ShopClient};

impl ShopClient {
    /// Get the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> Result<ServerCart, ApiError> {
        self.get_json("/user/cart", Some(token)).await
    }

    /// Replace the whole server cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token, lines), fields(line_count = lines.len()))]
    pub async fn replace_cart(
        &self,
        token: &str,
        lines: &[CartLine],
    ) -> Result<ServerCart, ApiError> {
        let request = ReplaceCartRequest {
            items: lines.iter().map(CartItemPayload::from).collect(),
        };
        self.put_json("/user/cart", &request, Some(token)).await
    }

    /// Add one line to the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token, line), fields(product_id = %line.product_id))]
    pub async fn add_cart_item(
        &self,
        token: &str,
        line: &CartLine,
    ) -> Result<ServerCartItem, ApiError> {
        self.post_json("/user/cart/items", &CartItemPayload::from(line), Some(token))
            .await
    }

    /// Update a cart item's quantity and options.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token, request), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        item_id: CartItemId,
        request: &UpdateCartItemRequest,
    ) -> Result<ServerCartItem, ApiError> {
        self.patch_json(&format!("/user/cart/items/{item_id}"), request, Some(token))
            .await
    }

    /// Remove a cart item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, token: &str, item_id: CartItemId) -> Result<Ack, ApiError> {
        self.delete_json(&format!("/user/cart/items/{item_id}"), Some(token))
            .await
    }

    /// Clear the whole server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &str) -> Result<Ack, ApiError> {
        self.delete_json("/user/cart", Some(token)).await
    }
}
