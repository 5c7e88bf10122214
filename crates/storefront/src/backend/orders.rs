//! Order methods: create, list, detail, pay.

use tracing::instrument;

use arbor_core::{Order, OrderId};

use super::types::{CreateOrderRequest, CreateOrderResponse, PayOrderRequest, PayOrderResponse};
use super::{ApiError, ShopClient};

impl ShopClient {
    /// Create an order from the given snapshot.
    ///
    /// For card payments the response may carry a gateway checkout URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token, request), fields(item_count = request.items.len()))]
    pub async fn create_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ApiError> {
        self.post_json("/orders", request, Some(token)).await
    }

    /// List the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        self.get_json("/user/orders", Some(token)).await
    }

    /// Fetch one of the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn my_order(&self, token: &str, order_id: OrderId) -> Result<Order, ApiError> {
        self.get_json(&format!("/user/orders/{order_id}"), Some(token))
            .await
    }

    /// Submit card details to pay for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is declined or the request fails.
    #[instrument(skip(self, token, request), fields(order_id = %order_id))]
    pub async fn pay_order(
        &self,
        token: &str,
        order_id: OrderId,
        request: &PayOrderRequest,
    ) -> Result<PayOrderResponse, ApiError> {
        self.post_json(&format!("/user/orders/{order_id}/pay"), request, Some(token))
            .await
    }
}
