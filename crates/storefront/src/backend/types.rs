//! Request and response payloads for the commerce backend.
//!
//! The cart wire format stores each line's option set as a JSON string
//! (`selected_options_json`), mirroring how the backend persists it; the
//! conversion helpers translate between that and [`CartLine`].

use serde::{Deserialize, Serialize};

use arbor_core::cart::{CartLine, SelectedOption};
use arbor_core::{CartItemId, OrderId, PaymentMethod, ProductId};

// =============================================================================
// Auth
// =============================================================================

/// Body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub phone: String,
}

/// Body for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the server-held cart, as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub selected_options_json: String,
}

impl ServerCartItem {
    /// Decode into a [`CartLine`]; malformed option JSON yields no options.
    #[must_use]
    pub fn to_line(&self) -> CartLine {
        let options: Vec<SelectedOption> =
            serde_json::from_str(&self.selected_options_json).unwrap_or_default();
        CartLine::new(self.product_id, self.quantity, options)
    }
}

/// The server-held cart for an authenticated user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerCart {
    #[serde(default)]
    pub items: Vec<ServerCartItem>,
}

impl ServerCart {
    /// All lines in server order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.items.iter().map(ServerCartItem::to_line).collect()
    }

    /// Find the server item for a product, matching by product id only.
    #[must_use]
    pub fn item_for_product(&self, product_id: ProductId) -> Option<&ServerCartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }
}

/// One line in a cart write (`POST /user/cart/items`, `PUT /user/cart`).
#[derive(Debug, Clone, Serialize)]
pub struct CartItemPayload {
    pub product_id: ProductId,
    pub quantity: u32,
    pub options: Vec<SelectedOption>,
}

impl From<&CartLine> for CartItemPayload {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            options: line.options.clone(),
        }
    }
}

/// Body for `PUT /user/cart`.
#[derive(Debug, Serialize)]
pub struct ReplaceCartRequest {
    pub items: Vec<CartItemPayload>,
}

/// Body for `PATCH /user/cart/items/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
    pub options: Vec<SelectedOption>,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an order submission.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemPayload {
    pub product_id: ProductId,
    pub quantity: u32,
    pub options: Vec<SelectedOption>,
}

impl From<&CartLine> for OrderItemPayload {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            options: line.options.clone(),
        }
    }
}

/// Body for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemPayload>,
}

/// Response of `POST /orders`.
///
/// For card payments the backend may hand back a gateway checkout URL to
/// redirect the browser to.
#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
    #[serde(default)]
    pub checkout_url: Option<String>,
}

/// Body for `POST /user/orders/{id}/pay`.
#[derive(Debug, Serialize)]
pub struct PayOrderRequest {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

/// Response of `POST /user/orders/{id}/pay`.
#[derive(Debug, Deserialize)]
pub struct PayOrderResponse {
    #[serde(default)]
    pub payment_status: Option<String>,
}

/// Marker for ignored response bodies (e.g. DELETE acknowledgements).
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::OptionKind;

    #[test]
    fn test_server_cart_item_to_line() {
        let item = ServerCartItem {
            id: CartItemId::new(1),
            product_id: ProductId::new(7),
            quantity: 2,
            selected_options_json: r#"[{"id":3,"type":"color"}]"#.to_string(),
        };
        let line = item.to_line();
        assert_eq!(line.product_id, ProductId::new(7));
        assert_eq!(line.quantity, 2);
        assert_eq!(
            line.options,
            vec![SelectedOption {
                id: 3.into(),
                kind: OptionKind::Color
            }]
        );
    }

    #[test]
    fn test_server_cart_item_malformed_options() {
        let item = ServerCartItem {
            id: CartItemId::new(1),
            product_id: ProductId::new(7),
            quantity: 1,
            selected_options_json: "oops".to_string(),
        };
        assert!(item.to_line().options.is_empty());
    }

    #[test]
    fn test_item_for_product_matches_by_product_id() {
        let cart = ServerCart {
            items: vec![
                ServerCartItem {
                    id: CartItemId::new(1),
                    product_id: ProductId::new(7),
                    quantity: 1,
                    selected_options_json: String::new(),
                },
                ServerCartItem {
                    id: CartItemId::new(2),
                    product_id: ProductId::new(9),
                    quantity: 3,
                    selected_options_json: String::new(),
                },
            ],
        };
        assert_eq!(
            cart.item_for_product(ProductId::new(9)).map(|i| i.id),
            Some(CartItemId::new(2))
        );
        assert!(cart.item_for_product(ProductId::new(4)).is_none());
    }
}
