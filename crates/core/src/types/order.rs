//! Order wire models and status enums.
//!
//! Orders are created by this layer once at checkout; everything after that
//! (status, payment status, production ETA) is backend-authoritative and
//! only read back for display.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use crate::cart::SelectedOption;

/// How the customer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Bank,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Bank => "bank",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-owned order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All states, in lifecycle order. Used by the admin status dropdown.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-owned payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Declined,
    Cancelled,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order snapshot.
///
/// `selected_options_json` mirrors the backend's storage format: the option
/// set serialized as a JSON array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(default)]
    pub calculated_production_time_days: i32,
    #[serde(default)]
    pub selected_options_json: String,
}

impl OrderItem {
    /// Decode the stored option set; malformed or empty JSON yields no options.
    #[must_use]
    pub fn selected_options(&self) -> Vec<SelectedOption> {
        serde_json::from_str(&self.selected_options_json).unwrap_or_default()
    }
}

/// An order as read back from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub estimated_production_time_days: i32,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The date production is expected to finish, from the creation date
    /// plus the estimated production days.
    #[must_use]
    pub fn estimated_ready_date(&self) -> DateTime<Utc> {
        self.created_at + chrono::Duration::days(i64::from(self.estimated_production_time_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let status: OrderStatus = serde_json::from_str("\"processing\"").expect("parse status");
        assert_eq!(status, OrderStatus::Processing);
        assert_eq!(status.to_string(), "processing");
    }

    #[test]
    fn test_order_item_options_decode() {
        let item = OrderItem {
            id: 1,
            order_id: OrderId::new(1),
            product_id: ProductId::new(7),
            quantity: 2,
            unit_price: "10".parse().expect("decimal"),
            line_total: "20".parse().expect("decimal"),
            calculated_production_time_days: 5,
            selected_options_json: r#"[{"id":3,"type":"color"}]"#.to_string(),
        };
        let options = item.selected_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options.first().map(|o| o.id.as_i64()), Some(3));
    }

    #[test]
    fn test_order_item_options_malformed() {
        let item = OrderItem {
            id: 1,
            order_id: OrderId::new(1),
            product_id: ProductId::new(7),
            quantity: 1,
            unit_price: "10".parse().expect("decimal"),
            line_total: "10".parse().expect("decimal"),
            calculated_production_time_days: 0,
            selected_options_json: "not json".to_string(),
        };
        assert!(item.selected_options().is_empty());
    }

    #[test]
    fn test_estimated_ready_date() {
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            status: OrderStatus::Pending,
            total_price: "99".parse().expect("decimal"),
            estimated_production_time_days: 10,
            payment_method: PaymentMethod::Bank,
            payment_status: PaymentStatus::Pending,
            created_at: "2025-03-01T12:00:00Z".parse().expect("timestamp"),
            items: Vec::new(),
        };
        assert_eq!(
            order.estimated_ready_date(),
            "2025-03-11T12:00:00Z".parse::<DateTime<Utc>>().expect("timestamp")
        );
    }
}
