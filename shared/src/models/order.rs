//! Order Model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
///
/// Normal flow is `pending → processing → shipped → delivered`, with
/// `cancelled` reachable from any non-terminal state. `delivered` and
/// `cancelled` are terminal. Transitions outside the normal flow are
/// allowed administratively; unknown values are rejected at the
/// boundary by serde.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a persisted status string no longer matches the enum
#[derive(Debug, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(InvalidOrderStatus(other.to_string())),
        }
    }
}

/// Order line item
///
/// `unit_price` is the snapshot taken at order time and is immutable
/// thereafter, even if the catalog price later changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// quantity × unit_price (2 decimal places)
    pub line_total: Decimal,
}

/// Order entity with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-readable unique number (ORD- prefix)
    pub order_number: String,
    pub customer_id: String,
    /// Sum of line totals, fixed at creation
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub billing_address: String,
    pub notes: Option<String>,
    /// Assigned staff reference (opaque user ID)
    pub assigned_to: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Requested line item in a create-order call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i64,
    /// Explicit price override (discounts); catalog price when absent
    pub unit_price: Option<Decimal>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub notes: Option<String>,
    /// Initial status; defaults to pending
    pub status: Option<OrderStatus>,
    pub items: Vec<OrderItemInput>,
}

/// Update order payload
///
/// Totals and line items are immutable after creation; this patch only
/// covers addresses, notes, assignment and status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Aggregate order statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatistics {
    pub total_orders: i64,
    /// Revenue across all non-cancelled orders (business rule, not a
    /// storage artifact)
    pub total_revenue: Decimal,
    pub status_counts: BTreeMap<String, i64>,
}
