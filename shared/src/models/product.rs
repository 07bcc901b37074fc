//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// `stock_quantity` is never negative; the inventory ledger is the only
/// mutation path for it. `price` is the current catalog price — orders
/// snapshot it into their line items at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Catalog unit price (2 decimal places)
    pub price: Decimal,
    pub category: String,
    pub stock_quantity: i64,
    /// Unique across all products
    pub sku: String,
    pub is_active: bool,
    /// Creator reference (opaque user ID)
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub stock_quantity: Option<i64>,
    pub sku: String,
}

/// Update product payload
///
/// Stock is deliberately absent: corrections go through the inventory
/// ledger's set-stock operation, not the generic patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}
