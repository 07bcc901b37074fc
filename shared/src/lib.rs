//! Shared types for the store backend
//!
//! Domain models and boundary types used by both the server and any
//! in-process consumers: products, orders, order line items, and the
//! actor/capability value passed into the order lifecycle boundary.

pub mod actor;
pub mod models;

// Re-exports
pub use actor::Actor;
pub use models::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatistics, OrderStatus, OrderUpdate,
    Product, ProductCreate, ProductUpdate,
};
pub use serde::{Deserialize, Serialize};
