//! Domain Models

pub mod order;
pub mod product;

pub use order::{
    InvalidOrderStatus, Order, OrderCreate, OrderItem, OrderItemInput, OrderStatistics,
    OrderStatus, OrderUpdate,
};
pub use product::{Product, ProductCreate, ProductUpdate};
