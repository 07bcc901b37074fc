use chrono::Utc;
use rust_decimal::Decimal;
use shared::Actor;
use shared::models::{OrderCreate, OrderItemInput, Product, ProductCreate};
use sqlx::Row;

use super::*;
use crate::db::DbService;
use crate::db::repository::{OrderRepository, ProductRepository};

mod test_flows;

// ========================================================================
// Helpers
// ========================================================================

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn staff_actor() -> Actor {
    Actor::new("staff-1", ["*".to_string()])
}

async fn setup() -> (DbService, OrderService) {
    let db = DbService::in_memory().await.unwrap();
    seed_user(&db, "customer-1").await;
    seed_user(&db, "staff-1").await;
    let service = OrderService::new(db.pool.clone());
    (db, service)
}

async fn seed_user(db: &DbService, id: &str) {
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, 'x', 1, ?, ?)",
    )
    .bind(id)
    .bind(format!("User {id}"))
    .bind(format!("{id}@example.com"))
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(&db.pool)
    .await
    .unwrap();
}

async fn seed_product(db: &DbService, name: &str, price: &str, stock: i64) -> Product {
    let repo = ProductRepository::new(db.pool.clone());
    repo.create(
        ProductCreate {
            name: name.to_string(),
            description: None,
            price: dec(price),
            category: Some("test".to_string()),
            stock_quantity: Some(stock),
            sku: format!("SKU-{name}"),
        },
        Some("staff-1"),
    )
    .await
    .unwrap()
}

async fn stock_of(db: &DbService, product_id: &str) -> i64 {
    sqlx::query("SELECT stock_quantity FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(&db.pool)
        .await
        .unwrap()
        .try_get("stock_quantity")
        .unwrap()
}

async fn order_count(db: &DbService) -> i64 {
    sqlx::query("SELECT COUNT(*) AS cnt FROM orders")
        .fetch_one(&db.pool)
        .await
        .unwrap()
        .try_get("cnt")
        .unwrap()
}

fn simple_order(items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        customer_id: "customer-1".to_string(),
        shipping_address: "1 Shipping Lane".to_string(),
        billing_address: "2 Billing Road".to_string(),
        notes: None,
        status: None,
        items,
    }
}

fn item(product_id: &str, quantity: i64) -> OrderItemInput {
    OrderItemInput {
        product_id: product_id.to_string(),
        quantity,
        unit_price: None,
    }
}

fn item_with_price(product_id: &str, quantity: i64, unit_price: &str) -> OrderItemInput {
    OrderItemInput {
        product_id: product_id.to_string(),
        quantity,
        unit_price: Some(dec(unit_price)),
    }
}
