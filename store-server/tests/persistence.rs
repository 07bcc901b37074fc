//! Disk-backed database: data survives closing and reopening the pool

use chrono::Utc;
use rust_decimal::Decimal;
use shared::Actor;
use shared::models::{OrderCreate, OrderItemInput, ProductCreate};

use store_server::core::Config;
use store_server::db::repository::{OrderRepository, ProductRepository};
use store_server::{OrderService, ServerState};

async fn seed_user(state: &ServerState, id: &str) {
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, 'x', 1, ?, ?)",
    )
    .bind(id)
    .bind(format!("User {id}"))
    .bind(format!("{id}@example.com"))
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(state.pool())
    .await
    .unwrap();
}

#[tokio::test]
async fn orders_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store.db");
    let config = Config::with_overrides(db_path.to_string_lossy(), 0);

    let order_id = {
        let state = ServerState::initialize(&config).await.unwrap();
        seed_user(&state, "customer-1").await;
        seed_user(&state, "staff-1").await;

        let product = ProductRepository::new(state.pool().clone())
            .create(
                ProductCreate {
                    name: "Durable".to_string(),
                    description: None,
                    price: "20.00".parse().unwrap(),
                    category: None,
                    stock_quantity: Some(10),
                    sku: "SKU-DUR".to_string(),
                },
                Some("staff-1"),
            )
            .await
            .unwrap();

        let service = OrderService::new(state.pool().clone());
        let actor = Actor::new("staff-1", ["*".to_string()]);
        let order = service
            .create_order(
                &actor,
                OrderCreate {
                    customer_id: "customer-1".to_string(),
                    shipping_address: "1 Shipping Lane".to_string(),
                    billing_address: "2 Billing Road".to_string(),
                    notes: None,
                    status: None,
                    items: vec![OrderItemInput {
                        product_id: product.id.clone(),
                        quantity: 3,
                        unit_price: None,
                    }],
                },
            )
            .await
            .unwrap();

        state.pool().close().await;
        order.id
    };

    // Reopen the same file; migrations are idempotent
    let state = ServerState::initialize(&config).await.unwrap();
    let order = OrderRepository::new(state.pool().clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .expect("order persisted across reopen");
    assert_eq!(order.total_amount, "60.00".parse::<Decimal>().unwrap());
    assert_eq!(order.items.len(), 1);

    let product = ProductRepository::new(state.pool().clone())
        .find_by_sku("SKU-DUR")
        .await
        .unwrap()
        .expect("product persisted across reopen");
    assert_eq!(product.stock_quantity, 7);
}
