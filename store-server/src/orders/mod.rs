//! Order Lifecycle Service
//!
//! The only component allowed to create or delete orders. Every
//! mutation runs as one transaction spanning the inventory ledger and
//! the order aggregate: on any failure nothing persists — no partial
//! stock reservation, no orphan order rows.
//!
//! Reads (listing, statistics) bypass this service and go straight to
//! [`OrderRepository`](crate::db::repository::OrderRepository).

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use shared::Actor;
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repository::{RepoError, RepoResult, order, product};
use crate::inventory::InventoryLedger;
use crate::pricing;

const ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Attempts before giving up on a colliding order number. The token has
/// 48 bits of entropy, so a second collision in a row means something
/// else is wrong.
const ORDER_NUMBER_ATTEMPTS: u32 = 3;

/// Generate a human-readable unique order number
fn generate_order_number() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{ORDER_NUMBER_PREFIX}{}", token[..12].to_uppercase())
}

/// Set the status and stamp shipped/delivered timestamps.
///
/// Stamps are append-only: once set they survive every later
/// transition. This keeps the audit trail intact even when an order is
/// administratively moved backwards.
fn apply_status(order: &mut Order, new_status: OrderStatus, now: DateTime<Utc>) {
    if new_status == OrderStatus::Shipped && order.shipped_at.is_none() {
        order.shipped_at = Some(now);
    }
    if new_status == OrderStatus::Delivered && order.delivered_at.is_none() {
        order.delivered_at = Some(now);
    }
    order.status = new_status;
    order.updated_at = now;
}

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    /// Extension point: release stock when a status change lands on
    /// `cancelled`. Off by default — only explicit deletion releases
    /// stock, matching the historical behavior.
    release_stock_on_cancel: bool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            release_stock_on_cancel: false,
        }
    }

    pub fn with_release_on_cancel(mut self, enabled: bool) -> Self {
        self.release_stock_on_cancel = enabled;
        self
    }

    fn require(actor: &Actor, permission: &str) -> RepoResult<()> {
        if actor.can(permission) {
            Ok(())
        } else {
            Err(RepoError::Forbidden(format!(
                "missing permission: {permission}"
            )))
        }
    }

    /// Create an order with its line items, reserving stock atomically.
    ///
    /// Per requested item, in input order: resolve the product, reserve
    /// stock (conditional decrement), snapshot the unit price, record
    /// the line item. The order total is the sum of line totals. Any
    /// failure rolls the whole transaction back.
    pub async fn create_order(&self, actor: &Actor, data: OrderCreate) -> RepoResult<Order> {
        Self::require(actor, "orders:create")?;

        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "order must contain at least one item".into(),
            ));
        }

        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        let mut line_items: Vec<OrderItem> = Vec::with_capacity(data.items.len());
        for input in &data.items {
            pricing::validate_quantity(input.quantity)?;
            if let Some(price) = input.unit_price {
                pricing::validate_unit_price(price)?;
            }

            let product = product::fetch_product(&mut tx, &input.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| {
                    RepoError::NotFound(format!("Product {} not found", input.product_id))
                })?;

            // Check-and-decrement in one statement; fails with
            // InsufficientStock naming the product.
            InventoryLedger::reserve(&mut tx, &product.id, input.quantity, &product.name).await?;

            let unit_price = pricing::resolve_unit_price(input.unit_price, product.price);
            line_items.push(OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id,
                quantity: input.quantity,
                unit_price,
                line_total: pricing::line_total(input.quantity, unit_price),
            });
        }

        let total = pricing::order_total(line_items.iter().map(|i| &i.line_total));

        let mut new_order = Order {
            id: order_id,
            order_number: generate_order_number(),
            customer_id: data.customer_id,
            total_amount: total,
            status: OrderStatus::Pending,
            shipping_address: data.shipping_address,
            billing_address: data.billing_address,
            notes: data.notes,
            assigned_to: None,
            shipped_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        };
        apply_status(&mut new_order, data.status.unwrap_or_default(), now);

        // Regenerate on an order-number collision instead of failing the
        // whole request.
        let mut attempt = 0;
        loop {
            match order::insert_order(&mut tx, &new_order).await {
                Ok(()) => break,
                Err(RepoError::Duplicate(_)) if attempt + 1 < ORDER_NUMBER_ATTEMPTS => {
                    attempt += 1;
                    new_order.order_number = generate_order_number();
                }
                Err(e) => return Err(e),
            }
        }

        for item in &line_items {
            order::insert_item(&mut tx, item).await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %new_order.id,
            order_number = %new_order.order_number,
            actor = %actor.user_id,
            total = %new_order.total_amount,
            "Order created"
        );

        new_order.items = line_items;
        Ok(new_order)
    }

    /// Delete an order, releasing every line item's reserved quantity
    /// back into inventory. Returns false when the order is absent.
    pub async fn delete_order(&self, actor: &Actor, id: &str) -> RepoResult<bool> {
        Self::require(actor, "orders:delete")?;

        let mut tx = self.pool.begin().await?;
        if order::fetch_order(&mut tx, id).await?.is_none() {
            return Ok(false);
        }

        let items = order::fetch_items(&mut tx, id).await?;
        for item in &items {
            InventoryLedger::release(&mut tx, &item.product_id, item.quantity).await?;
        }
        order::delete_order_rows(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(order_id = %id, actor = %actor.user_id, "Order deleted, stock restored");
        Ok(true)
    }

    /// Transition an order's status, stamping shipped/delivered
    /// timestamps. Returns false when the order is absent.
    ///
    /// Status changes never touch inventory unless the
    /// release-on-cancel extension is enabled.
    pub async fn update_order_status(
        &self,
        actor: &Actor,
        id: &str,
        new_status: OrderStatus,
    ) -> RepoResult<bool> {
        Self::require(actor, "orders:update")?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let Some(mut current) = order::fetch_order(&mut tx, id).await? else {
            return Ok(false);
        };

        let was_cancelled = current.status == OrderStatus::Cancelled;
        apply_status(&mut current, new_status, now);

        sqlx::query(
            "UPDATE orders SET status = ?, shipped_at = ?, delivered_at = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(current.status.as_str())
        .bind(current.shipped_at)
        .bind(current.delivered_at)
        .bind(current.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if self.release_stock_on_cancel && new_status == OrderStatus::Cancelled && !was_cancelled {
            let items = order::fetch_items(&mut tx, id).await?;
            for item in &items {
                InventoryLedger::release(&mut tx, &item.product_id, item.quantity).await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Assign the order to a staff user. Returns false when the order
    /// is absent. Role checks belong to the boundary, not here.
    pub async fn assign_order(&self, actor: &Actor, id: &str, user_id: &str) -> RepoResult<bool> {
        Self::require(actor, "orders:update")?;

        let result = sqlx::query("UPDATE orders SET assigned_to = ?, updated_at = ? WHERE id = ?")
            .bind(user_id)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Patch order fields (addresses, notes, assignment, status).
    /// Totals and line items are never recomputed here.
    pub async fn update_order(
        &self,
        actor: &Actor,
        id: &str,
        patch: OrderUpdate,
    ) -> RepoResult<bool> {
        Self::require(actor, "orders:update")?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let Some(mut current) = order::fetch_order(&mut tx, id).await? else {
            return Ok(false);
        };

        if let Some(v) = patch.shipping_address {
            current.shipping_address = v;
        }
        if let Some(v) = patch.billing_address {
            current.billing_address = v;
        }
        if let Some(v) = patch.notes {
            current.notes = Some(v);
        }
        if let Some(v) = patch.assigned_to {
            current.assigned_to = Some(v);
        }
        if let Some(status) = patch.status {
            apply_status(&mut current, status, now);
        }
        current.updated_at = now;

        sqlx::query(
            "UPDATE orders SET shipping_address = ?, billing_address = ?, notes = ?, \
             assigned_to = ?, status = ?, shipped_at = ?, delivered_at = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&current.shipping_address)
        .bind(&current.billing_address)
        .bind(&current.notes)
        .bind(&current.assigned_to)
        .bind(current.status.as_str())
        .bind(current.shipped_at)
        .bind(current.delivered_at)
        .bind(current.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
