//! Inventory Ledger
//!
//! The sole path for stock mutation. `reserve` is a single conditional
//! decrement (`WHERE stock_quantity >= ?`) so concurrent order creation
//! against the same product serializes on the row instead of racing a
//! read-then-write check.

use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::db::repository::{RepoError, RepoResult};

#[derive(Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// True iff the product exists, is active, and has at least
    /// `quantity` in stock. Side-effect free; a favorable answer can be
    /// stale by the time the caller acts on it, so `reserve` re-checks.
    pub async fn check_availability(&self, product_id: &str, quantity: i64) -> RepoResult<bool> {
        let row = sqlx::query(
            "SELECT stock_quantity FROM products WHERE id = ? AND is_active = 1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row
            .map(|r| r.try_get::<i64, _>("stock_quantity"))
            .transpose()?
            .is_some_and(|stock| stock >= quantity))
    }

    /// Atomically decrement stock by `quantity` iff enough is available.
    ///
    /// Runs on the caller's connection so it participates in the order
    /// creation transaction. `product_name` is only used to label the
    /// insufficient-stock error.
    pub async fn reserve(
        conn: &mut SqliteConnection,
        product_id: &str,
        quantity: i64,
        product_name: &str,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET stock_quantity = stock_quantity - ?, updated_at = ? \
             WHERE id = ? AND is_active = 1 AND stock_quantity >= ?",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Zero rows: either the product vanished or stock ran short
        let exists = sqlx::query("SELECT 1 FROM products WHERE id = ? AND is_active = 1")
            .bind(product_id)
            .fetch_optional(conn)
            .await?
            .is_some();
        if exists {
            Err(RepoError::InsufficientStock(product_name.to_string()))
        } else {
            Err(RepoError::NotFound(format!(
                "Product {product_id} not found"
            )))
        }
    }

    /// Atomically increment stock by `quantity`.
    ///
    /// No upper bound: the caller guarantees the quantity was previously
    /// reserved (delete-order path).
    pub async fn release(
        conn: &mut SqliteConnection,
        product_id: &str,
        quantity: i64,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity + ?, updated_at = ? WHERE id = ?",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(product_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!(
                "Product {product_id} not found"
            )));
        }
        Ok(())
    }

    /// Absolute stock overwrite (administrative correction)
    pub async fn set_stock(&self, product_id: &str, quantity: i64) -> RepoResult<()> {
        if quantity < 0 {
            return Err(RepoError::Validation(
                "stock quantity must be non-negative".into(),
            ));
        }
        let result = sqlx::query(
            "UPDATE products SET stock_quantity = ?, updated_at = ? WHERE id = ?",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!(
                "Product {product_id} not found"
            )));
        }
        Ok(())
    }
}
