//! Order Repository
//!
//! Read-side queries (listing, statistics) plus the row-level insert /
//! update helpers the lifecycle service drives inside its transactions.
//! All mutations that touch stock go through the lifecycle service —
//! never call the insert/delete helpers outside of it.

use chrono::{DateTime, Utc};
use shared::models::{Order, OrderItem, OrderStatistics, OrderStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};
use crate::pricing;

fn decode_status(raw: String) -> Result<OrderStatus, sqlx::Error> {
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: Box::new(e),
    })
}

/// Map an orders row into the domain model (items attached separately)
pub(crate) fn order_from_row(row: &SqliteRow) -> Result<Order, sqlx::Error> {
    Ok(Order {
        id: row.try_get("id")?,
        order_number: row.try_get("order_number")?,
        customer_id: row.try_get("customer_id")?,
        total_amount: pricing::from_cents(row.try_get("total_cents")?),
        status: decode_status(row.try_get("status")?)?,
        shipping_address: row.try_get("shipping_address")?,
        billing_address: row.try_get("billing_address")?,
        notes: row.try_get("notes")?,
        assigned_to: row.try_get("assigned_to")?,
        shipped_at: row.try_get("shipped_at")?,
        delivered_at: row.try_get("delivered_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        items: Vec::new(),
    })
}

fn item_from_row(row: &SqliteRow) -> Result<OrderItem, sqlx::Error> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price: pricing::from_cents(row.try_get("unit_price_cents")?),
        line_total: pricing::from_cents(row.try_get("line_total_cents")?),
    })
}

// ── Transaction-scoped helpers ──────────────────────────────────────

/// Fetch an order row (without items) on the caller's connection
pub(crate) async fn fetch_order(
    conn: &mut SqliteConnection,
    id: &str,
) -> RepoResult<Option<Order>> {
    let row = sqlx::query("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.map(|r| order_from_row(&r).map_err(RepoError::from))
        .transpose()
}

/// Fetch the line items of an order on the caller's connection
pub(crate) async fn fetch_items(
    conn: &mut SqliteConnection,
    order_id: &str,
) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query("SELECT * FROM order_items WHERE order_id = ? ORDER BY rowid")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    rows.iter()
        .map(|r| item_from_row(r).map_err(RepoError::from))
        .collect()
}

pub(crate) async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders \
         (id, order_number, customer_id, total_cents, status, shipping_address, billing_address, \
          notes, assigned_to, shipped_at, delivered_at, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(&order.customer_id)
    .bind(pricing::to_cents(order.total_amount)?)
    .bind(order.status.as_str())
    .bind(&order.shipping_address)
    .bind(&order.billing_address)
    .bind(&order.notes)
    .bind(&order.assigned_to)
    .bind(order.shipped_at)
    .bind(order.delivered_at)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_items \
         (id, order_id, product_id, quantity, unit_price_cents, line_total_cents) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(pricing::to_cents(item.unit_price)?)
    .bind(pricing::to_cents(item.line_total)?)
    .execute(conn)
    .await?;
    Ok(())
}

/// Delete an order and its line items on the caller's connection
pub(crate) async fn delete_order_rows(conn: &mut SqliteConnection, id: &str) -> RepoResult<bool> {
    sqlx::query("DELETE FROM order_items WHERE order_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Order Repository (read side)
// =============================================================================

/// Listing filters; all optional, combined with AND
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
    pub assigned_to: Option<String>,
    /// Inclusive created_at lower bound
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive created_at upper bound
    pub created_to: Option<DateTime<Utc>>,
    pub page: i64,
    pub per_page: i64,
}

impl OrderFilter {
    fn limit(&self) -> i64 {
        if self.per_page > 0 { self.per_page } else { 50 }
    }

    fn offset(&self) -> i64 {
        let page = if self.page > 1 { self.page } else { 1 };
        (page - 1) * self.limit()
    }
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find order by id, line items attached
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        let Some(mut order) = fetch_order(&mut conn, id).await? else {
            return Ok(None);
        };
        order.items = fetch_items(&mut conn, id).await?;
        Ok(Some(order))
    }

    /// List orders matching the filter, newest first
    pub async fn find_all(&self, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM orders WHERE 1 = 1");
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.customer_id.is_some() {
            sql.push_str(" AND customer_id = ?");
        }
        if filter.assigned_to.is_some() {
            sql.push_str(" AND assigned_to = ?");
        }
        if filter.created_from.is_some() {
            sql.push_str(" AND created_at >= ?");
        }
        if filter.created_to.is_some() {
            sql.push_str(" AND created_at <= ?");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }
        if let Some(customer) = &filter.customer_id {
            query = query.bind(customer);
        }
        if let Some(assignee) = &filter.assigned_to {
            query = query.bind(assignee);
        }
        if let Some(from) = filter.created_from {
            query = query.bind(from);
        }
        if let Some(to) = filter.created_to {
            query = query.bind(to);
        }
        query = query.bind(filter.limit()).bind(filter.offset());

        let mut conn = self.pool.acquire().await?;
        let rows = query.fetch_all(&mut *conn).await?;
        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut order = order_from_row(row)?;
            order.items = fetch_items(&mut conn, &order.id).await?;
            orders.push(order);
        }
        Ok(orders)
    }

    /// Count orders matching the filter (for pagination headers)
    pub async fn count(&self, filter: &OrderFilter) -> RepoResult<i64> {
        let mut sql = String::from("SELECT COUNT(*) AS cnt FROM orders WHERE 1 = 1");
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.customer_id.is_some() {
            sql.push_str(" AND customer_id = ?");
        }
        if filter.assigned_to.is_some() {
            sql.push_str(" AND assigned_to = ?");
        }
        if filter.created_from.is_some() {
            sql.push_str(" AND created_at >= ?");
        }
        if filter.created_to.is_some() {
            sql.push_str(" AND created_at <= ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }
        if let Some(customer) = &filter.customer_id {
            query = query.bind(customer);
        }
        if let Some(assignee) = &filter.assigned_to {
            query = query.bind(assignee);
        }
        if let Some(from) = filter.created_from {
            query = query.bind(from);
        }
        if let Some(to) = filter.created_to {
            query = query.bind(to);
        }

        let row = query.fetch_one(&self.pool).await?;
        Ok(row.try_get("cnt")?)
    }

    /// Aggregate counts and revenue
    ///
    /// Revenue excludes cancelled orders — that is a business rule, not
    /// a storage artifact.
    pub async fn statistics(&self) -> RepoResult<OrderStatistics> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS cnt, SUM(total_cents) AS revenue_cents \
             FROM orders GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = OrderStatistics {
            total_orders: 0,
            total_revenue: pricing::from_cents(0),
            status_counts: Default::default(),
        };
        for row in &rows {
            let status: String = row.try_get("status")?;
            let count: i64 = row.try_get("cnt")?;
            let revenue_cents: i64 = row.try_get("revenue_cents")?;
            stats.total_orders += count;
            if status != OrderStatus::Cancelled.as_str() {
                stats.total_revenue += pricing::from_cents(revenue_cents);
            }
            stats.status_counts.insert(status, count);
        }
        Ok(stats)
    }

    /// Distinct statuses present in the store
    pub async fn distinct_statuses(&self) -> RepoResult<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT status FROM orders ORDER BY status")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| r.try_get::<String, _>("status").map_err(RepoError::from))
            .collect()
    }
}
