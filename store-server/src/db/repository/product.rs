//! Product Repository

use chrono::Utc;
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{RepoError, RepoResult};
use crate::pricing;

/// Map a products row into the domain model
pub(crate) fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: pricing::from_cents(row.try_get("price_cents")?),
        category: row.try_get("category")?,
        stock_quantity: row.try_get("stock_quantity")?,
        sku: row.try_get("sku")?,
        is_active: row.try_get("is_active")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Fetch a product inside a caller's transaction
pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    id: &str,
) -> RepoResult<Option<Product>> {
    let row = sqlx::query("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.map(|r| product_from_row(&r).map_err(RepoError::from))
        .transpose()
}

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find all products; active only unless asked otherwise
    pub async fn find_all(&self, include_inactive: bool) -> RepoResult<Vec<Product>> {
        let sql = if include_inactive {
            "SELECT * FROM products ORDER BY name"
        } else {
            "SELECT * FROM products WHERE is_active = 1 ORDER BY name"
        };
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| product_from_row(r).map_err(RepoError::from))
            .collect()
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Find product by SKU
    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE sku = ?")
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| product_from_row(&r).map_err(RepoError::from))
            .transpose()
    }

    /// Create a new product
    pub async fn create(
        &self,
        data: ProductCreate,
        created_by: Option<&str>,
    ) -> RepoResult<Product> {
        pricing::validate_unit_price(data.price)?;
        let stock = data.stock_quantity.unwrap_or(0);
        if stock < 0 {
            return Err(RepoError::Validation(
                "stock_quantity must be non-negative".into(),
            ));
        }

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: pricing::round_money(data.price),
            category: data.category.unwrap_or_default(),
            stock_quantity: stock,
            sku: data.sku,
            is_active: true,
            created_by: created_by.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // Duplicate SKU surfaces as RepoError::Duplicate via the unique index
        sqlx::query(
            "INSERT INTO products \
             (id, name, description, price_cents, category, stock_quantity, sku, is_active, created_by, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(pricing::to_cents(product.price)?)
        .bind(&product.category)
        .bind(product.stock_quantity)
        .bind(&product.sku)
        .bind(product.is_active)
        .bind(&product.created_by)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product (stock excluded — that is the ledger's job)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        if let Some(price) = data.price {
            pricing::validate_unit_price(price)?;
        }

        // Build dynamic SET clauses, binding in the same order
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = ?");
        }
        if data.description.is_some() {
            set_parts.push("description = ?");
        }
        if data.price.is_some() {
            set_parts.push("price_cents = ?");
        }
        if data.category.is_some() {
            set_parts.push("category = ?");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = ?");
        }

        if set_parts.is_empty() {
            // No fields to update
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")));
        }
        set_parts.push("updated_at = ?");

        let sql = format!("UPDATE products SET {} WHERE id = ?", set_parts.join(", "));

        let mut query = sqlx::query(&sql);
        if let Some(v) = data.name {
            query = query.bind(v);
        }
        if let Some(v) = data.description {
            query = query.bind(v);
        }
        if let Some(v) = data.price {
            query = query.bind(pricing::to_cents(v)?);
        }
        if let Some(v) = data.category {
            query = query.bind(v);
        }
        if let Some(v) = data.is_active {
            query = query.bind(v);
        }
        let result = query.bind(Utc::now()).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Product {id} not found")));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Soft delete a product (orders keep their historical line items)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
