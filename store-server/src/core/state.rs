//! Server state

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::utils::AppError;

/// Server state — configuration plus the shared connection pool.
///
/// Repositories and services are cheap handles over the pool;
/// handlers construct them per request.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
}

impl ServerState {
    /// Open the database and run migrations
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: config.clone(),
            db,
        })
    }

    /// In-memory state for tests
    pub async fn in_memory(config: Config) -> Result<Self, AppError> {
        let db = DbService::in_memory().await?;
        Ok(Self { config, db })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// Lifecycle service wired with the configured extension points
    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.db.pool.clone())
            .with_release_on_cancel(self.config.release_stock_on_cancel)
    }
}
