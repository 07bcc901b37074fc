//! Store Server - order and inventory management backend
//!
//! # Architecture overview
//!
//! - **API** (`api`): RESTful routes for products, orders, statistics
//! - **Database** (`db`): SQLite pool, migrations, repositories
//! - **Inventory** (`inventory`): atomic stock reserve/release ledger
//! - **Orders** (`orders`): transactional order lifecycle service
//! - **Pricing** (`pricing`): fixed-point decimal money arithmetic
//! - **Auth** (`auth`): actor extraction and capability checks
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/       # configuration, state, server
//! ├── api/        # HTTP routes and handlers
//! ├── auth/       # actor boundary
//! ├── db/         # pool, migrations, repositories
//! ├── inventory/  # stock ledger
//! ├── orders/     # lifecycle service
//! ├── pricing/    # money arithmetic
//! └── utils/      # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export public types
pub use auth::CurrentActor;
pub use core::{Config, Server, ServerState};
pub use inventory::InventoryLedger;
pub use orders::OrderService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up process environment: dotenv and logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
}
