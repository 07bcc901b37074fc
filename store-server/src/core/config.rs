//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DATABASE_PATH | store.db | SQLite database file |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | REQUEST_TIMEOUT_MS | 30000 | Request timeout (ms) |
//! | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown timeout (ms) |
//! | RELEASE_STOCK_ON_CANCEL | false | Release stock when status hits cancelled |
//! | LOG_DIR | (none) | Rolling log file directory |

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Shutdown timeout (milliseconds)
    pub shutdown_timeout_ms: u64,
    /// Extension point: couple the cancelled status to stock release.
    /// Historically only explicit deletion releases stock.
    pub release_stock_on_cancel: bool,
    /// Optional log directory for rolling file output
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "store.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            release_stock_on_cancel: std::env::var("RELEASE_STOCK_ON_CANCEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override the essentials — used by tests
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
