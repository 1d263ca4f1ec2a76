//! # Database Pool Management
//!
//! Connection pool creation and configuration for the MySQL store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Application Startup                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() ← DB_HOST / DB_USER / DB_NAME / ...              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  config.validate() ← Refuse to start without host/user/database        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::connect(config).await ← Create pool + run migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            MySqlPool                     │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Concurrent access from dispatched workers                      │
//! │       ▼                                                                 │
//! │  Worker 1 ──► uses Conn1                                               │
//! │  Worker 2 ──► uses Conn2                                               │
//! │  (Workers never share a connection; the pool hands each call its own)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::env;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::bottle::BottleRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::from_env()
///     .max_connections(5)
///     .min_connections(1);
/// config.validate()?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// MySQL server host. Required.
    pub host: String,

    /// MySQL server port. Default: 3306.
    pub port: u16,

    /// Account name. Required.
    pub user: String,

    /// Account password. May be empty for local development setups.
    pub password: String,

    /// Database (schema) name. Required.
    pub database: String,

    /// Connection character set. Default: utf8mb4, which also gives the
    /// case-insensitive collation the substring search relies on.
    pub charset: String,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-user desktop app)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long an operation may wait for a free connection.
    /// Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "vinoteca".to_string(),
            password: String::new(),
            database: "vinoteca".to_string(),
            charset: "utf8mb4".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }
}

impl DbConfig {
    /// Loads configuration from environment variables with defaults.
    ///
    /// ## Recognized Variables
    /// `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`,
    /// `DB_CHARSET`. Unset variables fall back to [`DbConfig::default`];
    /// an unparsable `DB_PORT` falls back to 3306.
    pub fn from_env() -> Self {
        let mut config = DbConfig::default();

        if let Ok(host) = env::var("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = env::var("DB_PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Ok(user) = env::var("DB_USER") {
            config.user = user;
        }
        if let Ok(password) = env::var("DB_PASSWORD") {
            config.password = password;
        }
        if let Ok(database) = env::var("DB_NAME") {
            config.database = database;
        }
        if let Ok(charset) = env::var("DB_CHARSET") {
            config.charset = charset;
        }

        config
    }

    /// Checks the fields without which a connection attempt is pointless.
    ///
    /// ## Startup Gate
    /// The shell calls this before creating any window; a failure here is a
    /// configuration problem, not a connectivity problem.
    pub fn validate(&self) -> DbResult<()> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host");
        }
        if self.user.trim().is_empty() {
            missing.push("user");
        }
        if self.database.trim().is_empty() {
            missing.push("database");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DbError::InvalidConfig(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .charset(&self.charset);
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        options
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let config = DbConfig::from_env();
/// config.validate()?;
/// let db = Database::connect(config).await?;
///
/// let rows = db.bottles().fetch_all(RowOrder::NewestFirst).await?;
/// ```
///
/// Cloning is cheap: the handle wraps the shared pool, and every operation
/// checks a connection out for just its own duration.
#[derive(Debug, Clone)]
pub struct Database {
    /// The MySQL connection pool.
    pool: MySqlPool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Validates the configuration (host/user/database must be present)
    /// 2. Creates the bounded connection pool
    /// 3. Runs migrations (if enabled) to create the schema on first run
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Invalid config, connection or migration failure
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        config.validate()?;

        info!(
            host = %config.host,
            database = %config.database,
            "Initializing database connection"
        );

        let connect_options = config.connect_options();
        debug!("Connection options configured");

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// ## When To Call
    /// - Automatically called by `connect()` if `run_migrations` is true
    /// - Manually call when migrations are disabled in config
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by the repository.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Returns the bottle repository.
    pub fn bottles(&self) -> BottleRepository {
        BottleRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// ## When To Call
    /// - On application shutdown
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = DbConfig::default().max_connections(10).min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.port, 3306);
        assert_eq!(config.charset, "utf8mb4");
    }

    #[test]
    fn validation_names_every_missing_field() {
        let config = DbConfig {
            host: String::new(),
            user: "  ".to_string(),
            ..DbConfig::default()
        };

        let err = config.validate().expect_err("invalid config");
        let message = err.to_string();
        assert!(message.contains("host"));
        assert!(message.contains("user"));
        assert!(!message.contains("database"));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DbConfig::default().validate().is_ok());
    }
}
