//! # vinoteca-db: Database Layer for Vinoteca
//!
//! This crate provides database access for the Vinoteca wine-collection
//! manager. It talks to a MySQL store through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vinoteca Data Flow                               │
//! │                                                                         │
//! │  UI action (insert / search / export)                                  │
//! │       │  dispatched via vinoteca-tasks                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vinoteca-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (bottle.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ MySqlPool     │◄───│ BottleRepo    │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MySQL server (host/user/database from DB_* environment variables)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The bottle repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vinoteca_db::{Database, DbConfig};
//!
//! let config = DbConfig::from_env();
//! config.validate()?;
//! let db = Database::connect(config).await?;
//!
//! let rows = db.bottles().fetch_all(RowOrder::NewestFirst).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-export for convenience
pub use repository::bottle::BottleRepository;
