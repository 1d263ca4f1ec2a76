//! # vinoteca-core: Pure Domain Logic for Vinoteca
//!
//! This crate is the **heart** of Vinoteca, a desktop wine-collection
//! inventory manager. It contains the domain model and all value-level rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vinoteca Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop Shell (out of tree)                  │   │
//! │  │    Inventory table ──► Edit forms ──► Search ──► Export menu   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ field maps / completion signals        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vinoteca-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   price   │  │   form    │  │   stats   │  │   │
//! │  │   │  records  │  │  ceiling  │  │  parsing  │  │  datasets │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        vinoteca-db / vinoteca-tasks / vinoteca-export           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (BottleRecord, BottleLocation, RowOrder)
//! - [`price`] - Price ceiling and the fixed price buckets
//! - [`form`] - Write payloads and search criteria parsed from UI field maps
//! - [`stats`] - Dashboard statistics and the export report dataset
//! - [`error`] - Validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: Prices are `rust_decimal::Decimal`, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod form;
pub mod price;
pub mod stats;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vinoteca_core::BottleRecord` instead of
// `use vinoteca_core::types::BottleRecord`

pub use error::{ValidationError, ValidationResult};
pub use form::{BottleForm, SearchFilter};
pub use price::{clamp_price, price_ceiling, PriceBucket};
pub use stats::{
    ChartSeries, CollectionStats, PriceBucketStat, ProducerStat, RegionStat, ReportDataset,
    VintageStat,
};
pub use types::{BottleLocation, BottleRecord, RowOrder};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Every bottle in the collection is a standard 750 ml unit.
///
/// The store does not track volume; it is a display-only attribute the
/// shell renders next to each record.
pub const BOTTLE_VOLUME_ML: u32 = 750;

/// Display status for every bottle.
///
/// There is no consumption workflow: a bottle exists in storage until it is
/// deleted, so the status never changes.
pub const STATUS_IN_STORAGE: &str = "in_storage";

/// Quantity written for a freshly assigned shelving location.
pub const DEFAULT_LOCATION_QUANTITY: i32 = 1;
