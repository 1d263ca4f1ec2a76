//! # Record Types
//!
//! Core record types shared by the gateway and the report renderers.
//!
//! ## Shape of a Fetch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One BottleRecord per row                            │
//! │                                                                         │
//! │  bottles                       bottle_locations (LEFT JOIN)            │
//! │  ┌──────────────────────┐      ┌──────────────────────┐                │
//! │  │ id name producer ... │ ───► │ shelf rack cellar    │  (may be NULL) │
//! │  └──────────────────────┘      └──────────────────────┘                │
//! │             │                              │                            │
//! │             └──────────────┬───────────────┘                            │
//! │                            ▼                                            │
//! │  BottleRecord { id, name, ..., shelf: "", rack: "", cellar: "" }       │
//! │                                                                         │
//! │  Missing location rows surface as empty strings, never as NULLs,       │
//! │  so the shell and the renderers never branch on Option for them.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every fetch produces fresh owned values; records are plain data with no
//! shared mutable state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BOTTLE_VOLUME_ML, DEFAULT_LOCATION_QUANTITY, STATUS_IN_STORAGE};

// =============================================================================
// Row Ordering
// =============================================================================

/// Ordering applied to row fetches.
///
/// The ordering is context-specific and always caller-supplied: the
/// inventory table browses newest-first, while the spreadsheet export lists
/// by vintage and then price. Making it a parameter keeps the SQL out of the
/// call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Most recently added bottles first (identifier descending).
    NewestFirst,
    /// Vintage year descending, then purchase price descending.
    VintageThenPrice,
}

impl Default for RowOrder {
    fn default() -> Self {
        RowOrder::NewestFirst
    }
}

// =============================================================================
// Bottle Record
// =============================================================================

/// One bottle joined with its optional shelving assignment.
///
/// This is the unit the gateway returns from every read operation and the
/// renderers consume. The identifier is store-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BottleRecord {
    /// Store-assigned identifier (auto-increment, unique, immutable).
    pub id: u64,

    /// Wine name as entered by the user.
    pub name: String,

    /// Producer / winery.
    pub producer: String,

    /// Vintage year; `None` when the user left it unset.
    pub vintage: Option<i32>,

    /// Growing region (free text).
    pub region: String,

    /// Purchase price, capped at the documented ceiling on write.
    pub price: Decimal,

    /// Purchase date; `None` when unknown.
    pub purchased_on: Option<NaiveDate>,

    /// Shelf label; empty string when the bottle has no location row.
    pub shelf: String,

    /// Rack label; empty string when the bottle has no location row.
    pub rack: String,

    /// Cellar label; empty string when the bottle has no location row.
    pub cellar: String,
}

impl BottleRecord {
    /// Display status. Always "in_storage"; there is no consumption flow.
    #[inline]
    pub fn status(&self) -> &'static str {
        STATUS_IN_STORAGE
    }

    /// Serial number shown on labels: the decimal form of the identifier.
    #[inline]
    pub fn serial_number(&self) -> String {
        self.id.to_string()
    }

    /// Bottle volume in milliliters (constant for the whole collection).
    #[inline]
    pub fn volume_ml(&self) -> u32 {
        BOTTLE_VOLUME_ML
    }

    /// True when any of the three location labels is set.
    pub fn has_location(&self) -> bool {
        !self.shelf.is_empty() || !self.rack.is_empty() || !self.cellar.is_empty()
    }

    /// The shelving assignment, if any of its labels is set.
    pub fn location(&self) -> Option<BottleLocation> {
        if !self.has_location() {
            return None;
        }
        Some(BottleLocation {
            bottle_id: self.id,
            shelf: self.shelf.clone(),
            rack: self.rack.clone(),
            cellar: self.cellar.clone(),
            quantity: DEFAULT_LOCATION_QUANTITY,
        })
    }
}

// =============================================================================
// Bottle Location
// =============================================================================

/// A shelving assignment for one bottle.
///
/// Zero-or-one per bottle. The gateway replaces the whole row on update;
/// there is no partial-location edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleLocation {
    pub bottle_id: u64,
    pub shelf: String,
    pub rack: String,
    pub cellar: String,
    pub quantity: i32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(shelf: &str, rack: &str, cellar: &str) -> BottleRecord {
        BottleRecord {
            id: 7,
            name: "Chianti".to_string(),
            producer: "Antinori".to_string(),
            vintage: Some(2018),
            region: "Tuscany".to_string(),
            price: Decimal::new(150_000, 2),
            purchased_on: None,
            shelf: shelf.to_string(),
            rack: rack.to_string(),
            cellar: cellar.to_string(),
        }
    }

    #[test]
    fn derived_display_fields() {
        let r = record("", "", "");
        assert_eq!(r.status(), "in_storage");
        assert_eq!(r.serial_number(), "7");
        assert_eq!(r.volume_ml(), 750);
    }

    #[test]
    fn location_requires_at_least_one_label() {
        assert!(record("", "", "").location().is_none());

        let loc = record("A1", "", "").location().expect("location");
        assert_eq!(loc.shelf, "A1");
        assert_eq!(loc.rack, "");
        assert_eq!(loc.quantity, 1);
    }

    #[test]
    fn default_order_is_newest_first() {
        assert_eq!(RowOrder::default(), RowOrder::NewestFirst);
    }

    #[test]
    fn record_serializes_for_the_shell() {
        let json = serde_json::to_value(record("A1", "", "")).expect("json");
        assert_eq!(json["id"], 7);
        assert_eq!(json["shelf"], "A1");
        assert_eq!(json["vintage"], 2018);
    }
}
