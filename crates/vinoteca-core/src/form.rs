//! # Form Parsing
//!
//! Write payloads and search criteria, parsed from the field-name-keyed
//! maps the desktop shell submits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell dialog (out of tree)                                   │
//! │  ├── Required-field checks, numeric spinners                           │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Typed parsing of the submitted field map                          │
//! │  └── Empty-string normalization (date, vintage, price)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Gateway                                                      │
//! │  └── Price ceiling clamp (defense in depth)                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recognized Keys
//! Entry forms: `name`, `producer`, `vintage_year`, `region`, `price`,
//! `purchase_date`, `shelf`, `rack`, `cellar`.
//! Search forms: `region`, `min_year`, `max_year`. Unknown keys are ignored.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Bottle Form
// =============================================================================

/// The write payload for insert and update operations.
///
/// All fields are already typed; the string-level quirks of the entry form
/// (empty date, empty price) are resolved in [`BottleForm::from_fields`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BottleForm {
    pub name: String,
    pub producer: String,
    pub vintage: Option<i32>,
    pub region: String,
    pub price: Decimal,
    pub purchased_on: Option<NaiveDate>,
    pub shelf: String,
    pub rack: String,
    pub cellar: String,
}

impl BottleForm {
    /// Parses the field-name-keyed map an entry dialog submits.
    ///
    /// ## Normalization Rules
    /// - missing/empty `purchase_date` → no date
    /// - missing/empty `price` → zero
    /// - missing/empty `vintage_year` → unset vintage
    /// - `name` is required; everything else may be empty
    pub fn from_fields(fields: &HashMap<String, String>) -> ValidationResult<Self> {
        let text = |key: &str| -> String {
            fields
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let name = text("name");
        if name.is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }

        Ok(BottleForm {
            name,
            producer: text("producer"),
            vintage: parse_optional_year("vintage_year", &text("vintage_year"))?,
            region: text("region"),
            price: parse_price(&text("price"))?,
            purchased_on: parse_optional_date("purchase_date", &text("purchase_date"))?,
            shelf: text("shelf"),
            rack: text("rack"),
            cellar: text("cellar"),
        })
    }

    /// True when at least one of shelf/rack/cellar is non-empty.
    ///
    /// Controls whether the gateway writes a location row at all.
    pub fn has_location(&self) -> bool {
        !self.shelf.is_empty() || !self.rack.is_empty() || !self.cellar.is_empty()
    }
}

// =============================================================================
// Search Filter
// =============================================================================

/// Narrowing criteria for the search operation.
///
/// An exact region match plus an inclusive vintage-year range. An empty
/// filter combined with an empty search term is equivalent to a full fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub region: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl SearchFilter {
    /// Parses the recognized keys (`region`, `min_year`, `max_year`) from a
    /// search form's field map; any other keys are ignored.
    pub fn from_fields(fields: &HashMap<String, String>) -> ValidationResult<Self> {
        let text = |key: &str| -> String {
            fields
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let region = text("region");
        Ok(SearchFilter {
            region: (!region.is_empty()).then_some(region),
            min_year: parse_optional_year("min_year", &text("min_year"))?,
            max_year: parse_optional_year("max_year", &text("max_year"))?,
        })
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.min_year.is_none() && self.max_year.is_none()
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

fn parse_optional_year(field: &'static str, raw: &str) -> ValidationResult<Option<i32>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn parse_price(raw: &str) -> ValidationResult<Decimal> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "price",
            value: raw.to_string(),
        })
}

fn parse_optional_date(field: &'static str, raw: &str) -> ValidationResult<Option<NaiveDate>> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_a_complete_entry_form() {
        let form = BottleForm::from_fields(&fields(&[
            ("name", "Chianti"),
            ("producer", "Antinori"),
            ("vintage_year", "2018"),
            ("region", "Tuscany"),
            ("price", "1500.00"),
            ("purchase_date", "2024-03-15"),
            ("shelf", "A1"),
        ]))
        .expect("valid form");

        assert_eq!(form.name, "Chianti");
        assert_eq!(form.vintage, Some(2018));
        assert_eq!(form.price, Decimal::new(1_500_00, 2));
        assert_eq!(
            form.purchased_on,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert!(form.has_location());
    }

    #[test]
    fn empty_date_means_no_date() {
        let form = BottleForm::from_fields(&fields(&[
            ("name", "Rioja"),
            ("purchase_date", ""),
        ]))
        .expect("valid form");
        assert_eq!(form.purchased_on, None);
    }

    #[test]
    fn empty_price_and_vintage_default() {
        let form = BottleForm::from_fields(&fields(&[("name", "Rioja")])).expect("valid form");
        assert_eq!(form.price, Decimal::ZERO);
        assert_eq!(form.vintage, None);
        assert!(!form.has_location());
    }

    #[test]
    fn name_is_required() {
        let err = BottleForm::from_fields(&fields(&[("producer", "Antinori")]))
            .expect_err("missing name");
        assert_eq!(err, ValidationError::Required { field: "name" });
    }

    #[test]
    fn bad_numbers_and_dates_are_reported() {
        let err = BottleForm::from_fields(&fields(&[("name", "x"), ("price", "abc")]))
            .expect_err("bad price");
        assert!(matches!(err, ValidationError::InvalidNumber { field: "price", .. }));

        let err = BottleForm::from_fields(&fields(&[("name", "x"), ("purchase_date", "15.03.2024")]))
            .expect_err("bad date");
        assert!(matches!(err, ValidationError::InvalidDate { field: "purchase_date", .. }));
    }

    #[test]
    fn any_single_location_label_counts() {
        for key in ["shelf", "rack", "cellar"] {
            let form = BottleForm::from_fields(&fields(&[("name", "x"), (key, "B2")]))
                .expect("valid form");
            assert!(form.has_location(), "{key} alone should count");
        }
    }

    #[test]
    fn search_filter_recognizes_only_known_keys() {
        let filter = SearchFilter::from_fields(&fields(&[
            ("region", "Tuscany"),
            ("min_year", "2010"),
            ("max_year", "2020"),
            ("something_else", "ignored"),
        ]))
        .expect("valid filter");

        assert_eq!(filter.region.as_deref(), Some("Tuscany"));
        assert_eq!(filter.min_year, Some(2010));
        assert_eq!(filter.max_year, Some(2020));
        assert!(!filter.is_empty());

        let empty = SearchFilter::from_fields(&HashMap::new()).expect("empty filter");
        assert!(empty.is_empty());
    }
}
