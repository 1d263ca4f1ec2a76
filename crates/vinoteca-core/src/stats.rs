//! # Statistics & Report Datasets
//!
//! Aggregate snapshots consumed by the dashboard and the report renderers.
//!
//! ## Two Different Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CollectionStats ── dashboard cards + on-screen charts                 │
//! │       totals, per-region counts, per-vintage counts,                   │
//! │       two chart-ready series                                           │
//! │                                                                         │
//! │  ReportDataset ──── one export job's consistent snapshot               │
//! │       every joined row + four aggregate tables                         │
//! │       (regions, vintages, price buckets, producers)                    │
//! │                                                                         │
//! │  Scalar indicators (count, total, average, max, min, spread) are       │
//! │  derived from the dataset's rows at render time, so the indicator      │
//! │  block can never disagree with the row dump it sits next to.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price::PriceBucket;
use crate::types::BottleRecord;

// =============================================================================
// Chart Series
// =============================================================================

/// Category/value pairs ready for an on-screen chart widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Builds a series from (label, value) pairs, preserving their order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut series = ChartSeries::default();
        for (label, value) in pairs {
            series.labels.push(label);
            series.values.push(value);
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// =============================================================================
// Collection Statistics (dashboard)
// =============================================================================

/// Aggregate snapshot backing the dashboard cards and charts.
///
/// `Default` is the legitimate "empty collection" snapshot: zero counts,
/// zero value, empty maps and series. No field is ever absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Total bottles in the store.
    pub total_bottles: i64,

    /// Bottles currently shelved. Equal to `total_bottles`; kept as its own
    /// field because the dashboard renders it as a separate card.
    pub in_storage: i64,

    /// Always zero; there is no consumption workflow.
    pub consumed: i64,

    /// Sum of all purchase prices (zero when the store is empty).
    pub total_value: Decimal,

    /// Bottle count per region, excluding rows with an empty region.
    pub regions: BTreeMap<String, i64>,

    /// Bottle count per vintage year, ascending, excluding unset vintages.
    pub vintages: BTreeMap<i32, i64>,

    /// Pie-chart projection of `regions`.
    pub region_share: ChartSeries,

    /// Line-chart projection of `vintages`.
    pub vintage_trend: ChartSeries,
}

impl CollectionStats {
    /// Assembles the snapshot and derives both chart projections.
    pub fn from_aggregates(
        total_bottles: i64,
        total_value: Decimal,
        regions: BTreeMap<String, i64>,
        vintages: BTreeMap<i32, i64>,
    ) -> Self {
        let region_share = ChartSeries::from_pairs(
            regions.iter().map(|(name, count)| (name.clone(), *count as f64)),
        );
        let vintage_trend = ChartSeries::from_pairs(
            vintages.iter().map(|(year, count)| (year.to_string(), *count as f64)),
        );
        CollectionStats {
            total_bottles,
            in_storage: total_bottles,
            consumed: 0,
            total_value,
            regions,
            vintages,
            region_share,
            vintage_trend,
        }
    }
}

// =============================================================================
// Aggregate Table Rows (export)
// =============================================================================

/// Per-region aggregate: bottle count, average and total purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RegionStat {
    pub region: String,
    pub bottles: i64,
    pub avg_price: Decimal,
    pub total_value: Decimal,
}

/// Per-vintage aggregate: bottle count and average purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VintageStat {
    pub vintage: i32,
    pub bottles: i64,
    pub avg_price: Decimal,
}

/// Per-price-bucket aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBucketStat {
    pub bucket: PriceBucket,
    pub bottles: i64,
    pub total_value: Decimal,
}

/// Per-producer aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProducerStat {
    pub producer: String,
    pub bottles: i64,
    pub avg_price: Decimal,
    pub total_value: Decimal,
}

// =============================================================================
// Report Dataset (export)
// =============================================================================

/// Everything one export job needs, captured as a single snapshot.
///
/// The gateway fills all five collections inside one read transaction, so
/// the row dump and the aggregate tables always describe the same state of
/// the store, even while other workers keep writing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDataset {
    /// Every joined row, in the ordering the export requested.
    pub rows: Vec<BottleRecord>,

    /// Region aggregates, most-populated region first.
    pub regions: Vec<RegionStat>,

    /// Vintage aggregates, newest vintage first.
    pub vintages: Vec<VintageStat>,

    /// Price-bucket aggregates, highest total value first.
    pub price_buckets: Vec<PriceBucketStat>,

    /// Producer aggregates, most-represented producer first.
    pub producers: Vec<ProducerStat>,
}

impl ReportDataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_bottles(&self) -> usize {
        self.rows.len()
    }

    /// Sum of every row's purchase price.
    pub fn total_value(&self) -> Decimal {
        self.rows.iter().map(|r| r.price).sum()
    }

    /// Average purchase price; zero for an empty dataset.
    pub fn average_price(&self) -> Decimal {
        if self.rows.is_empty() {
            return Decimal::ZERO;
        }
        self.total_value() / Decimal::from(self.rows.len() as i64)
    }

    pub fn max_price(&self) -> Decimal {
        self.rows.iter().map(|r| r.price).max().unwrap_or(Decimal::ZERO)
    }

    pub fn min_price(&self) -> Decimal {
        self.rows.iter().map(|r| r.price).min().unwrap_or(Decimal::ZERO)
    }

    /// Difference between the most and the least expensive bottle.
    pub fn price_spread(&self) -> Decimal {
        self.max_price() - self.min_price()
    }

    /// Number of distinct non-empty producers among the rows.
    pub fn distinct_producers(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| !r.producer.is_empty())
            .map(|r| r.producer.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of distinct non-empty regions among the rows.
    pub fn distinct_regions(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| !r.region.is_empty())
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// The `n` most expensive bottles, descending by price.
    ///
    /// The sort is stable: equally priced bottles keep their fetch order.
    pub fn top_by_price(&self, n: usize) -> Vec<&BottleRecord> {
        let mut ranked: Vec<&BottleRecord> = self.rows.iter().collect();
        ranked.sort_by(|a, b| b.price.cmp(&a.price));
        ranked.truncate(n);
        ranked
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, producer: &str, region: &str, price: &str) -> BottleRecord {
        BottleRecord {
            id,
            name: format!("wine-{id}"),
            producer: producer.to_string(),
            vintage: Some(2018),
            region: region.to_string(),
            price: price.parse().expect("decimal literal"),
            purchased_on: None,
            shelf: String::new(),
            rack: String::new(),
            cellar: String::new(),
        }
    }

    #[test]
    fn empty_snapshot_has_no_absent_fields() {
        let stats = CollectionStats::default();
        assert_eq!(stats.total_bottles, 0);
        assert_eq!(stats.in_storage, 0);
        assert_eq!(stats.consumed, 0);
        assert_eq!(stats.total_value, Decimal::ZERO);
        assert!(stats.regions.is_empty());
        assert!(stats.vintages.is_empty());
        assert!(stats.region_share.is_empty());
        assert!(stats.vintage_trend.is_empty());

        // The dashboard consumes this as JSON; nothing may be null.
        let json = serde_json::to_value(&stats).expect("json");
        assert_eq!(json["total_bottles"], 0);
        assert!(json["regions"].is_object());
        assert!(json["region_share"]["labels"].is_array());
    }

    #[test]
    fn chart_projections_follow_the_maps() {
        let mut regions = BTreeMap::new();
        regions.insert("Tuscany".to_string(), 2i64);
        regions.insert("Rioja".to_string(), 1i64);
        let mut vintages = BTreeMap::new();
        vintages.insert(2015, 1i64);
        vintages.insert(2018, 2i64);

        let stats = CollectionStats::from_aggregates(
            3,
            Decimal::new(2_500_00, 2),
            regions,
            vintages,
        );

        assert_eq!(stats.in_storage, 3);
        assert_eq!(stats.region_share.labels, vec!["Rioja", "Tuscany"]);
        assert_eq!(stats.region_share.values, vec![1.0, 2.0]);
        // Vintage axis is ascending by year.
        assert_eq!(stats.vintage_trend.labels, vec!["2015", "2018"]);
        assert_eq!(stats.vintages[&2018], 2);
    }

    #[test]
    fn scalar_indicators_on_an_empty_dataset() {
        let data = ReportDataset::default();
        assert!(data.is_empty());
        assert_eq!(data.total_value(), Decimal::ZERO);
        assert_eq!(data.average_price(), Decimal::ZERO);
        assert_eq!(data.price_spread(), Decimal::ZERO);
        assert!(data.top_by_price(5).is_empty());
    }

    #[test]
    fn scalar_indicators_follow_the_rows() {
        let data = ReportDataset {
            rows: vec![
                row(1, "Antinori", "Tuscany", "500.00"),
                row(2, "Antinori", "Tuscany", "2000.00"),
                row(3, "", "Rioja", "500.00"),
            ],
            ..ReportDataset::default()
        };

        assert_eq!(data.total_bottles(), 3);
        assert_eq!(data.total_value(), Decimal::new(3_000_00, 2));
        assert_eq!(data.average_price(), Decimal::new(1_000, 0));
        assert_eq!(data.max_price(), Decimal::new(2_000_00, 2));
        assert_eq!(data.min_price(), Decimal::new(500_00, 2));
        assert_eq!(data.price_spread(), Decimal::new(1_500_00, 2));
        assert_eq!(data.distinct_producers(), 1);
        assert_eq!(data.distinct_regions(), 2);
    }

    #[test]
    fn top_by_price_is_stable_on_ties() {
        let data = ReportDataset {
            rows: vec![
                row(10, "A", "X", "100.00"),
                row(11, "B", "X", "300.00"),
                row(12, "C", "X", "100.00"),
                row(13, "D", "X", "300.00"),
            ],
            ..ReportDataset::default()
        };

        let top: Vec<u64> = data.top_by_price(3).iter().map(|r| r.id).collect();
        // Equal prices keep fetch order: 11 before 13, 10 before 12.
        assert_eq!(top, vec![11, 13, 10]);
    }
}
