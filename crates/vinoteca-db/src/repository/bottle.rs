//! # Bottle Repository
//!
//! Database operations for bottles and their shelving assignments.
//!
//! ## Write Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bottle Write Lifecycle                            │
//! │                                                                         │
//! │  INSERT                                                                 │
//! │   └── one transaction: bottle row → new id → location row              │
//! │       (location only when shelf/rack/cellar has a value)               │
//! │                                                                         │
//! │  UPDATE                                                                 │
//! │   └── one transaction: bottle row → DELETE old location →              │
//! │       re-INSERT location if still assigned                             │
//! │       (full replace; there is no partial-location edit)                │
//! │                                                                         │
//! │  DELETE                                                                 │
//! │   └── one transaction: location row first, then the bottle row         │
//! │       (statement order stands in for ON DELETE CASCADE)                │
//! │                                                                         │
//! │  Prices are clamped to the DECIMAL(8, 2) ceiling on every write,       │
//! │  even though the entry form validates them too.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every caller-supplied value is a bound parameter. The only strings that
//! reach the SQL text are the fixed column/table identifiers and the ORDER
//! BY clause selected from [`RowOrder`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::debug;

use vinoteca_core::{
    clamp_price, BottleForm, BottleRecord, CollectionStats, PriceBucket, PriceBucketStat,
    ProducerStat, RegionStat, ReportDataset, RowOrder, SearchFilter, VintageStat,
    DEFAULT_LOCATION_QUANTITY,
};

use crate::error::{DbError, DbResult};

// =============================================================================
// SQL Text
// =============================================================================

/// The joined projection every read operation shares.
const SELECT_ROWS: &str = "SELECT b.id AS id, b.name AS name, b.producer AS producer, \
b.vintage AS vintage, b.region AS region, b.price AS price, b.purchased_on AS purchased_on, \
COALESCE(l.shelf, '') AS shelf, COALESCE(l.rack, '') AS rack, COALESCE(l.cellar, '') AS cellar \
FROM bottles b LEFT JOIN bottle_locations l ON b.id = l.bottle_id \
WHERE 1=1";

const REGION_STATS_SQL: &str = "SELECT region, COUNT(*) AS bottles, \
AVG(price) AS avg_price, SUM(price) AS total_value \
FROM bottles WHERE region != '' \
GROUP BY region ORDER BY bottles DESC";

const VINTAGE_STATS_SQL: &str = "SELECT vintage, COUNT(*) AS bottles, \
AVG(price) AS avg_price \
FROM bottles WHERE vintage IS NOT NULL \
GROUP BY vintage ORDER BY vintage DESC";

/// Bucket indices match [`PriceBucket::index`]; the thresholds are the four
/// fixed reporting ranges (<1000, 1000-5000, 5000-10000, >10000).
const PRICE_BUCKET_STATS_SQL: &str = "SELECT CASE \
WHEN price < 1000 THEN 0 \
WHEN price <= 5000 THEN 1 \
WHEN price <= 10000 THEN 2 \
ELSE 3 END AS bucket, \
COUNT(*) AS bottles, SUM(price) AS total_value \
FROM bottles GROUP BY bucket ORDER BY total_value DESC";

const PRODUCER_STATS_SQL: &str = "SELECT producer, COUNT(*) AS bottles, \
AVG(price) AS avg_price, SUM(price) AS total_value \
FROM bottles WHERE producer != '' \
GROUP BY producer HAVING COUNT(*) > 0 \
ORDER BY bottles DESC, avg_price DESC";

/// Maps the caller-chosen ordering onto its ORDER BY clause.
fn order_clause(order: RowOrder) -> &'static str {
    match order {
        RowOrder::NewestFirst => " ORDER BY b.id DESC",
        RowOrder::VintageThenPrice => " ORDER BY b.vintage DESC, b.price DESC",
    }
}

/// Builds the SELECT for a search. With an empty term and an empty filter
/// this is byte-for-byte the full-fetch statement, which is what makes
/// `search("", ...)` and `fetch_all(...)` provably equivalent.
fn select_statement(term: &str, filter: &SearchFilter, order: RowOrder) -> String {
    let mut sql = String::from(SELECT_ROWS);

    if !term.is_empty() {
        sql.push_str(" AND (b.name LIKE ? OR b.producer LIKE ? OR b.region LIKE ?)");
    }
    if filter.region.is_some() {
        sql.push_str(" AND b.region = ?");
    }
    if filter.min_year.is_some() {
        sql.push_str(" AND b.vintage >= ?");
    }
    if filter.max_year.is_some() {
        sql.push_str(" AND b.vintage <= ?");
    }

    sql.push_str(order_clause(order));
    sql
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for bottle database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.bottles();
///
/// let id = repo.insert(&form).await?;
/// let rows = repo.search("chia", &SearchFilter::default(), RowOrder::NewestFirst).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BottleRepository {
    pool: MySqlPool,
}

impl BottleRepository {
    /// Creates a new BottleRepository.
    pub fn new(pool: MySqlPool) -> Self {
        BottleRepository { pool }
    }

    /// Fetches every bottle joined with its location, in the given order.
    pub async fn fetch_all(&self, order: RowOrder) -> DbResult<Vec<BottleRecord>> {
        self.search("", &SearchFilter::default(), order).await
    }

    /// Searches bottles by free-text term and/or narrowing filter.
    ///
    /// ## Matching Rules
    /// - `term`: case-insensitive substring containment, OR'd across
    ///   name/producer/region (utf8mb4's default collation is
    ///   case-insensitive, as the original LIKE search relied on)
    /// - `filter.region`: exact match
    /// - `filter.min_year`/`max_year`: inclusive vintage range
    ///
    /// An empty term with an empty filter returns the same rows as
    /// [`BottleRepository::fetch_all`].
    pub async fn search(
        &self,
        term: &str,
        filter: &SearchFilter,
        order: RowOrder,
    ) -> DbResult<Vec<BottleRecord>> {
        let term = term.trim();
        debug!(term = %term, ?order, "Searching bottles");

        let statement = select_statement(term, filter, order);
        let mut query = sqlx::query_as::<_, BottleRecord>(&statement);

        if !term.is_empty() {
            let pattern = format!("%{term}%");
            query = query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }
        if let Some(region) = &filter.region {
            query = query.bind(region.clone());
        }
        if let Some(min_year) = filter.min_year {
            query = query.bind(min_year);
        }
        if let Some(max_year) = filter.max_year {
            query = query.bind(max_year);
        }

        let rows = query.fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "Search returned bottles");
        Ok(rows)
    }

    /// Inserts a new bottle and, when assigned, its location row.
    ///
    /// ## What This Does
    /// 1. Clamps the price to the storable ceiling
    /// 2. Inserts the bottle row and reads the auto-assigned identifier
    /// 3. Inserts the location row iff any of shelf/rack/cellar is set
    /// 4. Commits; any step failure rolls the whole write back
    ///
    /// ## Returns
    /// The store-assigned identifier of the new bottle.
    pub async fn insert(&self, form: &BottleForm) -> DbResult<u64> {
        let price = clamp_price(form.price);
        debug!(name = %form.name, "Inserting bottle");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO bottles (name, producer, vintage, region, price, purchased_on) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&form.name)
        .bind(&form.producer)
        .bind(form.vintage)
        .bind(&form.region)
        .bind(price)
        .bind(form.purchased_on)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_id();

        if form.has_location() {
            sqlx::query(
                "INSERT INTO bottle_locations (bottle_id, shelf, rack, cellar, quantity) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(&form.shelf)
            .bind(&form.rack)
            .bind(&form.cellar)
            .bind(DEFAULT_LOCATION_QUANTITY)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id, "Bottle inserted");
        Ok(id)
    }

    /// Replaces all mutable fields of a bottle and its location.
    ///
    /// The location row is unconditionally deleted and then re-inserted if
    /// the form still carries one; a location edit is always a full
    /// replacement, never a merge. Both statements share one transaction.
    pub async fn update(&self, id: u64, form: &BottleForm) -> DbResult<()> {
        let price = clamp_price(form.price);
        debug!(id, "Updating bottle");

        let mut tx = self.pool.begin().await?;

        // Lock the row for this transaction; a plain rows_affected check
        // cannot tell "missing id" from "update changed nothing".
        let existing: Option<u64> = sqlx::query_scalar("SELECT id FROM bottles WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(DbError::not_found("Bottle", id));
        }

        sqlx::query(
            "UPDATE bottles SET name = ?, producer = ?, vintage = ?, region = ?, \
             price = ?, purchased_on = ? WHERE id = ?",
        )
        .bind(&form.name)
        .bind(&form.producer)
        .bind(form.vintage)
        .bind(&form.region)
        .bind(price)
        .bind(form.purchased_on)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM bottle_locations WHERE bottle_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if form.has_location() {
            sqlx::query(
                "INSERT INTO bottle_locations (bottle_id, shelf, rack, cellar, quantity) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(&form.shelf)
            .bind(&form.rack)
            .bind(&form.cellar)
            .bind(DEFAULT_LOCATION_QUANTITY)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Deletes a bottle and its location row.
    ///
    /// The location goes first so the foreign key never dangles; both
    /// deletes share one transaction. Deleting an unknown identifier is
    /// reported as [`DbError::NotFound`], not swallowed.
    pub async fn delete(&self, id: u64) -> DbResult<()> {
        debug!(id, "Deleting bottle");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bottle_locations WHERE bottle_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM bottles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bottle", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Computes the dashboard statistics snapshot.
    ///
    /// ## Contents
    /// - total bottle count and total purchase value (zero when empty)
    /// - bottle count per non-empty region
    /// - bottle count per set vintage, ascending by year
    /// - chart-ready projections of both maps
    pub async fn statistics(&self) -> DbResult<CollectionStats> {
        debug!("Computing collection statistics");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bottles")
            .fetch_one(&self.pool)
            .await?;

        // SUM over zero rows is NULL, not 0.
        let total_value: Option<Decimal> = sqlx::query_scalar("SELECT SUM(price) FROM bottles")
            .fetch_one(&self.pool)
            .await?;

        let region_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT region, COUNT(*) FROM bottles WHERE region != '' GROUP BY region")
                .fetch_all(&self.pool)
                .await?;

        let vintage_rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT vintage, COUNT(*) FROM bottles WHERE vintage IS NOT NULL \
             GROUP BY vintage ORDER BY vintage",
        )
        .fetch_all(&self.pool)
        .await?;

        let regions: BTreeMap<String, i64> = region_rows.into_iter().collect();
        let vintages: BTreeMap<i32, i64> = vintage_rows.into_iter().collect();

        Ok(CollectionStats::from_aggregates(
            total,
            total_value.unwrap_or(Decimal::ZERO),
            regions,
            vintages,
        ))
    }

    /// Captures one export job's snapshot: every row plus all four
    /// aggregate tables.
    ///
    /// ## Consistency
    /// All five queries run inside a single transaction. With InnoDB's
    /// REPEATABLE READ isolation they observe one point-in-time state of
    /// the store, so the row dump can never disagree with the aggregates
    /// even while other workers keep writing.
    pub async fn export_dataset(&self, order: RowOrder) -> DbResult<ReportDataset> {
        debug!(?order, "Capturing export dataset");

        let mut tx = self.pool.begin().await?;

        let statement = select_statement("", &SearchFilter::default(), order);
        let rows = sqlx::query_as::<_, BottleRecord>(&statement)
            .fetch_all(&mut *tx)
            .await?;

        let regions = sqlx::query_as::<_, RegionStat>(REGION_STATS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        let vintages = sqlx::query_as::<_, VintageStat>(VINTAGE_STATS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        // The CASE projection is typed BIGINT by the server.
        let bucket_rows: Vec<(i64, i64, Decimal)> = sqlx::query_as(PRICE_BUCKET_STATS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        let producers = sqlx::query_as::<_, ProducerStat>(PRODUCER_STATS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let price_buckets = bucket_rows
            .into_iter()
            .filter_map(|(index, bottles, total_value)| {
                PriceBucket::from_index(index as i32).map(|bucket| PriceBucketStat {
                    bucket,
                    bottles,
                    total_value,
                })
            })
            .collect();

        let dataset = ReportDataset {
            rows,
            regions,
            vintages,
            price_buckets,
            producers,
        };
        debug!(rows = dataset.rows.len(), "Export dataset captured");
        Ok(dataset)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_is_the_full_fetch_statement() {
        let full = select_statement("", &SearchFilter::default(), RowOrder::NewestFirst);
        assert_eq!(full, format!("{SELECT_ROWS} ORDER BY b.id DESC"));
        assert_eq!(full.matches('?').count(), 0);
    }

    #[test]
    fn term_adds_three_bound_patterns() {
        let sql = select_statement("chia", &SearchFilter::default(), RowOrder::NewestFirst);
        assert!(sql.contains("b.name LIKE ? OR b.producer LIKE ? OR b.region LIKE ?"));
        assert_eq!(sql.matches('?').count(), 3);
    }

    #[test]
    fn filters_add_their_own_placeholders() {
        let filter = SearchFilter {
            region: Some("Tuscany".to_string()),
            min_year: Some(2010),
            max_year: Some(2020),
        };
        let sql = select_statement("chia", &filter, RowOrder::NewestFirst);
        assert!(sql.contains("b.region = ?"));
        assert!(sql.contains("b.vintage >= ?"));
        assert!(sql.contains("b.vintage <= ?"));
        assert_eq!(sql.matches('?').count(), 6);
    }

    #[test]
    fn ordering_is_caller_selected() {
        let newest = select_statement("", &SearchFilter::default(), RowOrder::NewestFirst);
        assert!(newest.ends_with("ORDER BY b.id DESC"));

        let export = select_statement("", &SearchFilter::default(), RowOrder::VintageThenPrice);
        assert!(export.ends_with("ORDER BY b.vintage DESC, b.price DESC"));
    }

    #[test]
    fn bucket_case_indices_cover_the_enum() {
        for bucket in PriceBucket::ALL {
            assert!(
                PRICE_BUCKET_STATS_SQL.contains(&format!("THEN {}", bucket.index()))
                    || bucket.index() == 3,
                "bucket {bucket:?} missing from CASE"
            );
        }
        assert!(PRICE_BUCKET_STATS_SQL.contains("ELSE 3"));
    }
}
