//! Need aggregation: which part codes sold recently and how urgently they
//! are missing from stock.

use chrono::NaiveDate;

use crate::config;
use crate::error::Result;
use crate::models::{PartNeed, RecentSale};

use super::{date_param, months_before, resolve_anchor};

// ---------------------------------------------------------------------------
// NeedParams
// ---------------------------------------------------------------------------

/// Parameters for the need computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeedParams {
    /// Keep at most this many needs, applied after the urgency ordering.
    pub top_n: usize,
    /// How far back the sales window reaches, in calendar months.
    pub sales_window_months: u32,
    /// Anchor date for every window; `None` means today (UTC). Fix it in
    /// tests to make results reproducible.
    pub as_of: Option<NaiveDate>,
}

impl Default for NeedParams {
    fn default() -> Self {
        Self {
            top_n: config::DEFAULT_TOP_N,
            sales_window_months: config::DEFAULT_SALES_WINDOW_MONTHS,
            as_of: None,
        }
    }
}

// ---------------------------------------------------------------------------
// NeedQuery
// ---------------------------------------------------------------------------

/// Query interface for the ranked needs list, backed by the `sales`,
/// `stock_units` and `purchases` snapshot views.
pub struct NeedQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> NeedQuery<'a> {
    /// Create a new `NeedQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    // -- Ranked needs ------------------------------------------------------

    /// Compute the ranked needs list.
    ///
    /// A need exists for every part code with at least one sale inside the
    /// window; codes with zero sales never appear, whatever their stock
    /// level. Results come back sorted by urgency score, then by sales
    /// count, both descending, and are truncated to `top_n` only after
    /// that ordering is established.
    pub fn compute(&self, params: &NeedParams) -> Result<Vec<PartNeed>> {
        self.conn
            .ensure_views(&["sales", "stock_units", "purchases"])?;

        let anchor = resolve_anchor(params.as_of);
        let sql_params = vec![
            date_param(months_before(anchor, params.sales_window_months)),
            date_param(months_before(anchor, 3)),
            date_param(months_before(anchor, 6)),
            date_param(months_before(anchor, 12)),
        ];

        let sql = r#"
            WITH sold AS (
                SELECT UPPER("partCode") AS code,
                       COUNT(*) AS "recentSalesCount"
                FROM sales
                WHERE "saleDate" >= CAST(? AS TIMESTAMP)
                  AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
                GROUP BY UPPER("partCode")
            ),
            bought AS (
                SELECT UPPER("partCode") AS code,
                       ROUND(AVG(CASE WHEN "purchaseDate" >= CAST(? AS TIMESTAMP)
                                      THEN "purchasePrice" END), 2) AS "avgPurchasePrice3m",
                       ROUND(AVG(CASE WHEN "purchaseDate" >= CAST(? AS TIMESTAMP)
                                      THEN "purchasePrice" END), 2) AS "avgPurchasePrice6m",
                       ROUND(AVG(CASE WHEN "purchaseDate" >= CAST(? AS TIMESTAMP)
                                      THEN "purchasePrice" END), 2) AS "avgPurchasePrice12m"
                FROM purchases
                WHERE "purchasePrice" IS NOT NULL
                  AND "purchaseDate" IS NOT NULL
                  AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
                GROUP BY UPPER("partCode")
            ),
            available AS (
                SELECT UPPER("partCode") AS code,
                       COUNT(*) AS "availableStockCount"
                FROM stock_units
                WHERE "isInStock" = TRUE
                  AND ("isSold" IS NULL OR "isSold" = FALSE)
                  AND ("isArchived" IS NULL OR "isArchived" = FALSE)
                  AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
                GROUP BY UPPER("partCode")
            ),
            described AS (
                SELECT UPPER("partCode") AS code,
                       MAX(brand) AS brand,
                       MAX("fuelType") AS "fuelType",
                       MAX("modelName") AS "modelName",
                       MAX("modelVariant") AS "modelVariant",
                       CAST(MAX("modelYear") AS VARCHAR) AS "modelYear"
                FROM stock_units
                WHERE "partCode" IS NOT NULL AND TRIM("partCode") <> ''
                GROUP BY UPPER("partCode")
            )
            SELECT s.code,
                   d.brand,
                   d."fuelType",
                   d."modelName",
                   d."modelVariant",
                   d."modelYear",
                   s."recentSalesCount",
                   COALESCE(a."availableStockCount", 0) AS "availableStockCount",
                   b."avgPurchasePrice3m",
                   b."avgPurchasePrice6m",
                   b."avgPurchasePrice12m"
            FROM sold s
            LEFT JOIN bought b ON b.code = s.code
            LEFT JOIN available a ON a.code = s.code
            LEFT JOIN described d ON d.code = s.code
        "#;

        let mut needs: Vec<PartNeed> = self.conn.execute_into(sql, &sql_params)?;
        for need in &mut needs {
            need.urgency_score =
                urgency_score(need.recent_sales_count, need.available_stock_count);
        }
        needs.sort_by(|a, b| {
            b.urgency_score
                .partial_cmp(&a.urgency_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.recent_sales_count.cmp(&a.recent_sales_count))
        });
        needs.truncate(params.top_n);
        Ok(needs)
    }

    // -- Recent sales activity ---------------------------------------------

    /// Sales inside the window grouped by day and part code, newest day
    /// first. Feeds the activity feed next to the needs list.
    pub fn recent_sales(
        &self,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<RecentSale>> {
        self.conn.ensure_views(&["sales"])?;

        let anchor = resolve_anchor(as_of);
        let sql_params = vec![date_param(months_before(anchor, window_months))];

        let sql = r#"
            SELECT CAST("saleDate" AS DATE) AS "day",
                   strftime("saleDate", '%Y-%m') AS "month",
                   UPPER("partCode") AS code,
                   brand,
                   "fuelType",
                   COUNT(*) AS "count"
            FROM sales
            WHERE "saleDate" >= CAST(? AS TIMESTAMP)
              AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
            GROUP BY "day", "month", UPPER("partCode"), brand, "fuelType"
            ORDER BY "day" DESC, code
        "#;

        self.conn.execute_into(sql, &sql_params)
    }
}

// ---------------------------------------------------------------------------
// Free-standing helpers
// ---------------------------------------------------------------------------

/// Urgency of a need: recent sales against what is still on the shelf,
/// `sales / (stock + 1)`, rounded to two decimals. Zero sales means zero
/// urgency. The `+ 1` keeps the score finite at zero stock while still
/// letting empty shelves dominate.
pub fn urgency_score(recent_sales: i64, available_stock: i64) -> f64 {
    if recent_sales <= 0 {
        return 0.0;
    }
    let raw = recent_sales as f64 / (available_stock.max(0) as f64 + 1.0);
    (raw * 100.0).round() / 100.0
}
