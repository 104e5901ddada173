//! Price trend queries: movement detection between adjacent windows and
//! monthly averages for charting.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config;
use crate::error::Result;
use crate::matching::normalize_part_code;
use crate::models::{MonthlyPrice, PriceKind, PriceMover, SalePriceAvg};

use super::{date_param, months_before, resolve_anchor};

// ---------------------------------------------------------------------------
// MoverParams
// ---------------------------------------------------------------------------

/// Parameters for price-movement detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoverParams {
    /// Which price stream to inspect.
    pub kind: PriceKind,
    /// Width of each comparison window, in calendar months.
    pub window_months: u32,
    /// How far back the base data reaches. Should cover at least two
    /// windows or the previous window comes up empty.
    pub lookback_months: u32,
    /// Minimum samples required in each window for a code to qualify.
    pub min_count: i64,
    /// Anchor date; `None` means today (UTC).
    pub as_of: Option<NaiveDate>,
}

impl MoverParams {
    pub fn new(kind: PriceKind) -> Self {
        Self {
            kind,
            window_months: config::DEFAULT_MOVER_WINDOW_MONTHS,
            lookback_months: config::DEFAULT_MOVER_LOOKBACK_MONTHS,
            min_count: config::DEFAULT_MOVER_MIN_COUNT,
            as_of: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for price history, backed by the `sales` and `purchases`
/// snapshot views.
pub struct PriceQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    // -- Price movers ------------------------------------------------------

    /// Detect part codes whose average price moved between the most recent
    /// window and the one immediately before it.
    ///
    /// Zero and null prices never enter an average. A code qualifies only
    /// when both windows hold at least `min_count` samples; everything else
    /// is dropped rather than reported with made-up numbers. Results are
    /// ordered by code for determinism; callers sort by `pct` or `delta`
    /// for display.
    pub fn movers(&self, params: &MoverParams) -> Result<Vec<PriceMover>> {
        let (table, date_col, price_col) = stream_columns(params.kind);
        self.conn.ensure_views(&[table])?;

        let anchor = resolve_anchor(params.as_of);
        let recent_cutoff = date_param(months_before(anchor, params.window_months));
        let prev_cutoff = date_param(months_before(anchor, 2 * params.window_months));
        let lookback_cutoff = date_param(months_before(anchor, params.lookback_months));

        let sql = format!(
            r#"
            WITH base AS (
                SELECT UPPER("partCode") AS code,
                       "{date_col}" AS dt,
                       "{price_col}" AS price
                FROM {table}
                WHERE "{date_col}" >= CAST(? AS TIMESTAMP)
                  AND "{price_col}" IS NOT NULL AND "{price_col}" > 0
                  AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
            )
            SELECT code,
                   AVG(CASE WHEN dt >= CAST(? AS TIMESTAMP) THEN price END) AS "avgRecent",
                   AVG(CASE WHEN dt < CAST(? AS TIMESTAMP)
                             AND dt >= CAST(? AS TIMESTAMP) THEN price END) AS "avgPrev",
                   SUM(CASE WHEN dt >= CAST(? AS TIMESTAMP) THEN 1 ELSE 0 END) AS "nRecent",
                   SUM(CASE WHEN dt < CAST(? AS TIMESTAMP)
                             AND dt >= CAST(? AS TIMESTAMP) THEN 1 ELSE 0 END) AS "nPrev"
            FROM base
            GROUP BY code
            ORDER BY code
            "#
        );

        let sql_params = vec![
            lookback_cutoff,
            recent_cutoff.clone(),
            recent_cutoff.clone(),
            prev_cutoff.clone(),
            recent_cutoff.clone(),
            recent_cutoff,
            prev_cutoff,
        ];

        let rows = self.conn.execute(&sql, &sql_params)?;
        let mut movers = Vec::new();
        for row in rows {
            let code = match row.get("code").and_then(Value::as_str) {
                Some(code) => code.to_string(),
                None => continue,
            };
            let n_recent = row.get("nRecent").and_then(Value::as_i64).unwrap_or(0);
            let n_prev = row.get("nPrev").and_then(Value::as_i64).unwrap_or(0);
            if n_recent < params.min_count || n_prev < params.min_count {
                continue;
            }
            let (avg_recent, avg_prev) = match (
                row.get("avgRecent").and_then(Value::as_f64),
                row.get("avgPrev").and_then(Value::as_f64),
            ) {
                (Some(recent), Some(prev)) => (recent, prev),
                _ => continue,
            };
            let (delta, pct) = mover_metrics(avg_prev, avg_recent);
            movers.push(PriceMover {
                code,
                n_recent,
                n_prev,
                avg_prev: round2(avg_prev),
                avg_recent: round2(avg_recent),
                delta,
                pct,
            });
        }
        Ok(movers)
    }

    // -- Monthly averages --------------------------------------------------

    /// Average purchase price per calendar month over the window.
    pub fn monthly_purchase_averages(
        &self,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyPrice>> {
        self.monthly_averages(PriceKind::Purchase, None, window_months, as_of)
    }

    /// Average sale price per calendar month over the window.
    pub fn monthly_sale_averages(
        &self,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyPrice>> {
        self.monthly_averages(PriceKind::Sale, None, window_months, as_of)
    }

    /// Average purchase price per month for one part code.
    pub fn monthly_purchase_averages_for(
        &self,
        code: &str,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyPrice>> {
        self.monthly_averages(PriceKind::Purchase, Some(code), window_months, as_of)
    }

    /// Average sale price per month for one part code.
    pub fn monthly_sale_averages_for(
        &self,
        code: &str,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyPrice>> {
        self.monthly_averages(PriceKind::Sale, Some(code), window_months, as_of)
    }

    fn monthly_averages(
        &self,
        kind: PriceKind,
        code: Option<&str>,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyPrice>> {
        let (table, date_col, price_col) = stream_columns(kind);
        self.conn.ensure_views(&[table])?;

        let anchor = resolve_anchor(as_of);
        let mut sql_params = vec![date_param(months_before(anchor, window_months))];

        let code_filter = if let Some(code) = code {
            sql_params.push(normalize_part_code(code));
            "AND UPPER(\"partCode\") = ?"
        } else {
            ""
        };

        let sql = format!(
            r#"
            SELECT strftime("{date_col}", '%Y-%m') AS "month",
                   AVG("{price_col}") AS "avgPrice"
            FROM {table}
            WHERE "{date_col}" >= CAST(? AS TIMESTAMP)
              AND "{price_col}" IS NOT NULL AND "{price_col}" > 0
              {code_filter}
            GROUP BY "month"
            ORDER BY "month"
            "#
        );

        self.conn.execute_into(&sql, &sql_params)
    }

    // -- Realized sale prices ----------------------------------------------

    /// Average realized sale price per part code over the window, with the
    /// sample count behind each average. The pricing engine anchors its
    /// proposals on these.
    pub fn sale_price_averages(
        &self,
        window_months: u32,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<SalePriceAvg>> {
        self.conn.ensure_views(&["sales"])?;

        let anchor = resolve_anchor(as_of);
        let sql_params = vec![date_param(months_before(anchor, window_months))];

        let sql = r#"
            SELECT UPPER("partCode") AS code,
                   AVG("salePrice") AS "avgSalePrice",
                   COUNT(*) AS "saleCount"
            FROM sales
            WHERE "saleDate" >= CAST(? AS TIMESTAMP)
              AND "salePrice" IS NOT NULL AND "salePrice" > 0
              AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
            GROUP BY UPPER("partCode")
            ORDER BY code
        "#;

        self.conn.execute_into(sql, &sql_params)
    }
}

// ---------------------------------------------------------------------------
// Free-standing helpers
// ---------------------------------------------------------------------------

/// Table and column names for a price stream.
fn stream_columns(kind: PriceKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        PriceKind::Purchase => ("purchases", "purchaseDate", "purchasePrice"),
        PriceKind::Sale => ("sales", "saleDate", "salePrice"),
    }
}

/// Delta and percent change between two window averages, both rounded to
/// two decimals. The percentage is `None` when the previous average is
/// zero, because any number there would be an invention.
pub fn mover_metrics(avg_prev: f64, avg_recent: f64) -> (f64, Option<f64>) {
    let delta = round2(avg_recent - avg_prev);
    let pct = if avg_prev == 0.0 {
        None
    } else {
        Some(round2((avg_recent - avg_prev) / avg_prev * 100.0))
    };
    (delta, pct)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
