//! Inventory queries against the `stock_units` snapshot view.

use serde_json::Value;

use crate::error::Result;
use crate::matching::normalize_part_code;
use crate::models::{CodeInfo, CodeStockCount, StockBreakdownRow, StockTotals, StockUnit};
use crate::sql_builder::SqlBuilder;

/// A unit counts as available when it is flagged in stock and neither sold
/// nor archived. Missing flags mean "not sold" / "not archived": exports
/// routinely leave them null.
const AVAILABLE: &str = r#""isInStock" = TRUE AND ("isSold" IS NULL OR "isSold" = FALSE) AND ("isArchived" IS NULL OR "isArchived" = FALSE)"#;

// ---------------------------------------------------------------------------
// StockSearchParams
// ---------------------------------------------------------------------------

/// Filters for browsing stock units.
///
/// All fields are optional. When `None`, the corresponding filter is skipped.
#[derive(Debug, Clone)]
pub struct StockSearchParams {
    /// Brand, matched case-insensitively (add `%` for a partial match).
    pub brand: Option<String>,
    /// Fuel type, matched case-insensitively.
    pub fuel_type: Option<String>,
    /// Substring of the part code.
    pub code_contains: Option<String>,
    pub model_year_from: Option<String>,
    pub model_year_to: Option<String>,
    /// When true (the default), only available units are returned.
    pub available_only: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Default for StockSearchParams {
    fn default() -> Self {
        Self {
            brand: None,
            fuel_type: None,
            code_contains: None,
            model_year_from: None,
            model_year_to: None,
            available_only: true,
            limit: None,
            offset: None,
        }
    }
}

// ---------------------------------------------------------------------------
// StockQuery
// ---------------------------------------------------------------------------

/// Query interface for yard inventory backed by the `stock_units` view.
pub struct StockQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> StockQuery<'a> {
    /// Create a new `StockQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    // -- Headline counters -------------------------------------------------

    /// Available / sold / total unit counts across the whole yard.
    pub fn totals(&self) -> Result<StockTotals> {
        self.conn.ensure_views(&["stock_units"])?;

        let sql = format!(
            r#"
            SELECT COALESCE(SUM(CASE WHEN {AVAILABLE} THEN 1 ELSE 0 END), 0) AS available,
                   COALESCE(SUM(CASE WHEN "isSold" = TRUE THEN 1 ELSE 0 END), 0) AS sold,
                   COUNT(*) AS total
            FROM stock_units
            "#
        );

        let mut rows: Vec<StockTotals> = self.conn.execute_into(&sql, &[])?;
        rows.pop().ok_or_else(|| {
            crate::error::YardstockError::NotFound("stock totals query returned no row".to_string())
        })
    }

    // -- Brand / fuel breakdown --------------------------------------------

    /// Available units grouped by brand and fuel type, biggest groups first.
    pub fn breakdown(&self) -> Result<Vec<StockBreakdownRow>> {
        self.conn.ensure_views(&["stock_units"])?;

        let (sql, params) = SqlBuilder::new("stock_units")
            .select(&["brand", "\"fuelType\"", "COUNT(*) AS \"count\""])
            .where_clause(AVAILABLE, &[])
            .group_by(&["brand", "\"fuelType\""])
            .order_by(&["\"count\" DESC", "brand"])
            .build();

        self.conn.execute_into(&sql, &params)
    }

    // -- Availability per code ---------------------------------------------

    /// Available unit count per part code. Codes that are blank in the
    /// snapshot are skipped.
    pub fn available_by_code(&self) -> Result<Vec<CodeStockCount>> {
        self.conn.ensure_views(&["stock_units"])?;

        let sql = format!(
            r#"
            SELECT UPPER("partCode") AS code,
                   COUNT(*) AS "count"
            FROM stock_units
            WHERE {AVAILABLE}
              AND "partCode" IS NOT NULL AND TRIM("partCode") <> ''
            GROUP BY UPPER("partCode")
            ORDER BY "count" DESC, code
            "#
        );

        self.conn.execute_into(&sql, &[])
    }

    /// Available units for one part code.
    pub fn available_for(&self, code: &str) -> Result<i64> {
        self.conn.ensure_views(&["stock_units"])?;

        let sql = format!(
            r#"
            SELECT COUNT(*) AS "count"
            FROM stock_units
            WHERE {AVAILABLE}
              AND UPPER("partCode") = ?
            "#
        );

        let count = self
            .conn
            .execute_scalar(&sql, &[normalize_part_code(code)])?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(count)
    }

    // -- Purchase price sample ---------------------------------------------

    /// Positive purchase prices of available units, for distribution
    /// charts. Capped at `limit` rows.
    pub fn purchase_price_sample(&self, limit: usize) -> Result<Vec<f64>> {
        self.conn.ensure_views(&["stock_units"])?;

        let sql = format!(
            r#"
            SELECT "purchasePrice" AS price
            FROM stock_units
            WHERE {AVAILABLE}
              AND "purchasePrice" IS NOT NULL AND "purchasePrice" > 0
            LIMIT {limit}
            "#
        );

        let rows = self.conn.execute(&sql, &[])?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("price").and_then(Value::as_f64))
            .collect())
    }

    // -- Code attributes ---------------------------------------------------

    /// Best-known descriptive attributes for one part code, aggregated
    /// across every unit that ever carried it. Returns `None` for a code
    /// absent from the snapshot.
    pub fn code_info(&self, code: &str) -> Result<Option<CodeInfo>> {
        let code = normalize_part_code(code);
        if code.is_empty() {
            return Ok(None);
        }
        self.conn.ensure_views(&["stock_units"])?;

        let sql = r#"
            SELECT UPPER("partCode") AS code,
                   MAX(brand) AS brand,
                   MAX("fuelType") AS "fuelType",
                   MAX("modelName") AS "modelName",
                   MAX("modelVariant") AS "modelVariant",
                   CAST(MAX("modelYear") AS VARCHAR) AS "modelYear"
            FROM stock_units
            WHERE UPPER("partCode") = ?
            GROUP BY UPPER("partCode")
            LIMIT 1
        "#;

        let mut rows: Vec<CodeInfo> = self.conn.execute_into(sql, &[code])?;
        Ok(rows.pop())
    }

    // -- Unit browsing -----------------------------------------------------

    /// Browse stock units with optional filters and pagination.
    pub fn search_units(&self, params: &StockSearchParams) -> Result<Vec<StockUnit>> {
        self.conn.ensure_views(&["stock_units"])?;

        let mut qb = SqlBuilder::new("stock_units");
        // modelYear is numeric in some exports; the model wants a string.
        qb.select(&[
            "\"partCode\"",
            "brand",
            "\"fuelType\"",
            "\"modelName\"",
            "\"modelVariant\"",
            "CAST(\"modelYear\" AS VARCHAR) AS \"modelYear\"",
            "\"isInStock\"",
            "\"isSold\"",
            "\"isArchived\"",
            "\"purchasePrice\"",
        ]);

        if params.available_only {
            qb.where_clause(AVAILABLE, &[]);
        }
        if let Some(ref brand) = params.brand {
            qb.where_like("brand", brand);
        }
        if let Some(ref fuel) = params.fuel_type {
            qb.where_like("\"fuelType\"", fuel);
        }
        if let Some(ref code) = params.code_contains {
            qb.where_like("\"partCode\"", &format!("%{}%", code));
        }
        if let Some(ref from) = params.model_year_from {
            qb.where_gte("\"modelYear\"", from);
        }
        if let Some(ref to) = params.model_year_to {
            qb.where_lte("\"modelYear\"", to);
        }

        qb.order_by(&["\"partCode\" ASC"]);
        if let Some(limit) = params.limit {
            qb.limit(limit);
        }
        if let Some(offset) = params.offset {
            qb.offset(offset);
        }

        let (sql, sql_params) = qb.build();
        self.conn.execute_into(&sql, &sql_params)
    }
}
