use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StockUnit — one physical unit from the stock snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUnit {
    pub part_code: Option<String>,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub model_name: Option<String>,
    pub model_variant: Option<String>,
    pub model_year: Option<String>,
    pub is_in_stock: Option<bool>,
    pub is_sold: Option<bool>,
    pub is_archived: Option<bool>,
    pub purchase_price: Option<f64>,
}

// ---------------------------------------------------------------------------
// StockTotals — headline inventory counters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTotals {
    /// Units in stock, not sold and not archived.
    pub available: i64,
    pub sold: i64,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// StockBreakdownRow — available units per brand and fuel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBreakdownRow {
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// CodeStockCount — available units per part code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStockCount {
    pub code: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// CodeInfo — best-known descriptive attributes for a part code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeInfo {
    pub code: String,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub model_name: Option<String>,
    pub model_variant: Option<String>,
    pub model_year: Option<String>,
}

// ---------------------------------------------------------------------------
// MonthlyPrice — average price per calendar month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPrice {
    /// Calendar month as `YYYY-MM`.
    pub month: String,
    pub avg_price: f64,
}

// ---------------------------------------------------------------------------
// RecentSale — sales activity grouped by day and code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    /// Sale day as `YYYY-MM-DD`.
    pub day: String,
    /// Sale month as `YYYY-MM`.
    pub month: String,
    pub code: String,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// SalePriceAvg — average realized sale price per part code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePriceAvg {
    pub code: String,
    pub avg_sale_price: f64,
    pub sale_count: i64,
}
