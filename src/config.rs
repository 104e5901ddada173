use std::collections::HashMap;
use std::path::PathBuf;

pub const SNAPSHOT_BASE: &str = "https://snapshots.yardstock.dev/v1";
pub const MANIFEST_URL: &str = "https://snapshots.yardstock.dev/v1/manifest.json";

/// File name of the local DuckDB database holding the offer tables.
pub const DATABASE_FILE: &str = "yardstock.duckdb";

/// Default trailing window for sales aggregation, in months.
pub const DEFAULT_SALES_WINDOW_MONTHS: u32 = 3;

/// Default size of the ranked need list.
pub const DEFAULT_TOP_N: usize = 50;

/// Default parameters for the price-movement detector.
pub const DEFAULT_MOVER_WINDOW_MONTHS: u32 = 3;
pub const DEFAULT_MOVER_LOOKBACK_MONTHS: u32 = 12;
pub const DEFAULT_MOVER_MIN_COUNT: i64 = 5;

/// Default TTL for cached aggregate results (need list, mover reports).
pub const DEFAULT_AGGREGATE_TTL_SECS: u64 = 300;

pub fn snapshot_files() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("sales", "parquet/sales.parquet"),
        ("stock_units", "parquet/stock_units.parquet"),
        ("purchases", "parquet/purchases.parquet"),
        ("plates", "parquet/plates.parquet"),
    ])
}

pub fn json_files() -> HashMap<&'static str, &'static str> {
    HashMap::from([("manifest", "manifest.json")])
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("yardstock-sdk")
    } else {
        PathBuf::from(".yardstock-sdk-cache")
    }
}
