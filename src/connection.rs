//! DuckDB connection wrapper with view registration and query execution.
//!
//! Snapshot parquet files are exposed as views, registered lazily the first
//! time a query needs them. Offer tables live in the database file itself,
//! so submissions survive snapshot refreshes and process restarts.

use crate::cache::SnapshotStore;
use crate::config;
use crate::error::Result;
use duckdb::{types::TimeUnit, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// DDL for the locally persisted offer tables.
///
/// DuckDB has no auto-increment column, so each table draws its ids from an
/// explicit sequence. Column names are camelCase to match the snapshot
/// schema and the serde models.
const OFFER_TABLES_DDL: &str = r#"
CREATE SEQUENCE IF NOT EXISTS breakers_id_seq;
CREATE TABLE IF NOT EXISTS breakers (
    id BIGINT PRIMARY KEY DEFAULT nextval('breakers_id_seq'),
    name TEXT NOT NULL UNIQUE,
    "createdAt" TIMESTAMP NOT NULL DEFAULT now()
);
CREATE SEQUENCE IF NOT EXISTS targeted_offers_id_seq;
CREATE TABLE IF NOT EXISTS targeted_offers (
    id BIGINT PRIMARY KEY DEFAULT nextval('targeted_offers_id_seq'),
    "breakerId" BIGINT NOT NULL REFERENCES breakers(id),
    code TEXT NOT NULL,
    brand TEXT,
    "fuelType" TEXT,
    "modelName" TEXT,
    "modelVariant" TEXT,
    "modelYear" TEXT,
    price DOUBLE,
    quantity BIGINT NOT NULL DEFAULT 1,
    note TEXT,
    plate TEXT,
    vin TEXT,
    "createdAt" TIMESTAMP NOT NULL DEFAULT now()
);
CREATE SEQUENCE IF NOT EXISTS free_offers_id_seq;
CREATE TABLE IF NOT EXISTS free_offers (
    id BIGINT PRIMARY KEY DEFAULT nextval('free_offers_id_seq'),
    "breakerId" BIGINT NOT NULL REFERENCES breakers(id),
    "text" TEXT NOT NULL,
    price DOUBLE,
    note TEXT,
    plate TEXT,
    vin TEXT,
    "createdAt" TIMESTAMP NOT NULL DEFAULT now()
);
"#;

/// Wraps a DuckDB connection, the snapshot views and the offer tables.
///
/// The database is file-backed (under the cache directory), because offers
/// are written locally and must persist. Snapshot data stays in parquet and
/// is only ever attached as views.
pub struct Connection {
    conn: DuckDbConnection,
    /// The snapshot store used to download/locate data files.
    pub snapshots: RefCell<SnapshotStore>,
    registered_views: RefCell<HashSet<String>>,
    offer_tables_ready: RefCell<bool>,
}

impl Connection {
    /// Create a connection backed by the given snapshot store.
    ///
    /// Opens (or creates) the DuckDB database file inside the store's cache
    /// directory.
    pub fn new(snapshots: SnapshotStore) -> Result<Self> {
        let db_path = snapshots.cache_dir.join(config::DATABASE_FILE);
        let conn = DuckDbConnection::open(&db_path)?;
        Ok(Self {
            conn,
            snapshots: RefCell::new(snapshots),
            registered_views: RefCell::new(HashSet::new()),
            offer_tables_ready: RefCell::new(false),
        })
    }

    /// Ensure one or more snapshot views are registered, downloading data
    /// if needed.
    pub fn ensure_views(&self, views: &[&str]) -> Result<()> {
        for name in views {
            if !self.registered_views.borrow().contains(*name) {
                self.ensure_view(name)?;
            }
        }
        Ok(())
    }

    /// Ensure the offer tables (and their id sequences) exist.
    ///
    /// Runs the DDL once per connection; `IF NOT EXISTS` makes it harmless
    /// against an existing database file.
    pub fn ensure_offer_tables(&self) -> Result<()> {
        if *self.offer_tables_ready.borrow() {
            return Ok(());
        }
        self.conn.execute_batch(OFFER_TABLES_DDL)?;
        *self.offer_tables_ready.borrow_mut() = true;
        debug!("offer tables ready");
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Get column metadata AFTER query execution (calling before panics in duckdb-rs)
        let column_names: Vec<String> = rows_result
            .as_ref()
            .unwrap()
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let column_count = rows_result.as_ref().unwrap().column_count();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::new();
            for i in 0..column_count {
                let col_name = &column_names[i];
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    ///
    /// First executes the query as `HashMap` rows, then deserializes each
    /// row using `serde_json`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter()
                    .collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Create a DuckDB table from a newline-delimited JSON file.
    ///
    /// Used by test fixtures and ad-hoc local imports; DuckDB streams the
    /// file from disk, so nothing is materialized in Rust first.
    pub fn register_table_from_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<()> {
        let path_fwd = ndjson_path.replace('\\', "/");
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; \
             CREATE TABLE {} AS SELECT * FROM read_json_auto('{}', format='newline_delimited')",
            table_name, table_name, path_fwd
        ))?;
        self.registered_views
            .borrow_mut()
            .insert(table_name.to_string());
        Ok(())
    }

    /// Check whether a view has been registered.
    pub fn has_view(&self, name: &str) -> bool {
        self.registered_views.borrow().contains(name)
    }

    /// Return a list of all registered view names.
    pub fn views(&self) -> Vec<String> {
        self.registered_views.borrow().iter().cloned().collect()
    }

    /// Clear all registered views so they will be re-created on next access.
    pub fn reset_views(&self) {
        self.registered_views.borrow_mut().clear();
    }

    /// Access the underlying DuckDB connection for advanced usage.
    ///
    /// The offer submission path also goes through here, because raw
    /// statements can bind `NULL` for absent optional fields.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    /// Lazily register a parquet snapshot as a DuckDB view.
    fn ensure_view(&self, view_name: &str) -> Result<()> {
        if self.registered_views.borrow().contains(view_name) {
            return Ok(());
        }

        let path = self.snapshots.borrow_mut().ensure_snapshot(view_name)?;
        // Use forward slashes for DuckDB compatibility
        let path_str = path.to_string_lossy().replace('\\', "/");

        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM read_parquet('{}')",
            view_name, path_str
        ))?;
        self.registered_views
            .borrow_mut()
            .insert(view_name.to_string());
        debug!(view = view_name, path = %path_str, "registered view");

        Ok(())
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
///
/// Dates and timestamps become strings (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`)
/// so they survive the serde round-trip into model fields; decimals become
/// numbers. Exotic types nobody queries (intervals, nested lists) map to
/// null rather than failing the whole row.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            let s = String::from_utf8_lossy(bytes).to_string();
            serde_json::Value::String(s)
        }
        ValueRef::Blob(bytes) => serde_json::Value::String(format!(
            "blob:{}",
            bytes
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<String>()
        )),
        ValueRef::Date32(days) => {
            let date = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).and_then(|epoch| {
                chrono::Duration::try_days(days as i64).and_then(|d| epoch.checked_add_signed(d))
            });
            match date {
                Some(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
                None => serde_json::Value::Null,
            }
        }
        ValueRef::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            let secs = micros.div_euclid(1_000_000);
            let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
            match chrono::DateTime::from_timestamp(secs, nanos) {
                Some(dt) => serde_json::Value::String(
                    dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string(),
                ),
                None => serde_json::Value::Null,
            }
        }
        _ => {
            // Intervals, nested lists and other types no query here returns
            serde_json::Value::Null
        }
    }
}
