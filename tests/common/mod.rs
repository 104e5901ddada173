//! Shared fixtures for the yardstock SDK integration tests.
//!
//! Provides `setup_sample_db()`, which creates an offline `Connection` in a
//! temporary cache directory and loads small sample tables (sales,
//! stock_units, purchases, plates) via NDJSON temp files. Every dated row is
//! placed relative to [`anchor`], so windowed aggregates come out the same
//! no matter when the suite actually runs.
#![allow(dead_code)]

use std::io::Write;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;

use yardstock_sdk::{Connection, SnapshotStore};

/// Fixed "today" every windowed test passes as `as_of`.
///
/// Relative to this date the sample rows put the 3-month cutoff at
/// 2026-05-01, the 6-month cutoff at 2026-02-01 and the 12-month cutoff at
/// 2025-08-01.
pub fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

/// Create a `Connection` backed by a temporary cache directory with all
/// sample tables loaded.
///
/// Returns `(Connection, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test so the cache directory (and
/// the database file inside it) is not deleted prematurely.
pub fn setup_sample_db() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(
        Some(tmp_dir.path().to_path_buf()),
        true,
        Duration::from_secs(30),
        None,
    )
    .unwrap();
    let conn = Connection::new(store).unwrap();

    seed_tables(&conn);

    (conn, tmp_dir)
}

/// Load every sample table into an existing connection. Split out so the
/// SDK-level tests can seed through `YardstockSdk::connection()`.
pub fn seed_tables(conn: &Connection) {
    register_sales(conn);
    register_stock_units(conn);
    register_purchases(conn);
    register_plates(conn);
}

pub fn register_sales(conn: &Connection) {
    let rows = vec![
        // K7M710: five sales inside the 3-month window (one of them with a
        // lowercase code), two more in the window before.
        json!({"partCode": "K7M710", "saleDate": "2026-07-20T14:30:00", "salePrice": 110.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        json!({"partCode": "K7M710", "saleDate": "2026-07-05T09:00:00", "salePrice": 120.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        json!({"partCode": "K7M710", "saleDate": "2026-06-15T16:45:00", "salePrice": 110.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        json!({"partCode": "K7M710", "saleDate": "2026-05-10T11:20:00", "salePrice": 100.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        json!({"partCode": "k7m710", "saleDate": "2026-05-02T10:00:00", "salePrice": 110.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        json!({"partCode": "K7M710", "saleDate": "2026-04-10T10:00:00", "salePrice": 100.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        json!({"partCode": "K7M710", "saleDate": "2026-03-05T15:30:00", "salePrice": 100.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
        // F4R830: four recent sales, only one in the previous window.
        json!({"partCode": "F4R830", "saleDate": "2026-07-18T13:00:00", "salePrice": 80.0, "brand": "RENAULT", "fuelType": "ESSENCE"}),
        json!({"partCode": "F4R830", "saleDate": "2026-06-20T10:30:00", "salePrice": 90.0, "brand": "RENAULT", "fuelType": "ESSENCE"}),
        json!({"partCode": "F4R830", "saleDate": "2026-06-01T17:00:00", "salePrice": 70.0, "brand": "RENAULT", "fuelType": "ESSENCE"}),
        json!({"partCode": "F4R830", "saleDate": "2026-05-15T09:45:00", "salePrice": 80.0, "brand": "RENAULT", "fuelType": "ESSENCE"}),
        json!({"partCode": "F4R830", "saleDate": "2026-03-20T14:00:00", "salePrice": 60.0, "brand": "RENAULT", "fuelType": "ESSENCE"}),
        // K9K702: two recent, two previous.
        json!({"partCode": "K9K702", "saleDate": "2026-07-10T08:30:00", "salePrice": 50.0, "brand": "DACIA", "fuelType": "DIESEL"}),
        json!({"partCode": "K9K702", "saleDate": "2026-06-05T12:00:00", "salePrice": 60.0, "brand": "DACIA", "fuelType": "DIESEL"}),
        json!({"partCode": "K9K702", "saleDate": "2026-04-15T16:00:00", "salePrice": 50.0, "brand": "DACIA", "fuelType": "DIESEL"}),
        json!({"partCode": "K9K702", "saleDate": "2026-03-10T11:00:00", "salePrice": 50.0, "brand": "DACIA", "fuelType": "DIESEL"}),
        // DV6TED4: sold in January only, outside both mover windows.
        json!({"partCode": "DV6TED4", "saleDate": "2026-01-15T10:00:00", "salePrice": 40.0, "brand": "PEUGEOT", "fuelType": "DIESEL"}),
        json!({"partCode": "DV6TED4", "saleDate": "2026-01-20T15:00:00", "salePrice": 45.0, "brand": "PEUGEOT", "fuelType": "DIESEL"}),
        // ZZ000: one giveaway at price zero, nothing known about the car.
        json!({"partCode": "ZZ000", "saleDate": "2026-07-25T12:00:00", "salePrice": 0.0, "brand": null, "fuelType": null}),
        // Rows no code-level aggregate should ever pick up.
        json!({"partCode": "", "saleDate": "2026-07-01T10:00:00", "salePrice": 10.0, "brand": null, "fuelType": null}),
        json!({"partCode": null, "saleDate": "2026-07-02T11:00:00", "salePrice": 10.0, "brand": null, "fuelType": null}),
    ];
    write_ndjson_and_register(conn, "sales", &rows);
}

pub fn register_stock_units(conn: &Connection) {
    let rows = vec![
        json!({"partCode": "F4R830", "brand": "RENAULT", "fuelType": "ESSENCE", "modelName": "MEGANE", "modelVariant": "2.0 16V", "modelYear": 2004, "isInStock": true, "isSold": false, "isArchived": false, "purchasePrice": 45.0}),
        // K9K702: three available (one with null flags, one without a
        // purchase price) plus one sold.
        json!({"partCode": "K9K702", "brand": "DACIA", "fuelType": "DIESEL", "modelName": "DUSTER", "modelVariant": "1.5 DCI", "modelYear": 2016, "isInStock": true, "isSold": null, "isArchived": null, "purchasePrice": 30.0}),
        json!({"partCode": "K9K702", "brand": "DACIA", "fuelType": "DIESEL", "modelName": "DUSTER", "modelVariant": "1.5 DCI", "modelYear": 2016, "isInStock": true, "isSold": false, "isArchived": false, "purchasePrice": 35.0}),
        json!({"partCode": "K9K702", "brand": "DACIA", "fuelType": "DIESEL", "modelName": "DUSTER", "modelVariant": "1.5 DCI", "modelYear": 2016, "isInStock": true, "isSold": false, "isArchived": false, "purchasePrice": null}),
        json!({"partCode": "K9K702", "brand": "DACIA", "fuelType": "DIESEL", "modelName": "DUSTER", "modelVariant": "1.5 DCI", "modelYear": 2016, "isInStock": false, "isSold": true, "isArchived": false, "purchasePrice": 28.0}),
        // K7M710's only unit is archived, so the code counts as out of stock.
        json!({"partCode": "K7M710", "brand": "RENAULT", "fuelType": "DIESEL", "modelName": "CLIO", "modelVariant": "1.5 DCI", "modelYear": 2008, "isInStock": true, "isSold": false, "isArchived": true, "purchasePrice": 40.0}),
        json!({"partCode": "DV6TED4", "brand": "PEUGEOT", "fuelType": "DIESEL", "modelName": "307", "modelVariant": "1.6 HDI", "modelYear": 2006, "isInStock": true, "isSold": false, "isArchived": false, "purchasePrice": 20.0}),
        json!({"partCode": "DV6TED4", "brand": "PEUGEOT", "fuelType": "DIESEL", "modelName": "307", "modelVariant": "1.6 HDI", "modelYear": 2006, "isInStock": true, "isSold": false, "isArchived": false, "purchasePrice": 25.0}),
        // A unit the export never mapped to a part code.
        json!({"partCode": null, "brand": "FORD", "fuelType": "DIESEL", "modelName": "FOCUS", "modelVariant": null, "modelYear": 2010, "isInStock": true, "isSold": false, "isArchived": false, "purchasePrice": 15.0}),
    ];
    write_ndjson_and_register(conn, "stock_units", &rows);
}

pub fn register_purchases(conn: &Connection) {
    let rows = vec![
        json!({"partCode": "K7M710", "purchaseDate": "2026-07-01", "purchasePrice": 50.0}),
        json!({"partCode": "K7M710", "purchaseDate": "2026-06-10", "purchasePrice": 40.0}),
        json!({"partCode": "K7M710", "purchaseDate": "2026-03-15", "purchasePrice": 30.0}),
        json!({"partCode": "K7M710", "purchaseDate": "2025-09-20", "purchasePrice": 20.0}),
        // Older than every window.
        json!({"partCode": "K7M710", "purchaseDate": "2025-06-01", "purchasePrice": 10.0}),
        json!({"partCode": "F4R830", "purchaseDate": "2026-07-15", "purchasePrice": 44.0}),
        // Undated and unattributed rows; only the blank code may surface,
        // and only in the code-free monthly chart.
        json!({"partCode": "K7M710", "purchaseDate": null, "purchasePrice": 999.0}),
        json!({"partCode": "", "purchaseDate": "2026-07-01", "purchasePrice": 99.0}),
    ];
    write_ndjson_and_register(conn, "purchases", &rows);
}

pub fn register_plates(conn: &Connection) {
    let rows = vec![
        json!({"plate": "AB-123-CD", "partCode": "K7M710", "brand": "RENAULT", "modelName": "CLIO", "modelYear": 2008, "fuelType": "DIESEL"}),
        json!({"plate": "EF 456 GH", "partCode": null, "brand": "PEUGEOT", "modelName": "307", "modelYear": 2006, "fuelType": "DIESEL"}),
        json!({"plate": "IJ-789-KL", "partCode": null, "brand": "DACIA", "modelName": "DUSTER", "modelYear": 2016, "fuelType": "DIESEL"}),
        json!({"plate": "XY-999-ZZ", "partCode": "NOCODE99", "brand": "FIAT", "modelName": "PANDA", "modelYear": 2012, "fuelType": "ESSENCE"}),
    ];
    write_ndjson_and_register(conn, "plates", &rows);
}

/// Replace the sales table with a single fresh row. Used to show when
/// cached aggregates are (and are not) recomputed.
pub fn register_single_sale(conn: &Connection) {
    let rows = vec![
        json!({"partCode": "SOLO11", "saleDate": "2026-07-10T10:00:00", "salePrice": 90.0, "brand": "RENAULT", "fuelType": "DIESEL"}),
    ];
    write_ndjson_and_register(conn, "sales", &rows);
}

fn write_ndjson_and_register(conn: &Connection, table_name: &str, rows: &[serde_json::Value]) {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(tmp, "{}", row).unwrap();
    }
    tmp.flush().unwrap();
    conn.register_table_from_ndjson(table_name, tmp.path().to_str().unwrap())
        .unwrap();
    // The temp file can go away now; DuckDB has already materialized the table.
}
