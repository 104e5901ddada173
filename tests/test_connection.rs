//! Connection integration tests: SQL execution, NDJSON registration, value
//! conversion.

mod common;

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use yardstock_sdk::{Connection, SnapshotStore};

fn fresh_connection() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(
        Some(tmp_dir.path().to_path_buf()),
        true,
        Duration::from_secs(30),
        None,
    )
    .unwrap();
    (Connection::new(store).unwrap(), tmp_dir)
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_correct_rows() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute("SELECT * FROM plates ORDER BY plate", &[])
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["plate"], "AB-123-CD");
    assert_eq!(rows[0]["partCode"], "K7M710");
    assert!(rows[1]["partCode"].is_null());
    assert_eq!(rows[3]["plate"], "XY-999-ZZ");
}

#[test]
fn execute_with_params() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE \"partCode\" = ?",
            &["K7M710".to_string()],
        )
        .unwrap();
    // Exact match only; the lowercase k7m710 row is not included.
    assert_eq!(rows.len(), 6);
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE \"partCode\" = ?",
            &["NOPE999".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// execute_scalar
// ---------------------------------------------------------------------------

#[test]
fn execute_scalar_returns_single_value() {
    let (conn, _tmp) = common::setup_sample_db();

    let result = conn
        .execute_scalar("SELECT COUNT(*) FROM stock_units", &[])
        .unwrap();
    assert!(result.is_some());
    assert_eq!(result.unwrap().as_i64().unwrap(), 9);
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let (conn, _tmp) = common::setup_sample_db();

    let result = conn
        .execute_scalar(
            "SELECT \"partCode\" FROM sales WHERE \"partCode\" = ?",
            &["NOPE999".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// register_table_from_ndjson
// ---------------------------------------------------------------------------

#[test]
fn register_table_from_ndjson_creates_queryable_table() {
    let (conn, _tmp) = fresh_connection();

    // Write a small NDJSON file
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"id": 1, "code": "K7M710"}}"#).unwrap();
    writeln!(file, r#"{{"id": 2, "code": "F4R830"}}"#).unwrap();
    file.flush().unwrap();

    conn.register_table_from_ndjson("test_table", file.path().to_str().unwrap())
        .unwrap();

    // Verify the data is queryable
    let rows = conn
        .execute("SELECT * FROM test_table ORDER BY id", &[])
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["code"], "K7M710");
    assert_eq!(rows[1]["code"], "F4R830");
}

#[test]
fn register_table_from_ndjson_marks_view_as_registered() {
    let (conn, _tmp) = fresh_connection();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"x": 1}}"#).unwrap();
    file.flush().unwrap();

    assert!(!conn.has_view("my_table"));

    conn.register_table_from_ndjson("my_table", file.path().to_str().unwrap())
        .unwrap();

    assert!(conn.has_view("my_table"));
}

#[test]
fn register_table_replaces_existing_table() {
    let (conn, _tmp) = fresh_connection();

    // First registration
    let mut file1 = NamedTempFile::new().unwrap();
    writeln!(file1, r#"{{"val": "old"}}"#).unwrap();
    file1.flush().unwrap();
    conn.register_table_from_ndjson("replaceable", file1.path().to_str().unwrap())
        .unwrap();

    // Second registration (replaces)
    let mut file2 = NamedTempFile::new().unwrap();
    writeln!(file2, r#"{{"val": "new"}}"#).unwrap();
    file2.flush().unwrap();
    conn.register_table_from_ndjson("replaceable", file2.path().to_str().unwrap())
        .unwrap();

    let rows = conn.execute("SELECT * FROM replaceable", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["val"], "new");
}

// ---------------------------------------------------------------------------
// has_view / views
// ---------------------------------------------------------------------------

#[test]
fn has_view_returns_false_initially() {
    let (conn, _tmp) = fresh_connection();

    assert!(!conn.has_view("sales"));
    assert!(!conn.has_view("stock_units"));
}

#[test]
fn views_returns_all_registered_view_names() {
    let (conn, _tmp) = common::setup_sample_db();

    let views = conn.views();
    assert!(views.contains(&"sales".to_string()));
    assert!(views.contains(&"stock_units".to_string()));
    assert!(views.contains(&"purchases".to_string()));
    assert!(views.contains(&"plates".to_string()));
    assert_eq!(views.len(), 4);
}

// ---------------------------------------------------------------------------
// reset_views
// ---------------------------------------------------------------------------

#[test]
fn reset_views_clears_registered_views() {
    let (conn, _tmp) = common::setup_sample_db();

    assert!(!conn.views().is_empty());

    conn.reset_views();

    assert!(conn.views().is_empty());
    assert!(!conn.has_view("sales"));
    assert!(!conn.has_view("plates"));
}

// ---------------------------------------------------------------------------
// raw
// ---------------------------------------------------------------------------

#[test]
fn raw_provides_access_to_underlying_duckdb_connection() {
    let (conn, _tmp) = common::setup_sample_db();

    // Use raw() to execute SQL directly
    let raw = conn.raw();
    raw.execute_batch("CREATE TABLE raw_test (id INTEGER, value TEXT)")
        .unwrap();
    raw.execute_batch("INSERT INTO raw_test VALUES (1, 'hello')")
        .unwrap();

    // Verify via the Connection's execute method
    let rows = conn.execute("SELECT * FROM raw_test", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["value"], "hello");
}

// ---------------------------------------------------------------------------
// execute_into
// ---------------------------------------------------------------------------

#[test]
fn execute_into_deserializes_rows() {
    let (conn, _tmp) = common::setup_sample_db();

    #[derive(serde::Deserialize, Debug)]
    struct SimpleSale {
        code: String,
        price: f64,
    }

    let sales: Vec<SimpleSale> = conn
        .execute_into(
            "SELECT \"partCode\" AS code, \"salePrice\" AS price \
             FROM sales WHERE \"partCode\" = ? ORDER BY \"saleDate\"",
            &["K9K702".to_string()],
        )
        .unwrap();
    assert_eq!(sales.len(), 4);
    assert_eq!(sales[0].code, "K9K702");
    assert!((sales[0].price - 50.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Type conversions
// ---------------------------------------------------------------------------

#[test]
fn null_values_are_converted_to_json_null() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT brand FROM sales WHERE \"partCode\" = ?",
            &["ZZ000".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0]["brand"].is_null());
}

#[test]
fn boolean_values_are_converted_correctly() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT \"isArchived\" FROM stock_units WHERE \"partCode\" = ?",
            &["K7M710".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["isArchived"], true);
}

#[test]
fn numeric_values_are_converted_correctly() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT \"purchasePrice\" FROM stock_units WHERE \"partCode\" = ?",
            &["F4R830".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    let price = rows[0]["purchasePrice"].as_f64().unwrap();
    assert!((price - 45.0).abs() < f64::EPSILON);
}

#[test]
fn dates_are_converted_to_iso_strings() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT \"purchaseDate\" FROM purchases WHERE \"partCode\" = ?",
            &["F4R830".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["purchaseDate"], "2026-07-15");
}

#[test]
fn timestamps_are_converted_to_readable_strings() {
    let (conn, _tmp) = common::setup_sample_db();

    let rows = conn
        .execute(
            "SELECT \"saleDate\" FROM sales WHERE \"partCode\" = ?",
            &["ZZ000".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["saleDate"], "2026-07-25 12:00:00");
}

#[test]
fn hugeint_aggregates_fit_into_plain_numbers() {
    let (conn, _tmp) = common::setup_sample_db();

    // SUM over BIGINT comes back as HUGEINT from DuckDB.
    let total = conn
        .execute_scalar("SELECT SUM(\"modelYear\") FROM stock_units", &[])
        .unwrap()
        .unwrap();
    assert_eq!(total.as_i64().unwrap(), 18098);
}
