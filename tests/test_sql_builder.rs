//! Unit tests for the SqlBuilder query construction.

use yardstock_sdk::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("stock_units").build();
    assert_eq!(sql, "SELECT *\nFROM stock_units");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("stock_units")
        .select(&["\"partCode\"", "brand"])
        .build();
    assert!(sql.starts_with("SELECT \"partCode\", brand\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("stock_units")
        .where_eq("brand", "RENAULT")
        .build();
    assert!(sql.contains("WHERE brand = ?"));
    assert_eq!(params, vec!["RENAULT"]);
}

#[test]
fn where_like_adds_case_insensitive_like() {
    let (sql, params) = SqlBuilder::new("stock_units")
        .where_like("\"partCode\"", "%K9K%")
        .build();
    assert!(sql.contains("LOWER(\"partCode\") LIKE LOWER(?)"));
    assert_eq!(params, vec!["%K9K%"]);
}

#[test]
fn where_in_adds_in_clause() {
    let (sql, params) = SqlBuilder::new("sales")
        .where_in("\"partCode\"", &["K7M710", "F4R830", "K9K702"])
        .build();
    assert!(sql.contains("\"partCode\" IN (?, ?, ?)"));
    assert_eq!(params, vec!["K7M710", "F4R830", "K9K702"]);
}

#[test]
fn where_in_empty_produces_false() {
    let (sql, params) = SqlBuilder::new("sales")
        .where_in("\"partCode\"", &[])
        .build();
    assert!(sql.contains("WHERE FALSE"));
    assert!(params.is_empty());
}

#[test]
fn where_gte_adds_comparison() {
    let (sql, params) = SqlBuilder::new("stock_units")
        .where_gte("\"modelYear\"", "2008")
        .build();
    assert!(sql.contains("\"modelYear\" >= ?"));
    assert_eq!(params, vec!["2008"]);
}

#[test]
fn where_lte_adds_comparison() {
    let (sql, params) = SqlBuilder::new("stock_units")
        .where_lte("\"modelYear\"", "2016")
        .build();
    assert!(sql.contains("\"modelYear\" <= ?"));
    assert_eq!(params, vec!["2016"]);
}

#[test]
fn where_clause_appends_params_in_order() {
    let (sql, params) = SqlBuilder::new("sales")
        .where_clause("\"saleDate\" >= CAST(? AS TIMESTAMP)", &["2026-05-01"])
        .where_eq("brand", "DACIA")
        .build();
    assert!(sql.contains("\"saleDate\" >= CAST(? AS TIMESTAMP)"));
    assert!(sql.contains("brand = ?"));
    assert_eq!(params, vec!["2026-05-01", "DACIA"]);
}

// ---------------------------------------------------------------------------
// JOIN
// ---------------------------------------------------------------------------

#[test]
fn join_adds_clause() {
    let (sql, _) = SqlBuilder::new("targeted_offers o")
        .join("JOIN breakers b ON o.\"breakerId\" = b.id")
        .build();
    assert!(sql.contains("JOIN breakers b ON o.\"breakerId\" = b.id"));
}

// ---------------------------------------------------------------------------
// GROUP BY
// ---------------------------------------------------------------------------

#[test]
fn group_by_adds_clause() {
    let (sql, _) = SqlBuilder::new("stock_units")
        .select(&["brand", "COUNT(*) AS cnt"])
        .group_by(&["brand"])
        .build();
    assert!(sql.contains("GROUP BY brand"));
}

// ---------------------------------------------------------------------------
// ORDER BY
// ---------------------------------------------------------------------------

#[test]
fn order_by_adds_clause() {
    let (sql, _) = SqlBuilder::new("stock_units")
        .order_by(&["brand ASC", "\"modelYear\" DESC"])
        .build();
    assert!(sql.contains("ORDER BY brand ASC, \"modelYear\" DESC"));
}

// ---------------------------------------------------------------------------
// LIMIT / OFFSET
// ---------------------------------------------------------------------------

#[test]
fn limit_adds_clause() {
    let (sql, _) = SqlBuilder::new("sales")
        .limit(10)
        .build();
    assert!(sql.contains("LIMIT 10"));
}

#[test]
fn offset_adds_clause() {
    let (sql, _) = SqlBuilder::new("sales")
        .offset(20)
        .build();
    assert!(sql.contains("OFFSET 20"));
}

#[test]
fn limit_and_offset_together() {
    let (sql, _) = SqlBuilder::new("sales")
        .limit(10)
        .offset(20)
        .build();
    assert!(sql.contains("LIMIT 10"));
    assert!(sql.contains("OFFSET 20"));
}

// ---------------------------------------------------------------------------
// Combined / chained
// ---------------------------------------------------------------------------

#[test]
fn combined_builder_chains_correctly() {
    let (sql, params) = SqlBuilder::new("stock_units")
        .where_eq("\"isInStock\"", "true")
        .where_like("brand", "renault")
        .where_gte("\"modelYear\"", "2004")
        .order_by(&["\"partCode\" ASC"])
        .limit(10)
        .offset(0)
        .build();

    assert!(sql.contains("\"isInStock\" = ?"));
    assert!(sql.contains("LOWER(brand) LIKE LOWER(?)"));
    assert!(sql.contains("\"modelYear\" >= ?"));
    assert!(sql.contains("ORDER BY \"partCode\" ASC"));
    assert!(sql.contains("LIMIT 10"));
    assert!(sql.contains("OFFSET 0"));
    assert_eq!(params.len(), 3);
    assert_eq!(params[0], "true");
    assert_eq!(params[1], "renault");
    assert_eq!(params[2], "2004");
}

#[test]
fn multiple_where_clauses_joined_with_and() {
    let (sql, _) = SqlBuilder::new("stock_units")
        .where_eq("brand", "DACIA")
        .where_eq("\"fuelType\"", "DIESEL")
        .build();
    assert!(sql.contains("WHERE brand = ? AND \"fuelType\" = ?"));
}

#[test]
fn full_query_with_join_and_grouping() {
    let (sql, params) = SqlBuilder::new("targeted_offers o")
        .select(&["b.name", "COUNT(*) AS cnt"])
        .join("JOIN breakers b ON o.\"breakerId\" = b.id")
        .where_eq("o.code", "K7M710")
        .group_by(&["b.name"])
        .order_by(&["cnt DESC"])
        .limit(5)
        .build();

    assert!(sql.contains("SELECT b.name, COUNT(*) AS cnt"));
    assert!(sql.contains("FROM targeted_offers o"));
    assert!(sql.contains("JOIN breakers b ON o.\"breakerId\" = b.id"));
    assert!(sql.contains("WHERE o.code = ?"));
    assert!(sql.contains("GROUP BY b.name"));
    assert!(sql.contains("ORDER BY cnt DESC"));
    assert!(sql.contains("LIMIT 5"));
    assert_eq!(params, vec!["K7M710"]);
}

#[test]
fn builder_reused_across_statements_accumulates_state() {
    let mut qb = SqlBuilder::new("sales");
    qb.where_gte("\"saleDate\"", "2026-01-01");
    qb.where_eq("code", "K7M710");
    qb.limit(3);

    let (sql, params) = qb.build();
    assert!(sql.contains("WHERE \"saleDate\" >= ? AND code = ?"));
    assert!(sql.contains("LIMIT 3"));
    assert_eq!(params, vec!["2026-01-01", "K7M710"]);
}
