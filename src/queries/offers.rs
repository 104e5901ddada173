//! Breaker registration and offer submission.
//!
//! Offers are the one thing the SDK writes: they go into real tables inside
//! the local database file, not into snapshot views, and therefore survive
//! snapshot refreshes. Inserts go through the raw DuckDB connection so that
//! absent optional fields bind as SQL `NULL`.

use chrono::NaiveDate;
use duckdb::params;
use serde_json::Value;

use crate::error::{Result, YardstockError};
use crate::matching::normalize_part_code;
use crate::models::{
    Breaker, BreakerDailyStats, FreeOffer, NewFreeOffer, NewTargetedOffer, TargetedOffer,
};
use crate::sql_builder::SqlBuilder;

use super::{date_param, resolve_anchor};

// ---------------------------------------------------------------------------
// OfferQuery
// ---------------------------------------------------------------------------

/// Query interface for breakers and their offers.
pub struct OfferQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> OfferQuery<'a> {
    /// Create a new `OfferQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    // -- Breakers ----------------------------------------------------------

    /// Look up a breaker by name, creating it on first contact.
    ///
    /// Names are unique after trimming; a blank name is rejected.
    pub fn get_or_create_breaker(&self, name: &str) -> Result<Breaker> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(YardstockError::InvalidArgument(
                "breaker name must not be blank".to_string(),
            ));
        }
        self.conn.ensure_offer_tables()?;

        let mut existing: Vec<Breaker> = self.conn.execute_into(
            r#"SELECT id, name, "createdAt" FROM breakers WHERE name = ? LIMIT 1"#,
            &[trimmed.to_string()],
        )?;
        if let Some(breaker) = existing.pop() {
            return Ok(breaker);
        }

        let mut created: Vec<Breaker> = self.conn.execute_into(
            r#"INSERT INTO breakers (name) VALUES (?) RETURNING id, name, "createdAt""#,
            &[trimmed.to_string()],
        )?;
        created.pop().ok_or_else(|| {
            YardstockError::NotFound("breaker insert returned no row".to_string())
        })
    }

    // -- Submissions -------------------------------------------------------

    /// Record a targeted offer against a part code. Returns the new offer id.
    ///
    /// The part code is canonicalized and must not end up blank. A quoted
    /// price of exactly zero is stored as no price at all; negative or
    /// non-finite prices are rejected, as is a quantity below one.
    pub fn submit_targeted(&self, breaker_id: i64, offer: &NewTargetedOffer) -> Result<i64> {
        let code = normalize_part_code(&offer.code);
        if code.is_empty() {
            return Err(YardstockError::InvalidArgument(
                "targeted offer needs a part code".to_string(),
            ));
        }
        let price = validate_price(offer.price)?;
        let quantity = validate_quantity(offer.quantity)?;
        self.conn.ensure_offer_tables()?;

        let id = self.conn.raw().query_row(
            r#"
            INSERT INTO targeted_offers
                ("breakerId", code, brand, "fuelType", "modelName", "modelVariant",
                 "modelYear", price, quantity, note, plate, vin)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
            params![
                breaker_id,
                code,
                offer.brand,
                offer.fuel_type,
                offer.model_name,
                offer.model_variant,
                offer.model_year,
                price,
                quantity,
                offer.note,
                offer.plate,
                offer.vin
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Record a free-text offer. Returns the new offer id.
    ///
    /// The text is trimmed and must not end up blank; price validation
    /// matches [`submit_targeted`](Self::submit_targeted).
    pub fn submit_free(&self, breaker_id: i64, offer: &NewFreeOffer) -> Result<i64> {
        let text = offer.text.trim().to_string();
        if text.is_empty() {
            return Err(YardstockError::InvalidArgument(
                "free offer needs a description".to_string(),
            ));
        }
        let price = validate_price(offer.price)?;
        self.conn.ensure_offer_tables()?;

        let id = self.conn.raw().query_row(
            r#"
            INSERT INTO free_offers ("breakerId", "text", price, note, plate, vin)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
            params![breaker_id, text, price, offer.note, offer.plate, offer.vin],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    // -- Listings ----------------------------------------------------------

    /// The latest targeted offers across all breakers, newest first.
    pub fn recent_targeted(&self, limit: usize) -> Result<Vec<TargetedOffer>> {
        self.conn.ensure_offer_tables()?;

        let (sql, sql_params) = SqlBuilder::new("targeted_offers o")
            .select(&[
                "o.id",
                "o.\"breakerId\"",
                "b.name AS \"breakerName\"",
                "o.code",
                "o.brand",
                "o.\"fuelType\"",
                "o.\"modelName\"",
                "o.\"modelVariant\"",
                "o.\"modelYear\"",
                "o.price",
                "o.quantity",
                "o.note",
                "o.plate",
                "o.vin",
                "o.\"createdAt\"",
            ])
            .join("JOIN breakers b ON b.id = o.\"breakerId\"")
            .order_by(&["o.id DESC"])
            .limit(limit)
            .build();

        self.conn.execute_into(&sql, &sql_params)
    }

    /// The latest free-text offers across all breakers, newest first.
    pub fn recent_free(&self, limit: usize) -> Result<Vec<FreeOffer>> {
        self.conn.ensure_offer_tables()?;

        let (sql, sql_params) = SqlBuilder::new("free_offers o")
            .select(&[
                "o.id",
                "o.\"breakerId\"",
                "b.name AS \"breakerName\"",
                "o.\"text\"",
                "o.price",
                "o.note",
                "o.plate",
                "o.vin",
                "o.\"createdAt\"",
            ])
            .join("JOIN breakers b ON b.id = o.\"breakerId\"")
            .order_by(&["o.id DESC"])
            .limit(limit)
            .build();

        self.conn.execute_into(&sql, &sql_params)
    }

    // -- Activity ----------------------------------------------------------

    /// How many offers one breaker submitted on a given day (today when
    /// `as_of` is `None`).
    pub fn daily_stats(
        &self,
        breaker_id: i64,
        as_of: Option<NaiveDate>,
    ) -> Result<BreakerDailyStats> {
        self.conn.ensure_offer_tables()?;

        let day = date_param(resolve_anchor(as_of));
        let sql = r#"
            SELECT (SELECT COUNT(*) FROM targeted_offers
                    WHERE "breakerId" = ? AND CAST("createdAt" AS DATE) = CAST(? AS DATE)) AS targeted,
                   (SELECT COUNT(*) FROM free_offers
                    WHERE "breakerId" = ? AND CAST("createdAt" AS DATE) = CAST(? AS DATE)) AS free
        "#;
        let sql_params = vec![
            breaker_id.to_string(),
            day.clone(),
            breaker_id.to_string(),
            day,
        ];

        let rows = self.conn.execute(sql, &sql_params)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| YardstockError::NotFound("stats query returned no row".to_string()))?;
        let targeted = row.get("targeted").and_then(Value::as_i64).unwrap_or(0);
        let free = row.get("free").and_then(Value::as_i64).unwrap_or(0);
        Ok(BreakerDailyStats {
            targeted,
            free,
            total: targeted + free,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// A price of exactly zero means "no price quoted" and becomes `None`.
/// Negative and non-finite prices are refused outright.
fn validate_price(price: Option<f64>) -> Result<Option<f64>> {
    match price {
        None => Ok(None),
        Some(p) if !p.is_finite() => Err(YardstockError::InvalidArgument(
            "offer price must be a finite number".to_string(),
        )),
        Some(p) if p < 0.0 => Err(YardstockError::InvalidArgument(
            "offer price must not be negative".to_string(),
        )),
        Some(p) if p == 0.0 => Ok(None),
        Some(p) => Ok(Some(p)),
    }
}

fn validate_quantity(quantity: i64) -> Result<i64> {
    if quantity < 1 {
        return Err(YardstockError::InvalidArgument(
            "offer quantity must be at least 1".to_string(),
        ));
    }
    Ok(quantity)
}
