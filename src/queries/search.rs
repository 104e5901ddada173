//! Free-text and plate-driven search over the ranked needs list.

use rand::{thread_rng, Rng};

use crate::error::Result;
use crate::matching::{filter_needs_by_plate, normalize_plate, rank_candidates};
use crate::models::{MatchCandidate, PartNeed, PlateInfo};

use super::needs::{NeedParams, NeedQuery};

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// Query interface combining the need aggregation with the pure matching
/// core and the plate registry.
pub struct SearchQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> SearchQuery<'a> {
    /// Create a new `SearchQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    // -- Free-text search --------------------------------------------------

    /// Rank current needs against a free-text query.
    ///
    /// Computes the needs list for `params`, then scores it with the
    /// synonym-aware matcher. A blank query returns every need unchanged
    /// (score zero); a query nothing matches returns an empty list.
    pub fn search(&self, query: &str, params: &NeedParams) -> Result<Vec<MatchCandidate>> {
        let needs = NeedQuery::new(self.conn).compute(params)?;
        Ok(rank_candidates(query, &needs))
    }

    // -- Plate lookups -----------------------------------------------------

    /// Look up a registration plate, ignoring case, spaces and dashes.
    /// Returns `None` for an unknown or blank plate.
    pub fn plate(&self, raw_plate: &str) -> Result<Option<PlateInfo>> {
        let normalized = normalize_plate(raw_plate);
        if normalized.is_empty() {
            return Ok(None);
        }
        self.conn.ensure_views(&["plates"])?;

        let sql = r#"
            SELECT plate,
                   "partCode",
                   brand,
                   "modelName",
                   CAST("modelYear" AS VARCHAR) AS "modelYear",
                   "fuelType"
            FROM plates
            WHERE REPLACE(REPLACE(UPPER(plate), ' ', ''), '-', '') = ?
            LIMIT 1
        "#;

        let mut rows: Vec<PlateInfo> = self.conn.execute_into(sql, &[normalized])?;
        Ok(rows.pop())
    }

    /// Needs relevant to the vehicle behind a plate.
    ///
    /// Returns `None` when the plate is unknown. Otherwise the ranked needs
    /// list is narrowed by the vehicle's part code, or failing that its
    /// brand and fuel; when even that filters everything out, the full list
    /// comes back.
    pub fn needs_for_plate(
        &self,
        raw_plate: &str,
        params: &NeedParams,
    ) -> Result<Option<Vec<PartNeed>>> {
        let Some(info) = self.plate(raw_plate)? else {
            return Ok(None);
        };
        let needs = NeedQuery::new(self.conn).compute(params)?;
        Ok(Some(filter_needs_by_plate(&needs, &info)))
    }

    // -- Query suggestions -------------------------------------------------

    /// Example queries to show an idle search box, sampled from the current
    /// needs so suggestions always lead somewhere.
    pub fn suggestions(&self, params: &NeedParams, count: usize) -> Result<Vec<String>> {
        let needs = NeedQuery::new(self.conn).compute(params)?;
        Ok(suggest_queries(&needs, count))
    }
}

// ---------------------------------------------------------------------------
// Free-standing helpers
// ---------------------------------------------------------------------------

/// Sample up to `count` need descriptions without replacement, weighted by
/// urgency so pressing needs surface more often. Weighting never excludes
/// anything: every need keeps a floor weight of one.
pub fn suggest_queries(needs: &[PartNeed], count: usize) -> Vec<String> {
    let mut rng = thread_rng();
    let mut pool: Vec<&PartNeed> = needs.iter().collect();
    let mut picks = Vec::new();

    while picks.len() < count && !pool.is_empty() {
        let weights: Vec<i64> = pool
            .iter()
            .map(|need| (need.urgency_score * 100.0) as i64 + 1)
            .collect();
        let total: i64 = weights.iter().sum();
        let mut roll = rng.gen_range(0..total);
        let mut chosen = pool.len() - 1;
        for (i, weight) in weights.iter().copied().enumerate() {
            roll -= weight;
            if roll < 0 {
                chosen = i;
                break;
            }
        }
        picks.push(pool.remove(chosen).describe());
    }

    picks
}
