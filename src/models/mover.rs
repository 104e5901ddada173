use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceKind — which price stream a mover query inspects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    Purchase,
    Sale,
}

// ---------------------------------------------------------------------------
// PriceMover — a part code whose average price shifted between windows
// ---------------------------------------------------------------------------

/// Average price of a part code over the most recent window compared with
/// the window immediately before it. Codes only qualify when both windows
/// hold at least the configured minimum number of samples, so thin data
/// never produces a mover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMover {
    pub code: String,
    /// Samples in the recent window.
    pub n_recent: i64,
    /// Samples in the previous window.
    pub n_prev: i64,
    pub avg_prev: f64,
    pub avg_recent: f64,
    /// `avgRecent - avgPrev`, rounded to two decimals.
    pub delta: f64,
    /// Percent change relative to `avgPrev`; `None` when the previous
    /// average is zero rather than a fabricated number.
    pub pct: Option<f64>,
}
